// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera sessions
//!
//! This module provides command-line functionality for:
//! - Running a scripted session against the simulated camera
//! - Printing the media rotation table
//! - Inspecting persisted session state

use camera_session::backends::camera::{SensorRotation, SurfaceRef};
use camera_session::orientation::{Orientation, media_rotation};
use camera_session::session::state::SessionState;
use camera_session::storage::{self, FileStore};
use camera_session::{
    CameraSession, ConfigurationEvent, ControlsEvent, Effect, MediaEvent, SessionConfig,
    SessionHandle, SessionOptions, SimulatedEngine, StaticValidator,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// How long to wait for the session to reach an expected state
const STATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a scripted session: record, pause, resume, stop, take an image
pub fn simulate(
    config: Option<PathBuf>,
    duration: u64,
    state_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => SessionConfig::load(&path)?,
        None => SessionConfig::default(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let engine = Arc::new(SimulatedEngine::default());
        let session = CameraSession::start(
            engine,
            Arc::new(StaticValidator::accepting()),
            SessionOptions::default(),
            None,
        )
        .await?;

        let mut effects = session.subscribe_effects();
        let printer = tokio::spawn(async move {
            while let Some(effect) = effects.recv().await {
                print_effect(&effect);
            }
        });

        println!("Session: {}", session.state().media.session_tag);
        let can_take_image = config.mode.can_take_image();
        let can_take_video = config.mode.can_take_video();

        session.send(ConfigurationEvent::SetUpConfig(config))?;
        session.send(ConfigurationEvent::ValidateAuthentication)?;
        session.send(ConfigurationEvent::PermissionsGranted)?;
        session.send(ControlsEvent::StartPreview {
            surface: SurfaceRef("cli".into()),
            width: 1080,
            height: 1920,
        })?;
        wait_for(&session, "preview", |s| s.connection.is_connected()).await?;

        if can_take_video {
            let half = Duration::from_millis(duration * 500);

            println!("Recording for {}s", duration);
            session.send(MediaEvent::CaptureButtonPressed)?;
            tokio::time::sleep(half).await;

            println!("Pausing");
            session.send(MediaEvent::PauseButtonPressed)?;
            tokio::time::sleep(Duration::from_millis(500)).await;

            println!("Resuming");
            session.send(MediaEvent::PauseButtonPressed)?;
            tokio::time::sleep(half).await;

            println!("Stopping");
            session.send(MediaEvent::CaptureButtonPressed)?;
            wait_for(&session, "recording stop", |s| {
                s.recording_state().is_idle() && !s.media.media.is_empty()
            })
            .await?;
        }

        if can_take_image && session.state().media.can_capture_more_images() {
            let before = session.state().media.media.len();
            println!("Taking image");
            session.send(MediaEvent::TakeImageButtonPressed)?;
            wait_for(&session, "image", |s| s.media.media.len() > before).await?;
        }

        let state = session.state();
        print_summary(&state);

        if let Some(dir) = state_dir {
            let store = FileStore::new(dir);
            session.persist(&store)?;
            println!("State saved to {}", store.dir().display());
        }

        session.stop().await;
        printer.abort();
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

async fn wait_for(
    session: &SessionHandle,
    what: &str,
    condition: impl FnMut(&SessionState) -> bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut states = session.subscribe_state();
    match tokio::time::timeout(STATE_TIMEOUT, states.wait_for(condition)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(_)) => Err(format!("Session closed while waiting for {}", what).into()),
        Err(_) => Err(format!("Timed out waiting for {}", what).into()),
    }
}

fn print_effect(effect: &Effect) {
    match effect {
        Effect::SendEvent(event) => println!("  [event] {}", event.event_type()),
        Effect::ShowToastMessage(message) => println!("  [toast] {}", message),
        Effect::ClosePreviewWithResult(media) => {
            println!("  [close] with {} media item(s)", media.len())
        }
        other => println!("  [effect] {:?}", other),
    }
}

fn print_summary(state: &SessionState) {
    println!();
    println!("Final state:");
    println!("  Recording:  {}", state.recording_state().name());
    println!("  Lens:       {}", state.capture.preview.current_lens_facing);
    if let Some(resolution) = state.capture.preview.current_resolution {
        println!("  Resolution: {} ({})", resolution, resolution.label());
    }
    println!("  Media:");
    for media in &state.media.media {
        println!(
            "    {:?} {} {} rotated {} {}ms",
            media.media_type, media.file_path, media.resolution, media.rotation, media.duration_millis
        );
    }
}

/// Print the orientation-to-rotation table
pub fn print_rotation_table() -> Result<(), Box<dyn std::error::Error>> {
    print!("{:<10}", "sensor");
    for orientation in Orientation::ALL {
        print!("{:>18}", orientation.display_name());
    }
    println!();

    for sensor in SensorRotation::ALL {
        print!("{:<10}", sensor.to_string());
        for orientation in Orientation::ALL {
            print!("{:>18}", media_rotation(sensor, orientation).to_string());
        }
        println!();
    }
    Ok(())
}

/// Print the persisted session slots
pub fn inspect(state_dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let store = match state_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::default_location()?,
    };

    let slots = storage::dump(&store)?;
    if slots.is_empty() {
        println!("No saved state in {}", store.dir().display());
        return Ok(());
    }

    println!("Saved state in {}:", store.dir().display());
    for (slot, value) in slots {
        println!();
        println!("[{}]", slot);
        match serde_json::from_str::<serde_json::Value>(&value) {
            Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => println!("{}", value),
        }
    }

    let state = storage::restore_state(&store)?;
    println!();
    println!(
        "Session {}: {} media item(s), recording {}",
        state.media.session_tag,
        state.media.media.len(),
        state.recording_state().name()
    );
    Ok(())
}
