// SPDX-License-Identifier: MPL-2.0

//! Integration tests for session state persistence

use camera_session::backends::camera::{LensFacing, SimulatedEngine};
use camera_session::session::events::{MediaEvent, UiEvent};
use camera_session::session::projector;
use camera_session::backends::camera::CameraInformation;
use camera_session::session::state::{CaptureState, ConfigState, MediaState, Panel, SessionState};
use camera_session::session::update::reduce;
use camera_session::storage::{self, FileStore, MemoryStore, StateSlot, StateStore};
use camera_session::{ConfigurationEvent, Event, SessionConfig};

/// A state reached through real transitions: configured, one image, grid open
fn reachable_state() -> SessionState {
    let mut state = SessionState::new("persist");
    state.camera_info = SimulatedEngine::default_devices();
    projector::project(&mut state);

    let config = SessionConfig {
        output_path: Some("/media".into()),
        flash_on_by_default: true,
        lens_facing: LensFacing::Back,
        ..SessionConfig::default()
    };
    let events: [Event; 4] = [
        ConfigurationEvent::SetUpConfig(config).into(),
        MediaEvent::TakeImageButtonPressed.into(),
        MediaEvent::ImageCaptured {
            file_path: "/media/IMG_persist_0001.png".into(),
            resolution: camera_session::backends::camera::Resolution::new(1920, 1080),
            lens_facing: LensFacing::Back,
            orientation: Default::default(),
            rotation: camera_session::backends::camera::SensorRotation::Rotate90,
            captured_at: chrono::Utc::now(),
        }
        .into(),
        UiEvent::MediaCounterButtonPressed.into(),
    ];
    for event in events {
        state = reduce(&state, event).state;
    }
    state
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FileStore::new(dir.path().join("state"));
    let state = reachable_state();

    storage::save_state(&store, &state).expect("state saves");
    for slot in StateSlot::ALL {
        assert!(
            dir.path().join("state").join(format!("{}.json", slot.key())).exists(),
            "Slot {} should be written",
            slot
        );
    }

    let restored = storage::restore_state(&store).expect("state restores");
    assert_eq!(restored, state);
    assert_eq!(restored.panels.panel, Panel::MediaGrid);
    assert_eq!(restored.media.media.len(), 1);
}

#[test]
fn test_missing_files_restore_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FileStore::new(dir.path());

    let restored = storage::restore_state(&store).expect("empty directory restores");
    assert_eq!(restored, SessionState::default());
}

#[test]
fn test_empty_slot_restores_that_sub_state_only() {
    let store = MemoryStore::new();
    let state = reachable_state();
    storage::save_state(&store, &state).expect("state saves");
    store.save(StateSlot::Panels, "").expect("slot cleared");

    let restored = storage::restore_state(&store).expect("state restores");
    assert_eq!(restored.panels.panel, Panel::None);
    assert_eq!(restored.media, state.media);
    assert_eq!(restored.capture, state.capture);
}

#[test]
fn test_sub_states_round_trip_individually() {
    let state = reachable_state();

    let media = storage::encode(&state.media).expect("encodes");
    assert_eq!(storage::decode::<MediaState>(&media).ok(), Some(state.media.clone()));

    let capture = storage::encode(&state.capture).expect("encodes");
    assert_eq!(storage::decode::<CaptureState>(&capture).ok(), Some(state.capture.clone()));

    let config = storage::encode(&state.config).expect("encodes");
    assert_eq!(storage::decode::<ConfigState>(&config).ok(), Some(state.config.clone()));

    let info = storage::encode(&state.camera_info).expect("encodes");
    assert_eq!(storage::decode::<CameraInformation>(&info).ok(), Some(state.camera_info.clone()));
}
