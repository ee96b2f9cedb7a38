// SPDX-License-Identifier: GPL-3.0-only

//! Media handlers
//!
//! Owns the recording lifecycle and the committed media list:
//!
//! - capture button: start or stop a video (or take an image in image-only
//!   sessions)
//! - pause button: pause or resume the active recording
//! - hardware recording callbacks: keep the recording phase and stopwatch in
//!   step with the engine
//! - image results, deletion and discarding
//!
//! The recording phase only changes here. Every engine and stopwatch call is
//! made from a follow-up task.

use crate::backends::camera::{
    ImageCaptureEvent, ImageRequest, RecordingRequest, Resolution, SensorRotation,
};
use crate::constants::messages;
use crate::errors::{EngineError, LimitKind, SessionError};
use crate::orientation::{Orientation, media_rotation};
use crate::session::effects::{CameraEventData, Effect};
use crate::session::events::{MediaEvent, RecordingControl};
use crate::session::media::{Media, MediaType, media_id};
use crate::session::state::{Panel, RecordingConfig, SessionState};
use crate::session::task::{Outcome, Task};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tracing::{debug, error, info, warn};

/// Resolution of the media as displayed, after applying its rotation
fn displayed_resolution(resolution: Resolution, rotation: SensorRotation) -> Resolution {
    if rotation.swaps_dimensions() {
        resolution.swapped()
    } else {
        resolution
    }
}

impl SessionState {
    pub(crate) fn reduce_media(&mut self, event: MediaEvent) -> Outcome {
        match event {
            MediaEvent::TakeImageButtonPressed => self.handle_take_image(),
            MediaEvent::CaptureButtonPressed => self.handle_capture(),
            MediaEvent::PauseButtonPressed => self.handle_pause_button(),
            MediaEvent::DeleteMediaButtonPressed(media) => self.handle_delete_media(media),
            MediaEvent::DiscardAllMedia => self.handle_discard_all(),
            MediaEvent::ImageCaptured {
                file_path,
                resolution,
                lens_facing,
                orientation,
                rotation,
                captured_at,
            } => self.handle_image_captured(Media {
                id: media_id(&file_path),
                created_at: captured_at,
                file_path,
                media_type: MediaType::Image,
                lens_facing,
                orientation,
                resolution: displayed_resolution(resolution, rotation),
                rotation,
                duration_millis: 0,
            }),
            MediaEvent::RecordingStartFailed(e) => self.handle_recording_failure("start", e),
            MediaEvent::RecordingControlFailed(control, e) => {
                self.handle_control_failed(control, e)
            }
            MediaEvent::RecordingTimerUpdated(millis) => self.handle_timer_updated(millis),
            MediaEvent::RecordingStarted => self.handle_recording_started(),
            MediaEvent::RecordingPaused => self.handle_recording_paused(),
            MediaEvent::RecordingResumed => self.handle_recording_resumed(),
            MediaEvent::RecordingStopped {
                max_duration_reached,
                elapsed_millis,
                stopped_at,
            } => self.handle_recording_stopped(max_duration_reached, elapsed_millis, stopped_at),
            MediaEvent::MaxDurationReached => self.handle_max_duration_reached(),
            MediaEvent::RecordingFailed(e) => self.handle_recording_failure("recording", e),
        }
    }

    /// Session closes on its own once media has been produced
    fn closes_after_capture(&self) -> bool {
        let mode = self.mode();
        mode.is_single_media_mode() || mode.auto_close
    }

    /// Toast the user about a limit and dismiss it later
    fn limit_reached(&self, kind: LimitKind, message: &str) -> Outcome {
        info!(err = %SessionError::LimitExceeded(kind), "Capture refused");
        Outcome::with(
            Effect::ShowToastMessage(message.to_string()),
            Task::dismiss_toast(),
        )
    }

    // =========================================================================
    // User intents
    // =========================================================================

    fn handle_capture(&mut self) -> Outcome {
        if !self.mode().can_take_video() {
            return self.handle_take_image();
        }

        let recording = self.recording_state();
        if !recording.is_idle() {
            return self.handle_stop_recording();
        }

        if !self.media.can_record_more() {
            let kind = if self.media.max_media_count_reached {
                LimitKind::Media
            } else {
                LimitKind::Video
            };
            return self.limit_reached(kind, messages::VIDEO_LIMIT_REACHED);
        }

        self.handle_start_recording()
    }

    fn handle_start_recording(&mut self) -> Outcome {
        let Some(resolution) = self.capture.preview.current_resolution else {
            warn!("Cannot record: no resolution selected");
            return Outcome::none();
        };
        let Some(device) = self.current_device() else {
            warn!("Cannot record: no device");
            return Outcome::none();
        };
        let lens_facing = device.lens_facing;
        let sensor_orientation = device.sensor_orientation;

        let orientation = self.orientation();
        let rotation = media_rotation(sensor_orientation, orientation);
        let path = self.media.next_video_path();
        info!(file = %path, %resolution, %orientation, %rotation, "Starting recording");

        self.capture.recording =
            RecordingConfig::start(path.clone(), resolution, orientation, lens_facing, rotation);
        self.capture.to_recording();
        self.orientation.fixed_orientation = Some(orientation);

        let request = RecordingRequest {
            config: self.capture.capture.clone(),
            output_file: path,
            orientation,
            rotation,
            duration_limit_millis: self.mode().video_duration_limit,
            resolution,
        };
        Outcome::task(Task::perform(move |ctx| async move {
            if let Err(e) = ctx.engine.start_recording(request).await {
                ctx.send(MediaEvent::RecordingStartFailed(e));
            }
        }))
    }

    fn handle_stop_recording(&mut self) -> Outcome {
        if self.capture.recording.stop_requested {
            return self.reject("stop-recording", "stopping");
        }

        info!(
            elapsed_ms = self.capture.recording.elapsed_time_millis,
            "Stopping recording"
        );
        self.capture.recording.stop_requested = true;
        Outcome::task(Task::perform(|ctx| async move {
            ctx.stopwatch.pause();
            if let Err(e) = ctx.engine.stop_recording(false).await {
                ctx.send(MediaEvent::RecordingControlFailed(RecordingControl::Stop, e));
            }
        }))
    }

    fn handle_take_image(&mut self) -> Outcome {
        if !self.mode().can_take_image() {
            return self.reject("take-image", "image-disabled");
        }
        if !self.media.can_capture_more_images() {
            let kind = if self.media.max_media_count_reached {
                LimitKind::Media
            } else {
                LimitKind::Image
            };
            return self.limit_reached(kind, messages::IMAGE_LIMIT_REACHED);
        }
        let Some(resolution) = self.capture.preview.current_resolution else {
            warn!("Cannot take image: no resolution selected");
            return Outcome::none();
        };
        let Some(device) = self.current_device() else {
            warn!("Cannot take image: no device");
            return Outcome::none();
        };
        let lens_facing = device.lens_facing;
        let sensor_orientation = device.sensor_orientation;

        let orientation = self.orientation();
        let rotation = media_rotation(sensor_orientation, orientation);
        let path = self.media.next_image_path(self.config.config.image_format);
        info!(file = %path, %resolution, %orientation, "Taking image");

        let request = ImageRequest {
            config: self.capture.capture.clone(),
            output_file: path,
            resolution,
            rotation,
        };
        Outcome::task(Task::perform(move |ctx| async move {
            let mut events = ctx.engine.take_image(request);
            while let Some(event) = events.next().await {
                match event {
                    ImageCaptureEvent::Captured {
                        file_path,
                        resolution,
                    } => {
                        ctx.send(MediaEvent::ImageCaptured {
                            file_path,
                            resolution,
                            lens_facing,
                            orientation,
                            rotation,
                            captured_at: Utc::now(),
                        });
                    }
                    ImageCaptureEvent::Failed(e) => {
                        warn!(error = %e, "Image capture failed");
                        ctx.publish(Effect::ShowToastMessage(
                            messages::IMAGE_CAPTURE_FAILED.to_string(),
                        ));
                        tokio::time::sleep(ctx.options.toast_duration).await;
                        ctx.publish(Effect::DismissToast);
                    }
                    progress => debug!(?progress, "Image capture progress"),
                }
            }
        }))
    }

    fn handle_pause_button(&mut self) -> Outcome {
        let recording = self.recording_state();
        if self.capture.recording.stop_requested {
            return self.reject("pause-button", "stopping");
        }
        if recording.is_recording() {
            info!("Pausing recording");
            self.capture.to_paused();
            return Outcome::task(Task::perform(|ctx| async move {
                ctx.stopwatch.pause();
                if let Err(e) = ctx.engine.pause_recording().await {
                    ctx.send(MediaEvent::RecordingControlFailed(RecordingControl::Pause, e));
                }
            }));
        }
        if recording.is_paused() {
            info!("Resuming recording");
            self.capture.to_recording();
            return Outcome::task(Task::perform(|ctx| async move {
                ctx.stopwatch.resume();
                if let Err(e) = ctx.engine.resume_recording().await {
                    ctx.send(MediaEvent::RecordingControlFailed(RecordingControl::Resume, e));
                }
            }));
        }
        self.reject("pause-button", recording.name())
    }

    fn handle_delete_media(&mut self, media: Media) -> Outcome {
        let Some(index) = self
            .media
            .media
            .iter()
            .position(|m| m.file_path == media.file_path)
        else {
            debug!(file = %media.file_path, "Unknown media, nothing deleted");
            return Outcome::none();
        };

        let removed = self.media.media.remove(index);
        info!(file = %removed.file_path, "Media deleted");

        let showing_removed = matches!(
            &self.panels.panel,
            Panel::MediaDetail { media: shown, .. } if shown.file_path == removed.file_path
        );
        if showing_removed {
            self.panels.panel = Panel::MediaGrid;
        }

        Outcome::task(Task::report(CameraEventData::MediaDeleted {
            media_type: removed.media_type,
        }))
    }

    fn handle_discard_all(&mut self) -> Outcome {
        let count = self.media.media.len();
        info!(count, "Discarding all media");
        self.panels.panel = Panel::None;

        Outcome::task(Task::perform(move |ctx| async move {
            ctx.report(CameraEventData::MediaDiscarded { count });
            ctx.publish(Effect::ClosePreview);
        }))
    }

    // =========================================================================
    // Follow-ups
    // =========================================================================

    fn handle_image_captured(&mut self, media: Media) -> Outcome {
        info!(file = %media.file_path, resolution = %media.resolution, "Image captured");
        let lens_facing = media.lens_facing;
        let resolution = media.resolution;
        self.media.media.push(media);

        let close_with = self
            .closes_after_capture()
            .then(|| self.media.media.clone());
        Outcome::task(Task::perform(move |ctx| async move {
            ctx.report(CameraEventData::ImageTaken {
                lens_facing,
                resolution,
            });
            if let Some(media) = close_with {
                ctx.publish(Effect::ClosePreviewWithResult(media));
            }
        }))
    }

    fn handle_timer_updated(&mut self, millis: u64) -> Outcome {
        let recording = &mut self.capture.recording;
        // Late ticks from a previous recording, or a reset tick after stop
        if recording.state.is_idle() || millis < recording.elapsed_time_millis {
            return Outcome::none();
        }
        recording.elapsed_time_millis = millis;
        Outcome::none()
    }

    // =========================================================================
    // Hardware recording lifecycle
    // =========================================================================

    fn handle_recording_started(&mut self) -> Outcome {
        let phase = self.recording_state();
        if phase.is_idle() {
            debug!("Recording started without an active recording, ignoring");
            return Outcome::none();
        }

        let recording = &self.capture.recording;
        info!(file = ?recording.path, "Recording started");
        let lens_facing = recording
            .lens_facing
            .unwrap_or(self.capture.preview.current_lens_facing);
        let resolution = recording.resolution;
        // Paused before the engine confirmed: count from zero once resumed
        let paused = phase.is_paused();
        Outcome::task(Task::perform(move |ctx| async move {
            ctx.stopwatch.restart();
            if paused {
                ctx.stopwatch.pause();
            }
            ctx.report(CameraEventData::RecordingStarted {
                lens_facing,
                resolution,
            });
        }))
    }

    fn handle_recording_paused(&mut self) -> Outcome {
        let recording = self.recording_state();
        if recording.is_idle() {
            return self.reject("recording-paused", recording.name());
        }

        // Engine paused on its own (app in background)
        if recording.is_recording() {
            info!("Recording paused by the engine");
            self.capture.to_paused();
        }

        let elapsed_time_millis = self.capture.recording.elapsed_time_millis;
        Outcome::task(Task::perform(move |ctx| async move {
            ctx.stopwatch.pause();
            ctx.report(CameraEventData::RecordingPaused {
                elapsed_time_millis,
            });
        }))
    }

    fn handle_recording_resumed(&mut self) -> Outcome {
        let recording = self.recording_state();
        if recording.is_idle() {
            return self.reject("recording-resumed", recording.name());
        }

        if recording.is_paused() {
            info!("Recording resumed by the engine");
            self.capture.to_recording();
        }

        let elapsed_time_millis = self.capture.recording.elapsed_time_millis;
        Outcome::task(Task::perform(move |ctx| async move {
            ctx.stopwatch.resume();
            ctx.report(CameraEventData::RecordingResumed {
                elapsed_time_millis,
            });
        }))
    }

    fn handle_max_duration_reached(&mut self) -> Outcome {
        let recording = self.recording_state();
        if recording.is_idle() {
            return self.reject("max-duration-reached", recording.name());
        }
        if self.capture.recording.stop_requested {
            return self.reject("max-duration-reached", "stopping");
        }

        info!(
            elapsed_ms = self.capture.recording.elapsed_time_millis,
            "Maximum duration reached, stopping recording"
        );
        self.capture.recording.max_duration_reached = true;
        self.capture.recording.stop_requested = true;
        Outcome::task(Task::perform(|ctx| async move {
            ctx.stopwatch.pause();
            if let Err(e) = ctx.engine.stop_recording(true).await {
                ctx.send(MediaEvent::RecordingControlFailed(RecordingControl::Stop, e));
            }
        }))
    }

    fn handle_recording_stopped(
        &mut self,
        max_duration_reached: bool,
        elapsed_millis: u64,
        stopped_at: DateTime<Utc>,
    ) -> Outcome {
        let recording = self.recording_state();
        if recording.is_idle() {
            return self.reject("recording-stopped", recording.name());
        }

        let finished = self.capture.to_idle();
        self.orientation.fixed_orientation = self.config.config.orientation;

        let (Some(file_path), Some(resolution), Some(lens_facing)) =
            (finished.path, finished.resolution, finished.lens_facing)
        else {
            error!("Recording stopped without its capture parameters");
            return self.recording_cleanup();
        };

        let max_duration_reached = max_duration_reached || finished.max_duration_reached;
        let duration_millis = elapsed_millis.max(finished.elapsed_time_millis);
        let media = Media {
            id: media_id(&file_path),
            created_at: stopped_at,
            file_path,
            media_type: MediaType::Video,
            lens_facing,
            orientation: finished.orientation.unwrap_or(Orientation::Portrait),
            resolution: displayed_resolution(resolution, finished.rotation),
            rotation: finished.rotation,
            duration_millis,
        };
        info!(
            file = %media.file_path,
            duration_ms = duration_millis,
            max_duration_reached,
            "Recording finished"
        );
        self.media.media.push(media);

        let close_with = self
            .closes_after_capture()
            .then(|| self.media.media.clone());
        let config = self.capture.capture.clone();
        Outcome::task(Task::perform(move |ctx| async move {
            ctx.stopwatch.stop();
            ctx.report(CameraEventData::RecordingFinished {
                duration_millis,
                max_duration_reached,
            });
            if let Err(e) = ctx.engine.restart_preview(config).await {
                warn!(error = %e, "Failed to restart preview after recording");
            }

            if max_duration_reached {
                ctx.publish(Effect::ShowToastMessage(
                    messages::MAX_DURATION_REACHED.to_string(),
                ));
                tokio::time::sleep(ctx.options.toast_duration).await;
                ctx.publish(Effect::DismissToast);
            }
            if let Some(media) = close_with {
                ctx.publish(Effect::ClosePreviewWithResult(media));
            }
        }))
    }

    fn handle_recording_failure(&mut self, stage: &'static str, e: EngineError) -> Outcome {
        let recording = self.recording_state();
        if recording.is_idle() {
            debug!(stage, error = %e, "Recording failure while idle, ignoring");
            return Outcome::none();
        }

        error!(stage, err = %SessionError::from(e), "Recording failed");
        self.capture.to_idle();
        self.orientation.fixed_orientation = self.config.config.orientation;
        self.recording_cleanup()
    }

    fn handle_control_failed(&mut self, control: RecordingControl, e: EngineError) -> Outcome {
        let recording = &self.capture.recording;
        if recording.state.is_idle() {
            debug!(control = control.name(), error = %e, "Recording already finished, ignoring");
            return Outcome::none();
        }
        // A pause or resume racing with the stop; the stop settles the recording
        if recording.stop_requested && control != RecordingControl::Stop {
            debug!(control = control.name(), error = %e, "Recording is stopping, ignoring");
            return Outcome::none();
        }
        self.handle_recording_failure(control.name(), e)
    }

    /// Reset engine and stopwatch after a recording that produced no media
    fn recording_cleanup(&self) -> Outcome {
        let config = self.capture.capture.clone();
        Outcome::with(
            Effect::ShowToastMessage(messages::RECORDING_FAILED.to_string()),
            Task::batch([
                Task::perform(move |ctx| async move {
                    ctx.stopwatch.stop();
                    if let Err(e) = ctx.engine.restart_preview(config).await {
                        warn!(error = %e, "Failed to restart preview after failure");
                    }
                }),
                Task::dismiss_toast(),
            ]),
        )
    }
}
