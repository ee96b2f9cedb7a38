// SPDX-License-Identifier: GPL-3.0-only

//! Derived-state projector
//!
//! Recomputes everything in [`SessionState`] that is a function of the rest
//! of the state. The reducer pipeline runs [`project`] after every event, so
//! individual handlers never touch [`ControlsState`] themselves.

use crate::session::state::{ControlsState, SessionState};

/// Compute the controls for a state
///
/// The preview is busy exactly while video frames are written, so recording
/// phase alone decides enablement: the capture button doubles as the stop
/// button and must stay usable while recording. Once a stop is on its way
/// neither capture nor pause accepts input until the recording ends.
pub fn derive_controls(state: &SessionState) -> ControlsState {
    let recording = state.recording_state();
    let stopping = state.capture.recording.stop_requested;
    let mode = state.mode();
    let device = state.current_device();
    let has_media = !state.media.media.is_empty();
    let can_flip = state.camera_info.can_flip_camera();

    ControlsState {
        take_picture_enabled: state.media.can_capture_more_images(),
        take_picture_visible: mode.can_take_image() && mode.can_take_video(),
        capture_enabled: !stopping,
        flip_lens_enabled: recording.is_idle() && can_flip,
        flip_lens_visible: !recording.is_recording() && can_flip,
        pause_enabled: !recording.is_idle() && !stopping,
        pause_visible: !recording.is_idle(),
        flash_visible: device.is_some_and(|d| d.with_flash),
        flash_enabled: device.is_some_and(|d| d.with_flash),
        resolutions_visible: device.is_some_and(|d| !d.resolutions.is_empty()),
        resolutions_enabled: recording.is_idle(),
        media_counter_visible: has_media,
        media_counter_enabled: !recording.is_recording(),
        continue_visible: has_media,
        continue_enabled: recording.is_idle(),
    }
}

/// Bring every derived field of `state` up to date
///
/// Idempotent: projecting an already projected state changes nothing.
pub fn project(state: &mut SessionState) {
    if state.capture.preview.current_resolution.is_none() {
        let facing = state.capture.preview.current_lens_facing;
        state.capture.preview.current_resolution = state.resolution_for(facing);
    }

    let mode = *state.mode();
    state.media.recompute_limits(&mode);
    state.controls = derive_controls(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{
        CameraDevice, LensFacing, Resolution, SensorRect, SensorRotation,
    };
    use crate::config::CameraMode;
    use crate::session::state::RecordingState;

    fn device(facing: LensFacing) -> CameraDevice {
        CameraDevice {
            id: facing.to_string(),
            lens_facing: facing,
            resolutions: vec![Resolution::new(1920, 1080)],
            with_flash: facing == LensFacing::Back,
            tap_to_focus_enabled: true,
            sensor_orientation: SensorRotation::Rotate90,
            sensor_size: SensorRect::with_size(4000, 3000),
            logical_camera: false,
        }
    }

    fn two_lens_state() -> SessionState {
        let mut state = SessionState::default();
        state.camera_info.back_camera = Some(device(LensFacing::Back));
        state.camera_info.front_camera = Some(device(LensFacing::Front));
        state
    }

    #[test]
    fn test_idle_controls() {
        let mut state = two_lens_state();
        project(&mut state);
        let controls = state.controls;

        assert!(controls.capture_enabled);
        assert!(controls.flip_lens_enabled);
        assert!(controls.flip_lens_visible);
        assert!(!controls.pause_visible);
        assert!(controls.flash_visible);
        assert!(controls.resolutions_visible);
        assert!(!controls.media_counter_visible);
        assert!(!controls.continue_visible);
        assert_eq!(
            state.capture.preview.current_resolution,
            Some(Resolution::new(1920, 1080))
        );
    }

    #[test]
    fn test_recording_hides_flip_and_shows_pause() {
        let mut state = two_lens_state();
        state.capture.to_recording();
        project(&mut state);
        let controls = state.controls;

        assert!(!controls.flip_lens_visible);
        assert!(!controls.flip_lens_enabled);
        assert!(controls.pause_visible);
        assert!(controls.pause_enabled);
        assert!(!controls.resolutions_enabled);
        assert!(!controls.continue_enabled);
    }

    #[test]
    fn test_stopping_disables_capture_and_pause() {
        let mut state = two_lens_state();
        state.capture.to_recording();
        state.capture.recording.stop_requested = true;
        project(&mut state);

        assert!(!state.controls.capture_enabled);
        assert!(!state.controls.pause_enabled);
        assert!(state.controls.pause_visible);
    }

    #[test]
    fn test_single_lens_cannot_flip() {
        let mut state = SessionState::default();
        state.camera_info.back_camera = Some(device(LensFacing::Back));
        project(&mut state);
        assert!(!state.controls.flip_lens_visible);
        assert!(!state.controls.flip_lens_enabled);
    }

    #[test]
    fn test_take_picture_visible_only_in_mixed_mode() {
        let mut state = two_lens_state();
        state.config.config.mode = CameraMode::image(None);
        project(&mut state);
        assert!(!state.controls.take_picture_visible);

        state.config.config.mode = CameraMode::video_and_image();
        project(&mut state);
        assert!(state.controls.take_picture_visible);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let mut state = two_lens_state();
        state.capture.recording.state = RecordingState::Paused;
        project(&mut state);
        let first = state.clone();
        project(&mut state);
        assert_eq!(first, state);
    }
}
