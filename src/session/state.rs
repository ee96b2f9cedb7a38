// SPDX-License-Identifier: GPL-3.0-only

//! Session state model
//!
//! [`SessionState`] is the composite snapshot owned by the session loop. It
//! is only ever replaced through the reducer pipeline; every sub-state here
//! is plain serializable data so it can be persisted and restored slot by
//! slot.

use crate::backends::camera::{
    CameraDevice, CameraInformation, FocusState, LensFacing, Resolution, SensorRotation,
};
use crate::config::{CameraMode, SessionConfig};
use crate::constants::{ImageFormat, VIDEO_EXTENSION};
use crate::orientation::Orientation;
use crate::session::capture_config::CaptureConfig;
use crate::session::media::{Media, MediaType, count_of};
use serde::{Deserialize, Serialize};

/// Recording phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordingState {
    /// Not recording
    #[default]
    Idle,
    /// Video frames are being written
    Recording,
    /// Recording is open but no frames are written
    Paused,
}

impl RecordingState {
    pub fn is_idle(&self) -> bool {
        *self == RecordingState::Idle
    }

    pub fn is_recording(&self) -> bool {
        *self == RecordingState::Recording
    }

    pub fn is_paused(&self) -> bool {
        *self == RecordingState::Paused
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordingState::Idle => "idle",
            RecordingState::Recording => "recording",
            RecordingState::Paused => "paused",
        }
    }
}

/// The in-flight recording, if any
///
/// `state` is the single source of truth for the recording phase. The
/// resolution, orientation, lens and rotation are snapshotted when the
/// recording starts and stay fixed until it ends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Output file of the recording
    pub path: Option<String>,
    pub state: RecordingState,
    pub resolution: Option<Resolution>,
    pub orientation: Option<Orientation>,
    pub lens_facing: Option<LensFacing>,
    /// Rotation to apply to the finished video
    pub rotation: SensorRotation,
    /// Elapsed recording time reported by the stopwatch
    pub elapsed_time_millis: u64,
    /// The recording was (or is being) stopped by the duration limit
    pub max_duration_reached: bool,
    /// A stop was sent to the engine and its `Stopped` has not arrived yet
    pub stop_requested: bool,
}

impl RecordingConfig {
    /// New active recording with its capture parameters fixed
    pub fn start(
        path: String,
        resolution: Resolution,
        orientation: Orientation,
        lens_facing: LensFacing,
        rotation: SensorRotation,
    ) -> Self {
        Self {
            path: Some(path),
            state: RecordingState::Recording,
            resolution: Some(resolution),
            orientation: Some(orientation),
            lens_facing: Some(lens_facing),
            rotation,
            elapsed_time_millis: 0,
            max_duration_reached: false,
            stop_requested: false,
        }
    }

    /// Reset to idle, returning the finished recording
    pub fn stop(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// How the zoom level is shown on the preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomIndicatorMode {
    /// Compact level indicator
    #[default]
    Indicator,
    /// Full zoom slider
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Preview is writing video frames and must not be reconfigured
    pub is_busy: bool,
    pub current_resolution: Option<Resolution>,
    pub current_lens_facing: LensFacing,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub zoom_indicator_mode: ZoomIndicatorMode,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureState {
    pub preview: PreviewConfig,
    pub recording: RecordingConfig,
    pub capture: CaptureConfig,
}

impl CaptureState {
    /// Enter (or re-enter) active recording
    pub fn to_recording(&mut self) {
        self.recording.state = RecordingState::Recording;
        self.preview.is_busy = true;
        self.capture = self.capture.for_recording();
    }

    /// Keep the recording open but stop writing frames
    pub fn to_paused(&mut self) {
        self.recording.state = RecordingState::Paused;
        self.preview.is_busy = false;
        self.capture = self.capture.for_preview();
    }

    /// Back to an idle preview, returning the finished recording
    pub fn to_idle(&mut self) -> RecordingConfig {
        self.preview.is_busy = false;
        self.capture = self.capture.for_idle();
        self.recording.stop()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaState {
    /// Committed media, in capture order
    pub media: Vec<Media>,
    /// Media that belongs to a recording still being assembled
    pub temp_media: Vec<Media>,
    /// Where finished media is written
    pub output_directory: Option<String>,
    pub max_video_count_reached: bool,
    pub max_image_count_reached: bool,
    pub max_media_count_reached: bool,
    /// Prefix of every file name produced by this session
    pub session_tag: String,
    /// Sequence number of the next output file
    pub next_sequence: u32,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            media: Vec::new(),
            temp_media: Vec::new(),
            output_directory: None,
            max_video_count_reached: false,
            max_image_count_reached: false,
            max_media_count_reached: false,
            session_tag: "session".to_string(),
            next_sequence: 1,
        }
    }
}

impl MediaState {
    pub fn video_count(&self) -> usize {
        count_of(&self.media, MediaType::Video)
    }

    pub fn image_count(&self) -> usize {
        count_of(&self.media, MediaType::Image)
    }

    /// Recompute the limit flags from the committed media
    pub fn recompute_limits(&mut self, mode: &CameraMode) {
        let reached = |count: usize, limit: Option<u32>| {
            limit.is_some_and(|limit| count >= limit as usize)
        };
        self.max_video_count_reached = reached(self.video_count(), mode.video_limit);
        self.max_image_count_reached = reached(self.image_count(), mode.image_limit);
        self.max_media_count_reached = reached(self.media.len(), mode.media_limit);
    }

    pub fn can_record_more(&self) -> bool {
        !self.max_video_count_reached && !self.max_media_count_reached
    }

    pub fn can_capture_more_images(&self) -> bool {
        !self.max_image_count_reached && !self.max_media_count_reached
    }

    fn output_path(&self, prefix: &str, extension: &str) -> String {
        let directory = self.output_directory.as_deref().unwrap_or(".");
        format!(
            "{}/{}_{}_{:04}.{}",
            directory.trim_end_matches('/'),
            prefix,
            self.session_tag,
            self.next_sequence,
            extension
        )
    }

    /// Output file of the next video, advancing the sequence
    pub fn next_video_path(&mut self) -> String {
        let path = self.output_path("VID", VIDEO_EXTENSION);
        self.next_sequence += 1;
        path
    }

    /// Output file of the next image, advancing the sequence
    pub fn next_image_path(&mut self, format: ImageFormat) -> String {
        let path = self.output_path("IMG", format.extension());
        self.next_sequence += 1;
        path
    }
}

/// Enablement and visibility of every on-screen control
///
/// Derived from the rest of [`SessionState`] by the projector; never set
/// directly by a reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsState {
    pub take_picture_enabled: bool,
    pub take_picture_visible: bool,
    pub capture_enabled: bool,
    pub flip_lens_enabled: bool,
    pub flip_lens_visible: bool,
    pub pause_enabled: bool,
    pub pause_visible: bool,
    pub flash_visible: bool,
    pub flash_enabled: bool,
    pub resolutions_visible: bool,
    pub resolutions_enabled: bool,
    pub media_counter_visible: bool,
    pub media_counter_enabled: bool,
    pub continue_visible: bool,
    pub continue_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationState {
    /// Live orientation reported by the device
    pub orientation: Orientation,
    /// Lock imposed by configuration or by an active recording
    pub fixed_orientation: Option<Orientation>,
}

impl OrientationState {
    /// Effective orientation: the lock when set, else the live value
    pub fn resolve(&self) -> Orientation {
        self.fixed_orientation.unwrap_or(self.orientation)
    }
}

/// Screen position of the focus indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicatorPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusIndicatorState {
    pub focus_state: FocusState,
    pub position: IndicatorPosition,
}

/// Overlay panel currently shown; at most one at a time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Panel {
    #[default]
    None,
    MediaGrid,
    Resolutions,
    DiscardConfirmation,
    /// Detail view of one committed media item
    MediaDetail { index: usize, media: Media },
}

impl Panel {
    pub fn name(&self) -> &'static str {
        match self {
            Panel::None => "none",
            Panel::MediaGrid => "media-grid",
            Panel::Resolutions => "resolutions",
            Panel::DiscardConfirmation => "discard-confirmation",
            Panel::MediaDetail { .. } => "media-detail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelsState {
    pub panel: Panel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    Connected,
    #[default]
    Disconnected,
    Error,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        *self == ConnectionState::Connected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionState {
    pub granted: bool,
    pub authenticated: bool,
}

/// Applied session configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// `SetUpConfig` has been applied
    pub set_up: bool,
    pub config: SessionConfig,
}

/// Composite snapshot of one camera session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub capture: CaptureState,
    pub media: MediaState,
    pub controls: ControlsState,
    /// Enumerated at session start, read-only afterwards
    pub camera_info: CameraInformation,
    pub orientation: OrientationState,
    pub focus_indicator: FocusIndicatorState,
    pub panels: PanelsState,
    pub connection: ConnectionState,
    pub permission: PermissionState,
    pub config: ConfigState,
}

impl SessionState {
    /// Fresh state whose output files are prefixed with `session_tag`
    pub fn new(session_tag: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.media.session_tag = session_tag.into();
        state
    }

    /// Effective orientation, honouring any lock
    pub fn orientation(&self) -> Orientation {
        self.orientation.resolve()
    }

    pub fn mode(&self) -> &CameraMode {
        &self.config.config.mode
    }

    pub fn recording_state(&self) -> RecordingState {
        self.capture.recording.state
    }

    /// Device behind the currently selected lens
    pub fn current_device(&self) -> Option<&CameraDevice> {
        self.camera_info
            .device(self.capture.preview.current_lens_facing)
    }

    /// Resolution to use for a lens
    ///
    /// The device's list is narrowed by the configured allow-list (an empty
    /// allow-list keeps every device resolution). The configured default wins
    /// when it survives the narrowing, otherwise the first candidate is used.
    pub fn resolution_for(&self, facing: LensFacing) -> Option<Resolution> {
        let device = self.camera_info.device(facing)?;
        let config = &self.config.config;
        let allowed = config.allowed_resolutions(facing);

        let candidates: Vec<Resolution> = if allowed.is_empty() {
            device.resolutions.clone()
        } else {
            allowed
                .iter()
                .filter(|r| device.resolutions.contains(r))
                .copied()
                .collect()
        };

        match config.default_resolution(facing) {
            Some(default) if candidates.contains(&default) => Some(default),
            _ => candidates.first().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::SensorRect;
    use crate::session::capture_config::{CaptureTemplate, FlashMode};

    fn device(facing: LensFacing, resolutions: Vec<Resolution>) -> CameraDevice {
        CameraDevice {
            id: facing.to_string(),
            lens_facing: facing,
            resolutions,
            with_flash: true,
            tap_to_focus_enabled: true,
            sensor_orientation: SensorRotation::Rotate90,
            sensor_size: SensorRect::with_size(4000, 3000),
            logical_camera: false,
        }
    }

    const HD: Resolution = Resolution::new(1280, 720);
    const FHD: Resolution = Resolution::new(1920, 1080);
    const UHD: Resolution = Resolution::new(3840, 2160);

    #[test]
    fn test_recording_config_stop_resets_to_idle() {
        let mut recording = RecordingConfig::start(
            "/tmp/a.mp4".into(),
            FHD,
            Orientation::Portrait,
            LensFacing::Back,
            SensorRotation::Rotate90,
        );
        assert!(recording.state.is_recording());
        let finished = recording.stop();
        assert_eq!(finished.path.as_deref(), Some("/tmp/a.mp4"));
        assert_eq!(recording, RecordingConfig::default());
    }

    #[test]
    fn test_capture_state_transitions_keep_busy_in_sync() {
        let mut capture = CaptureState::default();
        capture.capture = capture.capture.with_flash(FlashMode::Single);

        capture.to_recording();
        assert!(capture.preview.is_busy);
        assert_eq!(capture.capture.template, CaptureTemplate::Record);
        assert_eq!(capture.capture.flash, FlashMode::Torch);

        capture.to_paused();
        assert!(!capture.preview.is_busy);
        assert_eq!(capture.capture.template, CaptureTemplate::Preview);
        assert_eq!(capture.capture.flash, FlashMode::Single);
    }

    #[test]
    fn test_orientation_lock_wins() {
        let mut orientation = OrientationState::default();
        orientation.orientation = Orientation::LandscapeLeft;
        assert_eq!(orientation.resolve(), Orientation::LandscapeLeft);
        orientation.fixed_orientation = Some(Orientation::Portrait);
        assert_eq!(orientation.resolve(), Orientation::Portrait);
    }

    #[test]
    fn test_resolution_prefers_configured_default() {
        let mut state = SessionState::default();
        state.camera_info.back_camera = Some(device(LensFacing::Back, vec![HD, FHD, UHD]));
        state.config.config.back_resolutions = vec![FHD, UHD];
        state.config.config.back_resolution = Some(UHD);
        assert_eq!(state.resolution_for(LensFacing::Back), Some(UHD));

        state.config.config.back_resolution = Some(HD);
        assert_eq!(state.resolution_for(LensFacing::Back), Some(FHD));
    }

    #[test]
    fn test_resolution_uses_device_list_without_allow_list() {
        let mut state = SessionState::default();
        state.camera_info.front_camera = Some(device(LensFacing::Front, vec![HD, FHD]));
        assert_eq!(state.resolution_for(LensFacing::Front), Some(HD));
        assert_eq!(state.resolution_for(LensFacing::Back), None);
    }

    #[test]
    fn test_output_paths_are_sequenced() {
        let mut media = MediaState {
            output_directory: Some("/data/out/".into()),
            session_tag: "abc".into(),
            ..MediaState::default()
        };
        assert_eq!(media.next_video_path(), "/data/out/VID_abc_0001.mp4");
        assert_eq!(
            media.next_image_path(ImageFormat::Jpeg),
            "/data/out/IMG_abc_0002.jpeg"
        );
    }

    #[test]
    fn test_limits_follow_committed_media() {
        let mode = CameraMode {
            video_limit: Some(1),
            media_limit: Some(2),
            ..CameraMode::default()
        };
        let mut media = MediaState::default();
        media.recompute_limits(&mode);
        assert!(media.can_record_more());

        media.media.push(Media {
            id: "v1".into(),
            created_at: chrono::Utc::now(),
            file_path: "v1.mp4".into(),
            media_type: MediaType::Video,
            lens_facing: LensFacing::Back,
            orientation: Orientation::Portrait,
            resolution: FHD,
            rotation: SensorRotation::None,
            duration_millis: 1000,
        });
        media.recompute_limits(&mode);
        assert!(media.max_video_count_reached);
        assert!(!media.max_media_count_reached);
        assert!(!media.can_record_more());
        assert!(media.can_capture_more_images());
    }
}
