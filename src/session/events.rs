// SPDX-License-Identifier: GPL-3.0-only

//! Session input events
//!
//! Every input to the reducer pipeline is an [`Event`], partitioned by the
//! domain reducer that handles it. UI intents, follow-up task results,
//! stopwatch ticks and hardware callbacks all arrive through the same type.

use crate::backends::camera::{
    ConnectivityEvent, FocusState, LensFacing, Resolution, SensorRotation, SurfaceRef, ZoomEvent,
};
use crate::config::SessionConfig;
use crate::constants::LogSeverity;
use crate::errors::EngineError;
use crate::orientation::Orientation;
use crate::session::media::Media;
use crate::session::state::ZoomIndicatorMode;
use chrono::{DateTime, Utc};

/// Any input to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Controls(ControlsEvent),
    Ui(UiEvent),
    Media(MediaEvent),
    Configuration(ConfigurationEvent),
}

impl Event {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::Controls(e) => e.name(),
            Event::Ui(e) => e.name(),
            Event::Media(e) => e.name(),
            Event::Configuration(e) => e.name(),
        }
    }
}

/// Preview, lens and sensor control
#[derive(Debug, Clone, PartialEq)]
pub enum ControlsEvent {
    // ===== User intents =====
    StartPreview {
        surface: SurfaceRef,
        width: u32,
        height: u32,
    },
    ClosePreview,
    FlashButtonPressed,
    FlipLensButtonPressed,
    TapToFocus {
        x: f32,
        y: f32,
    },
    ZoomLevelChanged(f32),
    ZoomLevelScaled(f32),
    AppBackground,
    AppForeground,

    // ===== Follow-ups and hardware =====
    /// Progress of a tap-to-focus request
    FocusStateChanged(FocusState),
    /// Outcome of a zoom request
    ///
    /// `previous` is the level that was active before `level` was requested.
    ZoomResult {
        level: f32,
        previous: f32,
        result: ZoomEvent,
    },
    /// Camera connectivity changed
    Connectivity(ConnectivityEvent),
}

impl ControlsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ControlsEvent::StartPreview { .. } => "start-preview",
            ControlsEvent::ClosePreview => "close-preview",
            ControlsEvent::FlashButtonPressed => "flash-button",
            ControlsEvent::FlipLensButtonPressed => "flip-lens-button",
            ControlsEvent::TapToFocus { .. } => "tap-to-focus",
            ControlsEvent::ZoomLevelChanged(_) => "zoom-level",
            ControlsEvent::ZoomLevelScaled(_) => "zoom-scaled",
            ControlsEvent::AppBackground => "app-background",
            ControlsEvent::AppForeground => "app-foreground",
            ControlsEvent::FocusStateChanged(_) => "focus-state",
            ControlsEvent::ZoomResult { .. } => "zoom-result",
            ControlsEvent::Connectivity(_) => "connectivity",
        }
    }
}

/// Presentation-only toggles
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ZoomIndicatorModeChanged(ZoomIndicatorMode),
    CurrentResolutionChanged(Resolution),
    OrientationChanged(Orientation),
    ResolutionsButtonPressed,
    ResolutionsPanelClosed,
    ContinueButtonPressed,
    MediaCounterButtonPressed,
    MediaCounterClosed,
    MediaDetailPressed(Media),
    MediaDetailDismissed,
    ShowDiscardPanel,
    DismissDiscardPanel,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::ZoomIndicatorModeChanged(_) => "zoom-indicator-mode",
            UiEvent::CurrentResolutionChanged(_) => "resolution-changed",
            UiEvent::OrientationChanged(_) => "orientation-changed",
            UiEvent::ResolutionsButtonPressed => "resolutions-button",
            UiEvent::ResolutionsPanelClosed => "resolutions-closed",
            UiEvent::ContinueButtonPressed => "continue-button",
            UiEvent::MediaCounterButtonPressed => "media-counter-button",
            UiEvent::MediaCounterClosed => "media-counter-closed",
            UiEvent::MediaDetailPressed(_) => "media-detail",
            UiEvent::MediaDetailDismissed => "media-detail-dismissed",
            UiEvent::ShowDiscardPanel => "show-discard-panel",
            UiEvent::DismissDiscardPanel => "dismiss-discard-panel",
        }
    }
}

/// Recording, capture and media bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    // ===== User intents =====
    TakeImageButtonPressed,
    CaptureButtonPressed,
    PauseButtonPressed,
    DeleteMediaButtonPressed(Media),
    DiscardAllMedia,

    // ===== Follow-ups =====
    /// The engine wrote a still image
    ///
    /// Lens, orientation and rotation are the values fixed when the capture
    /// was requested.
    ImageCaptured {
        file_path: String,
        resolution: Resolution,
        lens_facing: LensFacing,
        orientation: Orientation,
        rotation: SensorRotation,
        captured_at: DateTime<Utc>,
    },
    /// The engine refused to start a recording
    RecordingStartFailed(EngineError),
    /// The engine refused a pause, resume or stop request
    RecordingControlFailed(RecordingControl, EngineError),
    /// Stopwatch update while recording
    RecordingTimerUpdated(u64),

    // ===== Hardware recording lifecycle =====
    RecordingStarted,
    RecordingPaused,
    RecordingResumed,
    RecordingStopped {
        max_duration_reached: bool,
        /// Stopwatch reading when the stop was observed
        elapsed_millis: u64,
        stopped_at: DateTime<Utc>,
    },
    MaxDurationReached,
    RecordingFailed(EngineError),
}

impl MediaEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MediaEvent::TakeImageButtonPressed => "take-image-button",
            MediaEvent::CaptureButtonPressed => "capture-button",
            MediaEvent::PauseButtonPressed => "pause-button",
            MediaEvent::DeleteMediaButtonPressed(_) => "delete-media",
            MediaEvent::DiscardAllMedia => "discard-all-media",
            MediaEvent::ImageCaptured { .. } => "image-captured",
            MediaEvent::RecordingStartFailed(_) => "recording-start-failed",
            MediaEvent::RecordingControlFailed(..) => "recording-control-failed",
            MediaEvent::RecordingTimerUpdated(_) => "recording-timer",
            MediaEvent::RecordingStarted => "recording-started",
            MediaEvent::RecordingPaused => "recording-paused",
            MediaEvent::RecordingResumed => "recording-resumed",
            MediaEvent::RecordingStopped { .. } => "recording-stopped",
            MediaEvent::MaxDurationReached => "max-duration-reached",
            MediaEvent::RecordingFailed(_) => "recording-failed",
        }
    }
}

/// Engine request made on an open recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingControl {
    Pause,
    Resume,
    Stop,
}

impl RecordingControl {
    pub fn name(&self) -> &'static str {
        match self {
            RecordingControl::Pause => "pause",
            RecordingControl::Resume => "resume",
            RecordingControl::Stop => "stop",
        }
    }
}

/// Session setup, authentication and permissions
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationEvent {
    SetUpConfig(SessionConfig),
    ValidateAuthentication,
    /// Result of an authentication check
    AuthenticationValidated(Result<(), String>),
    PermissionsGranted,
    Log {
        event_name: String,
        message: String,
        severity: LogSeverity,
    },
}

impl ConfigurationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ConfigurationEvent::SetUpConfig(_) => "set-up-config",
            ConfigurationEvent::ValidateAuthentication => "validate-authentication",
            ConfigurationEvent::AuthenticationValidated(_) => "authentication-validated",
            ConfigurationEvent::PermissionsGranted => "permissions-granted",
            ConfigurationEvent::Log { .. } => "log",
        }
    }
}

impl From<ControlsEvent> for Event {
    fn from(event: ControlsEvent) -> Self {
        Event::Controls(event)
    }
}

impl From<UiEvent> for Event {
    fn from(event: UiEvent) -> Self {
        Event::Ui(event)
    }
}

impl From<MediaEvent> for Event {
    fn from(event: MediaEvent) -> Self {
        Event::Media(event)
    }
}

impl From<ConfigurationEvent> for Event {
    fn from(event: ConfigurationEvent) -> Self {
        Event::Configuration(event)
    }
}
