// SPDX-License-Identifier: GPL-3.0-only

//! One-shot notifications to the presentation layer
//!
//! Effects travel over a [`broadcast`] channel of capacity one. A receiver
//! that falls behind skips straight to the newest effect, so a stale toast is
//! dropped in favour of a fresh one. Effects published while nobody is
//! subscribed are discarded.

use crate::backends::camera::{FocusState, LensFacing, Resolution};
use crate::session::capture_config::FlashMode;
use crate::session::media::{Media, MediaType};
use crate::session::state::IndicatorPosition;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::debug;

/// Outbound notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Effect {
    /// Close the camera without returning media
    ClosePreview,
    /// Analytics event
    SendEvent(CameraEvent),
    /// Close the camera and hand the committed media to the caller
    ClosePreviewWithResult(Vec<Media>),
    ShowFocusIndicator {
        position: IndicatorPosition,
        focus_state: FocusState,
    },
    ReportAuthenticationError,
    ReportProperlyAuthenticated,
    ShowToastMessage(String),
    DismissToast,
}

/// Analytics event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CameraEventType {
    RecordingStarted,
    RecordingFinished,
    RecordingPaused,
    RecordingResumed,
    ImageTaken,
    CameraDeviceChanged,
    FlashModeChanged,
    ZoomChanged,
    MediaDeleted,
    MediaDiscarded,
}

impl CameraEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraEventType::RecordingStarted => "RECORDING_STARTED",
            CameraEventType::RecordingFinished => "RECORDING_FINISHED",
            CameraEventType::RecordingPaused => "RECORDING_PAUSED",
            CameraEventType::RecordingResumed => "RECORDING_RESUMED",
            CameraEventType::ImageTaken => "IMAGE_TAKEN",
            CameraEventType::CameraDeviceChanged => "CAMERA_DEVICE_CHANGED",
            CameraEventType::FlashModeChanged => "FLASH_MODE_CHANGED",
            CameraEventType::ZoomChanged => "ZOOM_CHANGED",
            CameraEventType::MediaDeleted => "MEDIA_DELETED",
            CameraEventType::MediaDiscarded => "MEDIA_DISCARDED",
        }
    }
}

impl std::fmt::Display for CameraEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an analytics event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CameraEventData {
    RecordingStarted {
        lens_facing: LensFacing,
        resolution: Option<Resolution>,
    },
    RecordingFinished {
        duration_millis: u64,
        max_duration_reached: bool,
    },
    RecordingPaused {
        elapsed_time_millis: u64,
    },
    RecordingResumed {
        elapsed_time_millis: u64,
    },
    ImageTaken {
        lens_facing: LensFacing,
        resolution: Resolution,
    },
    CameraDeviceChanged {
        lens_facing: LensFacing,
    },
    FlashModeChanged {
        flash: FlashMode,
    },
    ZoomChanged {
        zoom_level: f32,
    },
    MediaDeleted {
        media_type: MediaType,
    },
    MediaDiscarded {
        count: usize,
    },
}

impl CameraEventData {
    pub fn event_type(&self) -> CameraEventType {
        match self {
            CameraEventData::RecordingStarted { .. } => CameraEventType::RecordingStarted,
            CameraEventData::RecordingFinished { .. } => CameraEventType::RecordingFinished,
            CameraEventData::RecordingPaused { .. } => CameraEventType::RecordingPaused,
            CameraEventData::RecordingResumed { .. } => CameraEventType::RecordingResumed,
            CameraEventData::ImageTaken { .. } => CameraEventType::ImageTaken,
            CameraEventData::CameraDeviceChanged { .. } => CameraEventType::CameraDeviceChanged,
            CameraEventData::FlashModeChanged { .. } => CameraEventType::FlashModeChanged,
            CameraEventData::ZoomChanged { .. } => CameraEventType::ZoomChanged,
            CameraEventData::MediaDeleted { .. } => CameraEventType::MediaDeleted,
            CameraEventData::MediaDiscarded { .. } => CameraEventType::MediaDiscarded,
        }
    }
}

/// Timestamped analytics event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraEvent {
    pub data: CameraEventData,
    pub created_at: DateTime<Utc>,
}

impl CameraEvent {
    /// Stamp `data` with the current time
    pub fn now(data: CameraEventData) -> Self {
        Self {
            data,
            created_at: Utc::now(),
        }
    }

    pub fn event_type(&self) -> CameraEventType {
        self.data.event_type()
    }
}

/// Publishing half of the effect channel
#[derive(Debug, Clone)]
pub struct EffectSender {
    tx: broadcast::Sender<Effect>,
}

/// Subscribing half of the effect channel
#[derive(Debug)]
pub struct EffectReceiver {
    rx: broadcast::Receiver<Effect>,
}

/// Create the effect channel
pub fn effect_channel() -> EffectSender {
    let (tx, _) = broadcast::channel(1);
    EffectSender { tx }
}

impl EffectSender {
    /// Publish an effect, displacing any unread one
    pub fn publish(&self, effect: Effect) {
        if self.tx.send(effect).is_err() {
            debug!("Effect dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> EffectReceiver {
        EffectReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl EffectReceiver {
    /// Wait for the next effect
    ///
    /// Returns `None` once the session is gone.
    pub async fn recv(&mut self) -> Option<Effect> {
        loop {
            match self.rx.recv().await {
                Ok(effect) => return Some(effect),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Stale effects dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the pending effect without waiting
    pub fn try_recv(&mut self) -> Option<Effect> {
        loop {
            match self.rx.try_recv() {
                Ok(effect) => return Some(effect),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Stale effects dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_newest_effect_wins() {
        let sender = effect_channel();
        let mut receiver = sender.subscribe();

        sender.publish(Effect::ShowToastMessage("first".into()));
        sender.publish(Effect::ShowToastMessage("second".into()));
        sender.publish(Effect::DismissToast);

        assert_eq!(receiver.recv().await, Some(Effect::DismissToast));
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_effects_without_subscribers_are_dropped() {
        let sender = effect_channel();
        sender.publish(Effect::ClosePreview);

        let mut receiver = sender.subscribe();
        assert_eq!(receiver.try_recv(), None);
        sender.publish(Effect::ReportProperlyAuthenticated);
        assert_eq!(receiver.try_recv(), Some(Effect::ReportProperlyAuthenticated));
    }

    #[tokio::test]
    async fn test_receiver_ends_when_sender_dropped() {
        let sender = effect_channel();
        let mut receiver = sender.subscribe();
        drop(sender);
        assert_eq!(receiver.recv().await, None);
    }

    #[test]
    fn test_event_type_names() {
        let data = CameraEventData::ZoomChanged { zoom_level: 2.0 };
        assert_eq!(data.event_type().to_string(), "ZOOM_CHANGED");
        let json = serde_json::to_value(&data).expect("serializable");
        assert_eq!(json["type"], "ZOOM_CHANGED");
    }
}
