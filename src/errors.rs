// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera session

use thiserror::Error;

/// Result type alias using SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Main session error type
///
/// Only [`SessionError::Config`] and [`SessionError::Storage`] are ever
/// returned to callers of the public API. The remaining variants describe
/// why a transition was refused or cleaned up; reducers log them and turn
/// them into toast effects or no-ops instead of propagating them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Recording, focus or zoom operation failed in the capture engine
    #[error("Hardware failure: {0}")]
    HardwareFailure(#[from] EngineError),
    /// Session validation failed before setup
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),
    /// Capture attempted beyond a configured media limit
    #[error("Limit exceeded: {0}")]
    LimitExceeded(LimitKind),
    /// Event arrived for a state that cannot accept it
    #[error("Invalid transition: {event} while {state}")]
    InvalidTransition {
        event: &'static str,
        state: &'static str,
    },
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Which configured limit was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Video,
    Image,
    Media,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitKind::Video => write!(f, "video limit reached"),
            LimitKind::Image => write!(f, "image limit reached"),
            LimitKind::Media => write!(f, "media limit reached"),
        }
    }
}

/// Capture engine errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// No camera device with the requested id
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
    /// Preview could not be started
    #[error("Preview failed: {0}")]
    PreviewFailed(String),
    /// Failed to start recording
    #[error("Failed to start recording: {0}")]
    RecordingStartFailed(String),
    /// Recording failed mid-way or could not be finalized
    #[error("Recording failed: {0}")]
    RecordingFailed(String),
    /// Image capture failed
    #[error("Capture failed: {0}")]
    CaptureFailed(String),
    /// Camera is not connected
    #[error("Camera disconnected")]
    Disconnected,
    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_converts_to_hardware_failure() {
        let err: SessionError = EngineError::RecordingFailed("encoder stalled".into()).into();
        assert_eq!(
            err.to_string(),
            "Hardware failure: Recording failed: encoder stalled"
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = SessionError::InvalidTransition {
            event: "pause",
            state: "idle",
        };
        assert_eq!(err.to_string(), "Invalid transition: pause while idle");
    }

    #[test]
    fn test_limit_exceeded_display() {
        let err = SessionError::LimitExceeded(LimitKind::Video);
        assert_eq!(err.to_string(), "Limit exceeded: video limit reached");
    }
}
