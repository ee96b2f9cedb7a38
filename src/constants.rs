// SPDX-License-Identifier: GPL-3.0-only

//! Session-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Directory name under the user data directory
pub const APP_DIR_NAME: &str = "camera-session";

/// Lowest zoom level (no crop)
pub const MIN_ZOOM_LEVEL: f32 = 1.0;

/// Highest zoom level accepted from the UI
pub const MAX_ZOOM_LEVEL: f32 = 10.0;

/// Fraction of each sensor dimension covered by a tap-to-focus region
pub const METERING_AREA_FRACTION: f32 = 0.1;

/// Weight given to tap-to-focus metering regions
pub const METERING_WEIGHT_MAX: u32 = 1000;

/// Size in pixels of the focus indicator drawn around a tap
pub const FOCUS_INDICATOR_SIZE: f32 = 80.0;

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Interval between stopwatch updates while recording
    pub const STOPWATCH_INTERVAL: Duration = Duration::from_millis(1000);

    /// How long a toast stays visible before it is dismissed
    pub const TOAST_DURATION: Duration = Duration::from_millis(5000);
}

/// User-visible toast messages
pub mod messages {
    pub const VIDEO_LIMIT_REACHED: &str =
        "You have reached the maximum number of videos for this session";
    pub const IMAGE_LIMIT_REACHED: &str =
        "You have reached the maximum number of images for this session";
    pub const MAX_DURATION_REACHED: &str = "Maximum video duration reached";
    pub const RECORDING_FAILED: &str = "Recording failed";
    pub const IMAGE_CAPTURE_FAILED: &str = "Could not take the picture";
    pub const ZOOM_FAILED: &str = "Could not change the zoom";
}

/// Output image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    #[default]
    Png,
}

impl ImageFormat {
    /// Get all format variants for UI iteration
    pub const ALL: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];

    /// File extension written by the capture engine
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }

    /// Get display name for the format
    pub fn display_name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
        }
    }
}

/// File extension of recorded videos
pub const VIDEO_EXTENSION: &str = "mp4";

/// Severity attached to `Log` configuration events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogSeverity {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogSeverity {
    pub const ALL: [LogSeverity; 4] = [
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warning,
        LogSeverity::Error,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            LogSeverity::Debug => "debug",
            LogSeverity::Info => "info",
            LogSeverity::Warning => "warning",
            LogSeverity::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_format_extensions() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::default(), ImageFormat::Png);
    }

    #[test]
    fn test_zoom_bounds_are_ordered() {
        assert!(MIN_ZOOM_LEVEL < MAX_ZOOM_LEVEL);
    }
}
