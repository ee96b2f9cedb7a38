// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::{LensFacing, Resolution};
use crate::constants::{ImageFormat, timing};
use crate::errors::{SessionError, SessionResult};
use crate::orientation::Orientation;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Media limits and behaviour for one session
///
/// A limit of `None` means unlimited, `Some(0)` disables that kind of capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraMode {
    /// Maximum number of videos
    pub video_limit: Option<u32>,
    /// Maximum number of images
    pub image_limit: Option<u32>,
    /// Maximum number of media items of any kind
    pub media_limit: Option<u32>,
    /// Maximum length of a single video in milliseconds
    pub video_duration_limit: Option<u64>,
    /// Close the session with its media as soon as a video is finished
    pub auto_close: bool,
}

impl CameraMode {
    /// Unlimited videos and images
    pub fn video_and_image() -> Self {
        Self::default()
    }

    /// Exactly one video, then the session closes
    pub fn single_video(duration_limit: Option<u64>) -> Self {
        Self {
            video_limit: Some(1),
            image_limit: Some(0),
            media_limit: Some(1),
            video_duration_limit: duration_limit,
            auto_close: true,
        }
    }

    /// Exactly one image, then the session closes
    pub fn single_image() -> Self {
        Self {
            video_limit: Some(0),
            image_limit: Some(1),
            media_limit: Some(1),
            video_duration_limit: None,
            auto_close: true,
        }
    }

    /// One item of either kind
    pub fn single_video_or_image(duration_limit: Option<u64>) -> Self {
        Self {
            video_limit: None,
            image_limit: None,
            media_limit: Some(1),
            video_duration_limit: duration_limit,
            auto_close: true,
        }
    }

    /// Videos only
    pub fn video(limit: Option<u32>, duration_limit: Option<u64>) -> Self {
        Self {
            video_limit: limit,
            image_limit: Some(0),
            media_limit: None,
            video_duration_limit: duration_limit,
            auto_close: false,
        }
    }

    /// Images only
    pub fn image(limit: Option<u32>) -> Self {
        Self {
            video_limit: Some(0),
            image_limit: limit,
            media_limit: None,
            video_duration_limit: None,
            auto_close: false,
        }
    }

    pub fn can_take_video(&self) -> bool {
        self.media_limit != Some(0) && self.video_limit != Some(0)
    }

    pub fn can_take_image(&self) -> bool {
        self.media_limit != Some(0) && self.image_limit != Some(0)
    }

    /// Only images can be captured; the flash button then cycles a momentary flash
    pub fn is_image_only(&self) -> bool {
        self.can_take_image() && !self.can_take_video()
    }

    pub fn is_single_media_mode(&self) -> bool {
        self.media_limit == Some(1)
    }
}

/// Externally supplied setup applied when a session is configured
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory where finished media is written
    pub output_path: Option<String>,
    /// Start with the flash armed
    pub flash_on_by_default: bool,
    /// Lens opened when the session starts
    pub lens_facing: LensFacing,
    /// Encoding of still images
    pub image_format: ImageFormat,
    /// Lock the session to a single orientation
    pub orientation: Option<Orientation>,
    /// Preferred back camera resolution
    pub back_resolution: Option<Resolution>,
    /// Preferred front camera resolution
    pub front_resolution: Option<Resolution>,
    /// Allowed back camera resolutions (empty = anything the device offers)
    pub back_resolutions: Vec<Resolution>,
    /// Allowed front camera resolutions (empty = anything the device offers)
    pub front_resolutions: Vec<Resolution>,
    /// Media limits
    pub mode: CameraMode,
}

impl SessionConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> SessionResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| SessionError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> SessionResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Preferred resolution for a lens
    pub fn default_resolution(&self, facing: LensFacing) -> Option<Resolution> {
        match facing {
            LensFacing::Back => self.back_resolution,
            LensFacing::Front => self.front_resolution,
        }
    }

    /// Allow-list of resolutions for a lens
    pub fn allowed_resolutions(&self, facing: LensFacing) -> &[Resolution] {
        match facing {
            LensFacing::Back => &self.back_resolutions,
            LensFacing::Front => &self.front_resolutions,
        }
    }
}

/// Runtime tuning of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Interval between stopwatch updates
    pub stopwatch_interval: Duration,
    /// How long toasts stay up before being dismissed
    pub toast_duration: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            stopwatch_interval: timing::STOPWATCH_INTERVAL,
            toast_duration: timing::TOAST_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_capabilities() {
        let mode = CameraMode::video_and_image();
        assert!(mode.can_take_video());
        assert!(mode.can_take_image());
        assert!(!mode.is_single_media_mode());

        let mode = CameraMode::image(Some(3));
        assert!(!mode.can_take_video());
        assert!(mode.is_image_only());

        let mode = CameraMode::single_video(Some(10_000));
        assert!(mode.can_take_video());
        assert!(!mode.can_take_image());
        assert!(mode.is_single_media_mode());
        assert!(mode.auto_close);
    }

    #[test]
    fn test_zero_media_limit_disables_everything() {
        let mode = CameraMode {
            media_limit: Some(0),
            ..CameraMode::default()
        };
        assert!(!mode.can_take_video());
        assert!(!mode.can_take_image());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"flash_on_by_default": true}"#).expect("valid json");
        assert!(config.flash_on_by_default);
        assert_eq!(config.lens_facing, LensFacing::Back);
        assert_eq!(config.mode, CameraMode::video_and_image());
    }
}
