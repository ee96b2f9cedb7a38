// SPDX-License-Identifier: GPL-3.0-only

//! Captured media items

use crate::backends::camera::{LensFacing, Resolution, SensorRotation};
use crate::orientation::Orientation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Video,
    Image,
}

/// A finished video or image owned by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub file_path: String,
    pub media_type: MediaType,
    pub lens_facing: LensFacing,
    pub orientation: Orientation,
    /// Resolution after `rotation` has been applied
    pub resolution: Resolution,
    /// Clockwise rotation to display the media upright
    pub rotation: SensorRotation,
    /// Length of a video, zero for images
    pub duration_millis: u64,
}

impl Media {
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }
}

/// Count the media of one kind
pub fn count_of(media: &[Media], media_type: MediaType) -> usize {
    media.iter().filter(|m| m.media_type == media_type).count()
}

/// Stable identifier derived from the file name
pub fn media_id(file_path: &str) -> String {
    std::path::Path::new(file_path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string())
}
