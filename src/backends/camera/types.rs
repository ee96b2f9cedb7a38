// SPDX-License-Identifier: GPL-3.0-only
// Shared types for the capture engine abstraction

//! Shared types for capture engines

use crate::errors::EngineError;
use serde::{Deserialize, Serialize};

/// Result type for capture engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Which side of the device a lens faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LensFacing {
    #[default]
    Back,
    Front,
}

impl LensFacing {
    /// The opposite lens
    pub fn reversed(&self) -> Self {
        match self {
            LensFacing::Back => LensFacing::Front,
            LensFacing::Front => LensFacing::Back,
        }
    }

    pub fn is_front(&self) -> bool {
        *self == LensFacing::Front
    }
}

impl std::fmt::Display for LensFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensFacing::Back => write!(f, "back"),
            LensFacing::Front => write!(f, "front"),
        }
    }
}

/// Capture resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Short quality label shown in the resolution picker
    ///
    /// - 4K: width 3840 and above
    /// - FHD: width 1920 and above
    /// - HD: width 1280 and above
    /// - SD: anything smaller
    pub fn label(&self) -> &'static str {
        match self.width {
            w if w >= 3840 => "4K",
            w if w >= 1920 => "FHD",
            w if w >= 1280 => "HD",
            _ => "SD",
        }
    }

    /// Same resolution with width and height exchanged
    pub fn swapped(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Sensor mounting rotation relative to the device's natural orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SensorRotation {
    /// No rotation (sensor is oriented correctly)
    #[default]
    None,
    /// 90 degrees clockwise
    Rotate90,
    /// 180 degrees (upside down)
    Rotate180,
    /// 270 degrees clockwise (90 degrees counter-clockwise)
    Rotate270,
}

impl SensorRotation {
    /// All four mounting classes
    pub const ALL: [SensorRotation; 4] = [
        SensorRotation::None,
        SensorRotation::Rotate90,
        SensorRotation::Rotate180,
        SensorRotation::Rotate270,
    ];

    /// Create rotation from an integer degree value (normalised to 0-360).
    ///
    /// Values that are not a multiple of 90 fall back to no rotation.
    pub fn from_degrees_int(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => SensorRotation::Rotate90,
            180 => SensorRotation::Rotate180,
            270 => SensorRotation::Rotate270,
            _ => SensorRotation::None,
        }
    }

    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            SensorRotation::None => 0,
            SensorRotation::Rotate90 => 90,
            SensorRotation::Rotate180 => 180,
            SensorRotation::Rotate270 => 270,
        }
    }

    /// Check if rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, SensorRotation::Rotate90 | SensorRotation::Rotate270)
    }
}

impl std::fmt::Display for SensorRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Axis-aligned rectangle in sensor pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl SensorRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle anchored at the origin with the given size
    pub const fn with_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Metering region used for auto-focus, with its weight (0..=1000)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringRectangle {
    pub rect: SensorRect,
    pub weight: u32,
}

/// Capabilities of one physical (or logical) camera
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    /// Engine-specific device id
    pub id: String,
    pub lens_facing: LensFacing,
    /// Resolutions the sensor can deliver
    pub resolutions: Vec<Resolution>,
    /// Device has a flash unit
    pub with_flash: bool,
    /// Device supports metering-area auto-focus
    pub tap_to_focus_enabled: bool,
    /// Fixed mounting orientation of the sensor
    pub sensor_orientation: SensorRotation,
    /// Active array size of the sensor
    pub sensor_size: SensorRect,
    /// Device is a logical multi-camera
    pub logical_camera: bool,
}

impl std::fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, sensor {})",
            self.id, self.lens_facing, self.sensor_orientation
        )
    }
}

/// Enumerated cameras of the device, captured once at session start
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CameraInformation {
    pub front_camera: Option<CameraDevice>,
    pub back_camera: Option<CameraDevice>,
}

impl CameraInformation {
    /// Both lenses are present so the user can switch between them
    pub fn can_flip_camera(&self) -> bool {
        self.front_camera.is_some() && self.back_camera.is_some()
    }

    /// Look up the device for a lens
    pub fn device(&self, facing: LensFacing) -> Option<&CameraDevice> {
        match facing {
            LensFacing::Back => self.back_camera.as_ref(),
            LensFacing::Front => self.front_camera.as_ref(),
        }
    }
}

/// Auto-focus progress reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FocusState {
    #[default]
    Idle,
    Started,
    FocusedLocked,
    Failed,
}

/// Opaque handle to the presentation surface the preview renders into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceRef(pub String);

/// Progress of a still-image capture
#[derive(Debug, Clone, PartialEq)]
pub enum ImageCaptureEvent {
    Started,
    FocusStarted,
    FocusLocked,
    FocusFailed,
    /// Image written by the engine
    Captured {
        file_path: String,
        resolution: Resolution,
    },
    Failed(EngineError),
}

/// Recording lifecycle as observed by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingEvent {
    Started,
    Paused,
    Resumed,
    Stopped { max_duration_reached: bool },
    MaxDurationReached,
    Exception(EngineError),
}

/// Camera connectivity as observed by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectivityEvent {
    Connected,
    Disconnected,
    Error(EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_labels() {
        assert_eq!(Resolution::new(3840, 2160).label(), "4K");
        assert_eq!(Resolution::new(1920, 1080).label(), "FHD");
        assert_eq!(Resolution::new(1280, 720).label(), "HD");
        assert_eq!(Resolution::new(640, 480).label(), "SD");
    }

    #[test]
    fn test_resolution_aspect_ratio_handles_zero_height() {
        assert_eq!(Resolution::new(1920, 0).aspect_ratio(), 0.0);
        assert!((Resolution::new(1920, 1080).aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_sensor_rotation_normalises_degrees() {
        assert_eq!(SensorRotation::from_degrees_int(-90), SensorRotation::Rotate270);
        assert_eq!(SensorRotation::from_degrees_int(450), SensorRotation::Rotate90);
        assert_eq!(SensorRotation::from_degrees_int(45), SensorRotation::None);
    }

    #[test]
    fn test_can_flip_requires_both_lenses() {
        let device = CameraDevice {
            id: "0".into(),
            lens_facing: LensFacing::Back,
            resolutions: vec![],
            with_flash: false,
            tap_to_focus_enabled: false,
            sensor_orientation: SensorRotation::Rotate90,
            sensor_size: SensorRect::with_size(4000, 3000),
            logical_camera: false,
        };
        let mut info = CameraInformation {
            front_camera: None,
            back_camera: Some(device.clone()),
        };
        assert!(!info.can_flip_camera());
        info.front_camera = Some(CameraDevice {
            id: "1".into(),
            lens_facing: LensFacing::Front,
            ..device
        });
        assert!(info.can_flip_camera());
        assert_eq!(info.device(LensFacing::Front).map(|d| d.id.as_str()), Some("1"));
    }
}
