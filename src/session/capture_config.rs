// SPDX-License-Identifier: GPL-3.0-only

//! Capture configuration model
//!
//! [`CaptureConfig`] describes what the capture engine should do with the
//! sensor (template, focus, white balance, flash and zoom). It is replaced
//! wholesale on every change through the `with_*` builders and is never
//! mutated in place.

use crate::backends::camera::{MeteringRectangle, SensorRect, SensorRotation};
use crate::constants::{
    MAX_ZOOM_LEVEL, METERING_AREA_FRACTION, METERING_WEIGHT_MAX, MIN_ZOOM_LEVEL,
};
use serde::{Deserialize, Serialize};

/// Capture request template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaptureTemplate {
    #[default]
    Preview,
    StillCapture,
    Record,
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutoFocusMode {
    #[default]
    Off,
    Auto,
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutoFocusTrigger {
    #[default]
    Off,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutoWhiteBalanceMode {
    Off,
    #[default]
    Auto,
}

/// Flash behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashMode {
    #[default]
    Off,
    /// Fires once per still capture
    Single,
    /// Continuously lit, used while recording
    Torch,
}

impl FlashMode {
    pub fn enabled(&self) -> bool {
        *self != FlashMode::Off
    }

    /// Next mode when the flash button is pressed
    ///
    /// Image-only sessions switch to a momentary flash, every other session
    /// switches to torch so the light stays on while recording.
    pub fn toggled(&self, image_only: bool) -> Self {
        match self {
            FlashMode::Off if image_only => FlashMode::Single,
            FlashMode::Off => FlashMode::Torch,
            _ => FlashMode::Off,
        }
    }

    /// Mode to use while not writing video frames
    pub fn momentary(&self) -> Self {
        if self.enabled() {
            FlashMode::Single
        } else {
            FlashMode::Off
        }
    }

    /// Mode to use while recording
    pub fn continuous(&self) -> Self {
        if self.enabled() {
            FlashMode::Torch
        } else {
            FlashMode::Off
        }
    }
}

impl std::fmt::Display for FlashMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlashMode::Off => write!(f, "off"),
            FlashMode::Single => write!(f, "single"),
            FlashMode::Torch => write!(f, "torch"),
        }
    }
}

/// Sensor-level capture intent handed to the capture engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub template: CaptureTemplate,
    pub auto_focus: AutoFocusMode,
    pub auto_focus_trigger: AutoFocusTrigger,
    pub auto_white_balance: AutoWhiteBalanceMode,
    pub flash: FlashMode,
    pub focus_area: Option<MeteringRectangle>,
    pub zoom_area: Option<SensorRect>,
    /// Always within `MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL`
    pub zoom_level: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            template: CaptureTemplate::Preview,
            auto_focus: AutoFocusMode::Off,
            auto_focus_trigger: AutoFocusTrigger::Off,
            auto_white_balance: AutoWhiteBalanceMode::Auto,
            flash: FlashMode::Off,
            focus_area: None,
            zoom_area: None,
            zoom_level: MIN_ZOOM_LEVEL,
        }
    }
}

impl CaptureConfig {
    pub fn flash_enabled(&self) -> bool {
        self.flash.enabled()
    }

    pub fn with_flash(&self, flash: FlashMode) -> Self {
        Self {
            flash,
            ..self.clone()
        }
    }

    /// Metering-area auto-focus on the given region
    pub fn with_focus_area(&self, area: MeteringRectangle) -> Self {
        Self {
            auto_focus: AutoFocusMode::Auto,
            focus_area: Some(area),
            ..self.clone()
        }
    }

    /// Zoom to `level`, cropping the sensor accordingly
    pub fn with_zoom(&self, level: f32, sensor: SensorRect) -> Self {
        let level = clamp_zoom(level);
        Self {
            zoom_level: level,
            zoom_area: Some(zoom_rectangle(level, sensor)),
            ..self.clone()
        }
    }

    /// Settings while video frames are being written
    pub fn for_recording(&self) -> Self {
        Self {
            template: CaptureTemplate::Record,
            auto_focus: AutoFocusMode::Continuous,
            auto_white_balance: AutoWhiteBalanceMode::Auto,
            flash: self.flash.continuous(),
            ..self.clone()
        }
    }

    /// Settings once a recording has ended
    pub fn for_idle(&self) -> Self {
        Self {
            template: CaptureTemplate::Preview,
            auto_focus: AutoFocusMode::Auto,
            auto_white_balance: AutoWhiteBalanceMode::Auto,
            flash: self.flash.momentary(),
            ..self.clone()
        }
    }

    /// Settings for a paused recording: live preview, no video written
    pub fn for_preview(&self) -> Self {
        Self {
            template: CaptureTemplate::Preview,
            auto_focus: AutoFocusMode::Auto,
            auto_white_balance: AutoWhiteBalanceMode::Off,
            flash: self.flash.momentary(),
            ..self.clone()
        }
    }
}

/// Clamp a zoom level into the supported range
pub fn clamp_zoom(level: f32) -> f32 {
    if level.is_nan() {
        return MIN_ZOOM_LEVEL;
    }
    level.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL)
}

/// Centered crop of the sensor for a zoom level
pub fn zoom_rectangle(level: f32, sensor: SensorRect) -> SensorRect {
    let level = clamp_zoom(level);
    let center_x = sensor.width() / 2;
    let center_y = sensor.height() / 2;
    let delta_x = ((0.5 * sensor.width() as f32) / level) as i32;
    let delta_y = ((0.5 * sensor.height() as f32) / level) as i32;
    SensorRect::new(
        center_x - delta_x,
        center_y - delta_y,
        center_x + delta_x,
        center_y + delta_y,
    )
}

/// Metering rectangle around a touch point on the preview
///
/// The touch point is normalized to the viewport, rotated back by the sensor
/// mounting angle around the viewport centre and scaled to the sensor array.
/// The region covers `METERING_AREA_FRACTION` of each sensor dimension and is
/// clamped to the sensor bounds.
pub fn focus_rectangle(
    touch_x: f32,
    touch_y: f32,
    viewport_width: u32,
    viewport_height: u32,
    sensor: SensorRect,
    sensor_rotation: SensorRotation,
) -> Option<MeteringRectangle> {
    if viewport_width == 0 || viewport_height == 0 {
        return None;
    }

    let nx = (touch_x / viewport_width as f32).clamp(0.0, 1.0);
    let ny = (touch_y / viewport_height as f32).clamp(0.0, 1.0);

    // Rotate by -sensor_rotation around (0.5, 0.5)
    let (rx, ry) = match sensor_rotation {
        SensorRotation::None => (nx, ny),
        SensorRotation::Rotate90 => (ny, 1.0 - nx),
        SensorRotation::Rotate180 => (1.0 - nx, 1.0 - ny),
        SensorRotation::Rotate270 => (1.0 - ny, nx),
    };

    let width = sensor.width();
    let height = sensor.height();
    let px = rx * width as f32;
    let py = ry * height as f32;
    let half_w = METERING_AREA_FRACTION * width as f32 / 2.0;
    let half_h = METERING_AREA_FRACTION * height as f32 / 2.0;

    let rect = SensorRect::new(
        ((px - half_w) as i32).clamp(0, width),
        ((py - half_h) as i32).clamp(0, height),
        ((px + half_w) as i32).clamp(0, width),
        ((py + half_h) as i32).clamp(0, height),
    );

    Some(MeteringRectangle {
        rect,
        weight: METERING_WEIGHT_MAX,
    })
}
