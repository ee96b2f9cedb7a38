// SPDX-License-Identifier: GPL-3.0-only

//! Device orientation and media rotation
//!
//! Captured frames come off the sensor in its mounting orientation. To make
//! media display upright the session stores a clockwise rotation alongside
//! each item, resolved from the sensor mounting class and the device's UI
//! orientation at capture time.

use crate::backends::camera::SensorRotation;
use serde::{Deserialize, Serialize};

/// UI orientation of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    LandscapeLeft,
    LandscapeRight,
    PortraitReverse,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Portrait,
        Orientation::LandscapeLeft,
        Orientation::LandscapeRight,
        Orientation::PortraitReverse,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::LandscapeLeft => "landscape-left",
            Orientation::LandscapeRight => "landscape-right",
            Orientation::PortraitReverse => "portrait-reverse",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Clockwise rotation to apply to captured media so it displays upright
///
/// Sensors mounted at 90° or 270° are portrait-class sensors and need a
/// correction for every device orientation. Sensors mounted at 0° or 180°
/// are landscape-class and are never rotated.
pub fn media_rotation(sensor: SensorRotation, device: Orientation) -> SensorRotation {
    use Orientation::*;
    use SensorRotation::*;

    match (sensor, device) {
        (Rotate90, Portrait) => Rotate90,
        (Rotate90, LandscapeLeft) => None,
        (Rotate90, LandscapeRight) => Rotate180,
        (Rotate90, PortraitReverse) => Rotate270,

        (Rotate270, Portrait) => Rotate270,
        (Rotate270, LandscapeLeft) => None,
        (Rotate270, LandscapeRight) => Rotate180,
        (Rotate270, PortraitReverse) => Rotate90,

        (None, Portrait) => None,
        (None, LandscapeLeft) => None,
        (None, LandscapeRight) => None,
        (None, PortraitReverse) => None,

        (Rotate180, Portrait) => None,
        (Rotate180, LandscapeLeft) => None,
        (Rotate180, LandscapeRight) => None,
        (Rotate180, PortraitReverse) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_sensor_rotations() {
        let sensor = SensorRotation::Rotate90;
        assert_eq!(media_rotation(sensor, Orientation::Portrait).degrees(), 90);
        assert_eq!(media_rotation(sensor, Orientation::LandscapeLeft).degrees(), 0);
        assert_eq!(media_rotation(sensor, Orientation::LandscapeRight).degrees(), 180);
        assert_eq!(media_rotation(sensor, Orientation::PortraitReverse).degrees(), 270);
    }

    #[test]
    fn test_reverse_portrait_sensor_rotations() {
        let sensor = SensorRotation::Rotate270;
        assert_eq!(media_rotation(sensor, Orientation::Portrait).degrees(), 270);
        assert_eq!(media_rotation(sensor, Orientation::LandscapeLeft).degrees(), 0);
        assert_eq!(media_rotation(sensor, Orientation::LandscapeRight).degrees(), 180);
        assert_eq!(media_rotation(sensor, Orientation::PortraitReverse).degrees(), 90);
    }

    #[test]
    fn test_landscape_sensors_never_rotate() {
        for sensor in [SensorRotation::None, SensorRotation::Rotate180] {
            for device in Orientation::ALL {
                assert_eq!(
                    media_rotation(sensor, device),
                    SensorRotation::None,
                    "sensor {} device {}",
                    sensor,
                    device
                );
            }
        }
    }
}
