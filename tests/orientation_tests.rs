// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the orientation-to-rotation table

use camera_session::backends::camera::SensorRotation;
use camera_session::orientation::{Orientation, media_rotation};

#[test]
fn test_portrait_sensor_rotations() {
    let sensor = SensorRotation::Rotate90;
    assert_eq!(media_rotation(sensor, Orientation::Portrait), SensorRotation::Rotate90);
    assert_eq!(media_rotation(sensor, Orientation::LandscapeLeft), SensorRotation::None);
    assert_eq!(
        media_rotation(sensor, Orientation::LandscapeRight),
        SensorRotation::Rotate180
    );
    assert_eq!(
        media_rotation(sensor, Orientation::PortraitReverse),
        SensorRotation::Rotate270
    );
}

#[test]
fn test_front_sensor_mirrors_portrait_rotations() {
    let sensor = SensorRotation::Rotate270;
    assert_eq!(media_rotation(sensor, Orientation::Portrait), SensorRotation::Rotate270);
    assert_eq!(
        media_rotation(sensor, Orientation::PortraitReverse),
        SensorRotation::Rotate90
    );
}

#[test]
fn test_landscape_sensors_are_never_rotated() {
    for sensor in [SensorRotation::None, SensorRotation::Rotate180] {
        for orientation in Orientation::ALL {
            assert_eq!(
                media_rotation(sensor, orientation),
                SensorRotation::None,
                "{} sensor in {} should not rotate",
                sensor,
                orientation
            );
        }
    }
}

#[test]
fn test_table_is_total() {
    // Every combination resolves to a right-angle rotation
    for sensor in SensorRotation::ALL {
        for orientation in Orientation::ALL {
            assert_eq!(media_rotation(sensor, orientation).degrees() % 90, 0);
        }
    }
}
