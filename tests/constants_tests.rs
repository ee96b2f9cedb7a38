// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use camera_session::constants::{
    ImageFormat, LogSeverity, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL, VIDEO_EXTENSION, messages,
};

#[test]
fn test_image_format_values() {
    // Test that all formats exist (Jpeg, Png)
    assert_eq!(ImageFormat::ALL.len(), 2);
}

#[test]
fn test_image_format_display_names() {
    // Test that all formats have non-empty display names and extensions
    for format in ImageFormat::ALL {
        assert!(
            !format.display_name().is_empty(),
            "Format {:?} has empty display name",
            format
        );
        assert!(!format.extension().contains('.'));
    }
    assert_ne!(VIDEO_EXTENSION, ImageFormat::Png.extension());
}

#[test]
fn test_log_severities_are_distinct() {
    let names: Vec<&str> = LogSeverity::ALL.iter().map(|s| s.display_name()).collect();
    assert_eq!(names, vec!["debug", "info", "warning", "error"]);
}

#[test]
fn test_zoom_range() {
    assert_eq!(MIN_ZOOM_LEVEL, 1.0);
    assert_eq!(MAX_ZOOM_LEVEL, 10.0);
}

#[test]
fn test_limit_messages_name_the_media_kind() {
    assert!(messages::VIDEO_LIMIT_REACHED.contains("videos"));
    assert!(messages::IMAGE_LIMIT_REACHED.contains("images"));
}
