// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use camera_session::backends::camera::{LensFacing, Resolution};
use camera_session::constants::ImageFormat;
use camera_session::{CameraMode, SessionConfig, SessionOptions};
use std::time::Duration;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = SessionConfig::default();

    // Check sensible defaults
    assert!(!config.flash_on_by_default, "Flash should be off by default");
    assert_eq!(config.lens_facing, LensFacing::Back);
    assert_eq!(config.image_format, ImageFormat::Png);
    assert_eq!(config.orientation, None, "Orientation should not be locked");
    assert_eq!(config.mode, CameraMode::video_and_image());
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("session.json");

    let config = SessionConfig {
        output_path: Some("/data/media".into()),
        lens_facing: LensFacing::Front,
        image_format: ImageFormat::Jpeg,
        back_resolutions: vec![Resolution::new(1920, 1080)],
        mode: CameraMode::single_video_or_image(Some(30_000)),
        ..SessionConfig::default()
    };
    config.save(&path).expect("config saves");

    let loaded = SessionConfig::load(&path).expect("config loads");
    assert_eq!(loaded, config);
}

#[test]
fn test_config_load_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing.json");

    let err = SessionConfig::load(&path).expect_err("missing file");
    assert!(
        err.to_string().contains("missing.json"),
        "Error should name the file: {}",
        err
    );
}

#[test]
fn test_single_media_modes_close_automatically() {
    for mode in [
        CameraMode::single_video(None),
        CameraMode::single_image(),
        CameraMode::single_video_or_image(None),
    ] {
        assert!(mode.is_single_media_mode(), "{:?} should be single media", mode);
        assert!(mode.auto_close);
    }
    assert!(!CameraMode::video(Some(3), None).is_single_media_mode());
}

#[test]
fn test_options_default_timing() {
    let options = SessionOptions::default();
    assert_eq!(options.stopwatch_interval, Duration::from_secs(1));
    assert_eq!(options.toast_duration, Duration::from_secs(5));
}
