// SPDX-License-Identifier: GPL-3.0-only

//! Capture engine abstraction
//!
//! The session never talks to camera hardware directly. Every hardware
//! interaction goes through the [`CaptureEngine`] trait, called only from
//! follow-up tasks so the reducers stay deterministic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   Session reducers  │  ← Pure: (event, state) → (state, effect, task)
//! └──────────┬──────────┘
//!            │ follow-up tasks
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureEngine Trait │  ← Common interface
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     ┌─────────────┐
//!     │  Simulated  │  ← In-memory implementation
//!     └─────────────┘
//! ```

pub mod simulated;
pub mod types;

pub use simulated::SimulatedEngine;
pub use types::*;

use crate::orientation::Orientation;
use crate::session::capture_config::CaptureConfig;
use futures::future::BoxFuture;
use futures::stream::BoxStream;

/// Still capture parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub config: CaptureConfig,
    /// File the engine writes the image to
    pub output_file: String,
    pub resolution: Resolution,
    /// Clockwise rotation applied to the written image
    pub rotation: SensorRotation,
}

/// Video recording parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingRequest {
    pub config: CaptureConfig,
    /// File the engine writes the video to
    pub output_file: String,
    pub orientation: Orientation,
    pub rotation: SensorRotation,
    /// Stop automatically after this many milliseconds
    pub duration_limit_millis: Option<u64>,
    pub resolution: Resolution,
}

/// Result of a zoom request
#[derive(Debug, Clone, PartialEq)]
pub enum ZoomEvent {
    Applied(f32),
    Failed(crate::errors::EngineError),
}

/// Camera hardware collaborator
///
/// Implementations must be cheap to share: the session keeps one
/// `Arc<dyn CaptureEngine>` and hands clones to every follow-up task.
pub trait CaptureEngine: Send + Sync {
    // ===== Enumeration =====

    /// Enumerate the front and back cameras with their capabilities
    fn enumerate_devices(&self) -> BoxFuture<'_, EngineResult<CameraInformation>>;

    // ===== Preview =====

    /// Open `device_id` and render its preview into `surface`
    fn start_preview(
        &self,
        device_id: String,
        surface: SurfaceRef,
        resolution: Resolution,
        config: CaptureConfig,
    ) -> BoxFuture<'_, EngineResult<()>>;

    /// Close the preview and release the device
    fn stop_preview(&self) -> BoxFuture<'_, EngineResult<()>>;

    /// Re-issue the repeating preview request with a new capture config
    ///
    /// Used after a recording ends and when the flash changes.
    fn restart_preview(&self, config: CaptureConfig) -> BoxFuture<'_, EngineResult<()>>;

    /// Switch the open preview to another device
    fn change_camera(
        &self,
        device_id: String,
        resolution: Resolution,
        config: CaptureConfig,
    ) -> BoxFuture<'_, EngineResult<()>>;

    // ===== Capture =====

    /// Capture one still image, reporting progress as a stream
    ///
    /// The stream ends after `Captured` or `Failed`.
    fn take_image(&self, request: ImageRequest) -> BoxStream<'static, ImageCaptureEvent>;

    /// Start writing video frames to `request.output_file`
    fn start_recording(&self, request: RecordingRequest) -> BoxFuture<'_, EngineResult<()>>;

    fn pause_recording(&self) -> BoxFuture<'_, EngineResult<()>>;

    fn resume_recording(&self) -> BoxFuture<'_, EngineResult<()>>;

    /// Finish the recording
    ///
    /// The outcome arrives on [`CaptureEngine::observe_recording_events`] as
    /// `Stopped`, tagged with `max_duration_reached`.
    fn stop_recording(&self, max_duration_reached: bool) -> BoxFuture<'_, EngineResult<()>>;

    // ===== Sensor control =====

    /// Run auto-focus with the config's metering area
    fn request_focus(&self, config: CaptureConfig) -> BoxStream<'static, FocusState>;

    /// Apply the config's zoom area
    fn set_zoom(&self, config: CaptureConfig) -> BoxStream<'static, ZoomEvent>;

    // ===== Hardware events =====

    /// Recording lifecycle as observed by the engine
    fn observe_recording_events(&self) -> BoxStream<'static, RecordingEvent>;

    /// Camera connectivity as observed by the engine
    fn observe_connectivity_events(&self) -> BoxStream<'static, ConnectivityEvent>;
}
