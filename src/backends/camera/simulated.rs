// SPDX-License-Identifier: GPL-3.0-only

//! In-memory capture engine
//!
//! Behaves like a two-lens phone camera without touching hardware: preview
//! and capture calls succeed immediately, recordings report their lifecycle
//! on the hardware event stream and stop themselves at the duration limit.
//! Failures can be scripted per operation and every call is logged, which
//! makes the engine usable both for demos and for end-to-end tests.

use super::types::*;
use super::{CaptureEngine, ImageRequest, RecordingRequest, ZoomEvent};
use crate::errors::EngineError;
use crate::session::capture_config::{CaptureConfig, FlashMode};
use async_stream::stream;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 32;

/// Operation that can be scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    Enumerate,
    StartPreview,
    StartRecording,
    TakeImage,
    Focus,
    Zoom,
}

/// Call received by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    StartPreview {
        device_id: String,
        resolution: Resolution,
    },
    StopPreview,
    RestartPreview {
        flash: FlashMode,
    },
    ChangeCamera {
        device_id: String,
        resolution: Resolution,
    },
    TakeImage {
        output_file: String,
    },
    StartRecording {
        output_file: String,
        rotation: SensorRotation,
        duration_limit_millis: Option<u64>,
    },
    PauseRecording,
    ResumeRecording,
    StopRecording {
        max_duration_reached: bool,
    },
    RequestFocus,
    SetZoom {
        level: f32,
    },
}

struct ActiveRecording {
    generation: u64,
    paused: bool,
    /// Time left before the duration limit
    remaining: Option<Duration>,
    segment_started: Instant,
    limit_timer: Option<JoinHandle<()>>,
}

impl ActiveRecording {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.limit_timer.take() {
            timer.abort();
        }
    }
}

struct Shared {
    devices: CameraInformation,
    calls: Mutex<Vec<EngineCall>>,
    failures: Mutex<HashSet<FailurePoint>>,
    recording: Mutex<Option<ActiveRecording>>,
    generation: Mutex<u64>,
    recording_tx: broadcast::Sender<RecordingEvent>,
    connectivity_tx: broadcast::Sender<ConnectivityEvent>,
}

/// Simulated two-lens camera
#[derive(Clone)]
pub struct SimulatedEngine {
    shared: Arc<Shared>,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new(Self::default_devices())
    }
}

impl SimulatedEngine {
    pub fn new(devices: CameraInformation) -> Self {
        let (recording_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (connectivity_tx, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            shared: Arc::new(Shared {
                devices,
                calls: Mutex::new(Vec::new()),
                failures: Mutex::new(HashSet::new()),
                recording: Mutex::new(None),
                generation: Mutex::new(0),
                recording_tx,
                connectivity_tx,
            }),
        }
    }

    /// A typical phone: flash-equipped back camera, plain front camera
    pub fn default_devices() -> CameraInformation {
        CameraInformation {
            back_camera: Some(CameraDevice {
                id: "0".into(),
                lens_facing: LensFacing::Back,
                resolutions: vec![
                    Resolution::new(1280, 720),
                    Resolution::new(1920, 1080),
                    Resolution::new(3840, 2160),
                ],
                with_flash: true,
                tap_to_focus_enabled: true,
                sensor_orientation: SensorRotation::Rotate90,
                sensor_size: SensorRect::with_size(4000, 3000),
                logical_camera: false,
            }),
            front_camera: Some(CameraDevice {
                id: "1".into(),
                lens_facing: LensFacing::Front,
                resolutions: vec![Resolution::new(1280, 720), Resolution::new(1920, 1080)],
                with_flash: false,
                tap_to_focus_enabled: false,
                sensor_orientation: SensorRotation::Rotate270,
                sensor_size: SensorRect::with_size(3264, 2448),
                logical_camera: false,
            }),
        }
    }

    /// Make an operation fail until [`SimulatedEngine::clear_failures`]
    pub fn fail(&self, point: FailurePoint) {
        self.shared.failures.lock().insert(point);
    }

    pub fn clear_failures(&self) {
        self.shared.failures.lock().clear();
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<EngineCall> {
        self.shared.calls.lock().clone()
    }

    pub fn is_recording(&self) -> bool {
        self.shared.recording.lock().is_some()
    }

    /// Inject a recording lifecycle event as if the hardware raised it
    pub fn emit_recording_event(&self, event: RecordingEvent) {
        if self.shared.recording_tx.send(event).is_err() {
            debug!("No recording event observers");
        }
    }

    /// Inject a connectivity change
    pub fn emit_connectivity_event(&self, event: ConnectivityEvent) {
        if self.shared.connectivity_tx.send(event).is_err() {
            debug!("No connectivity observers");
        }
    }

    fn record(&self, call: EngineCall) {
        debug!(?call, "Simulated engine call");
        self.shared.calls.lock().push(call);
    }

    fn fails(&self, point: FailurePoint) -> bool {
        self.shared.failures.lock().contains(&point)
    }

    fn spawn_limit_timer(&self, generation: u64, remaining: Duration) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            let current = engine
                .shared
                .recording
                .lock()
                .as_ref()
                .map(|recording| recording.generation);
            if current == Some(generation) {
                info!("Simulated recording reached its duration limit");
                engine.emit_recording_event(RecordingEvent::MaxDurationReached);
            }
        })
    }

    fn broadcast_stream<T: Clone + Send + 'static>(
        mut rx: broadcast::Receiver<T>,
    ) -> BoxStream<'static, T> {
        Box::pin(stream! {
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Hardware events lost");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl CaptureEngine for SimulatedEngine {
    fn enumerate_devices(&self) -> BoxFuture<'_, EngineResult<CameraInformation>> {
        async move {
            if self.fails(FailurePoint::Enumerate) {
                return Err(EngineError::DeviceNotFound("no cameras".into()));
            }
            Ok(self.shared.devices.clone())
        }
        .boxed()
    }

    fn start_preview(
        &self,
        device_id: String,
        _surface: SurfaceRef,
        resolution: Resolution,
        _config: CaptureConfig,
    ) -> BoxFuture<'_, EngineResult<()>> {
        async move {
            self.record(EngineCall::StartPreview {
                device_id: device_id.clone(),
                resolution,
            });
            if self.fails(FailurePoint::StartPreview) {
                return Err(EngineError::PreviewFailed(device_id));
            }
            self.emit_connectivity_event(ConnectivityEvent::Connected);
            Ok(())
        }
        .boxed()
    }

    fn stop_preview(&self) -> BoxFuture<'_, EngineResult<()>> {
        async move {
            self.record(EngineCall::StopPreview);
            self.emit_connectivity_event(ConnectivityEvent::Disconnected);
            Ok(())
        }
        .boxed()
    }

    fn restart_preview(&self, config: CaptureConfig) -> BoxFuture<'_, EngineResult<()>> {
        async move {
            self.record(EngineCall::RestartPreview {
                flash: config.flash,
            });
            Ok(())
        }
        .boxed()
    }

    fn change_camera(
        &self,
        device_id: String,
        resolution: Resolution,
        _config: CaptureConfig,
    ) -> BoxFuture<'_, EngineResult<()>> {
        async move {
            self.record(EngineCall::ChangeCamera {
                device_id,
                resolution,
            });
            Ok(())
        }
        .boxed()
    }

    fn take_image(&self, request: ImageRequest) -> BoxStream<'static, ImageCaptureEvent> {
        self.record(EngineCall::TakeImage {
            output_file: request.output_file.clone(),
        });
        let fails = self.fails(FailurePoint::TakeImage);

        Box::pin(stream! {
            yield ImageCaptureEvent::Started;
            if request.config.focus_area.is_some() {
                yield ImageCaptureEvent::FocusStarted;
                yield ImageCaptureEvent::FocusLocked;
            }
            if fails {
                yield ImageCaptureEvent::Failed(EngineError::CaptureFailed(request.output_file));
            } else {
                yield ImageCaptureEvent::Captured {
                    file_path: request.output_file,
                    resolution: request.resolution,
                };
            }
        })
    }

    fn start_recording(&self, request: RecordingRequest) -> BoxFuture<'_, EngineResult<()>> {
        async move {
            self.record(EngineCall::StartRecording {
                output_file: request.output_file.clone(),
                rotation: request.rotation,
                duration_limit_millis: request.duration_limit_millis,
            });
            if self.fails(FailurePoint::StartRecording) {
                return Err(EngineError::RecordingStartFailed(request.output_file));
            }

            let generation = {
                let mut generation = self.shared.generation.lock();
                *generation += 1;
                *generation
            };
            let remaining = request.duration_limit_millis.map(Duration::from_millis);
            let limit_timer = remaining.map(|limit| self.spawn_limit_timer(generation, limit));

            let previous = self.shared.recording.lock().replace(ActiveRecording {
                generation,
                paused: false,
                remaining,
                segment_started: Instant::now(),
                limit_timer,
            });
            if let Some(mut previous) = previous {
                warn!("Recording started over an active recording");
                previous.cancel_timer();
            }

            info!(file = %request.output_file, "Simulated recording started");
            self.emit_recording_event(RecordingEvent::Started);
            Ok(())
        }
        .boxed()
    }

    fn pause_recording(&self) -> BoxFuture<'_, EngineResult<()>> {
        async move {
            self.record(EngineCall::PauseRecording);
            {
                let mut recording = self.shared.recording.lock();
                let Some(active) = recording.as_mut() else {
                    return Err(EngineError::RecordingFailed("no active recording".into()));
                };
                if active.paused {
                    return Ok(());
                }
                active.cancel_timer();
                let segment = active.segment_started.elapsed();
                active.remaining = active.remaining.map(|r| r.saturating_sub(segment));
                active.paused = true;
            }
            self.emit_recording_event(RecordingEvent::Paused);
            Ok(())
        }
        .boxed()
    }

    fn resume_recording(&self) -> BoxFuture<'_, EngineResult<()>> {
        async move {
            self.record(EngineCall::ResumeRecording);
            {
                let mut recording = self.shared.recording.lock();
                let Some(active) = recording.as_mut() else {
                    return Err(EngineError::RecordingFailed("no active recording".into()));
                };
                if !active.paused {
                    return Ok(());
                }
                let generation = active.generation;
                active.paused = false;
                active.segment_started = Instant::now();
                active.limit_timer = active
                    .remaining
                    .map(|remaining| self.spawn_limit_timer(generation, remaining));
            }
            self.emit_recording_event(RecordingEvent::Resumed);
            Ok(())
        }
        .boxed()
    }

    fn stop_recording(&self, max_duration_reached: bool) -> BoxFuture<'_, EngineResult<()>> {
        async move {
            self.record(EngineCall::StopRecording {
                max_duration_reached,
            });
            let Some(mut active) = self.shared.recording.lock().take() else {
                return Err(EngineError::RecordingFailed("no active recording".into()));
            };
            active.cancel_timer();
            info!(max_duration_reached, "Simulated recording stopped");
            self.emit_recording_event(RecordingEvent::Stopped {
                max_duration_reached,
            });
            Ok(())
        }
        .boxed()
    }

    fn request_focus(&self, _config: CaptureConfig) -> BoxStream<'static, FocusState> {
        self.record(EngineCall::RequestFocus);
        let fails = self.fails(FailurePoint::Focus);

        Box::pin(stream! {
            yield FocusState::Started;
            if fails {
                yield FocusState::Failed;
            } else {
                yield FocusState::FocusedLocked;
            }
        })
    }

    fn set_zoom(&self, config: CaptureConfig) -> BoxStream<'static, ZoomEvent> {
        let level = config.zoom_level;
        self.record(EngineCall::SetZoom { level });
        let fails = self.fails(FailurePoint::Zoom);

        Box::pin(stream! {
            if fails {
                yield ZoomEvent::Failed(EngineError::Other(format!("zoom {level}")));
            } else {
                yield ZoomEvent::Applied(level);
            }
        })
    }

    fn observe_recording_events(&self) -> BoxStream<'static, RecordingEvent> {
        Self::broadcast_stream(self.shared.recording_tx.subscribe())
    }

    fn observe_connectivity_events(&self) -> BoxStream<'static, ConnectivityEvent> {
        Self::broadcast_stream(self.shared.connectivity_tx.subscribe())
    }
}
