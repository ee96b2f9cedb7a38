// SPDX-License-Identifier: GPL-3.0-only

//! Hardware event ingestion
//!
//! Recording and connectivity callbacks from the capture engine are turned
//! into session events here and fed into the same queue as UI intents, so
//! they go through the reducers like everything else.
//!
//! The engine streams are subscribed when a forwarder is created, before its
//! task is spawned, so no hardware event emitted after session start is lost.

use crate::backends::camera::{CaptureEngine, ConnectivityEvent, RecordingEvent};
use crate::session::events::{ControlsEvent, Event, MediaEvent};
use crate::stopwatch::Stopwatch;
use chrono::Utc;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Map a recording callback to its session event
///
/// `Stopped` is stamped with the stopwatch reading and the current time so
/// the reducer that commits the video stays free of clocks.
pub fn recording_event(event: RecordingEvent, stopwatch: &Stopwatch) -> MediaEvent {
    match event {
        RecordingEvent::Started => MediaEvent::RecordingStarted,
        RecordingEvent::Paused => MediaEvent::RecordingPaused,
        RecordingEvent::Resumed => MediaEvent::RecordingResumed,
        RecordingEvent::Stopped {
            max_duration_reached,
        } => MediaEvent::RecordingStopped {
            max_duration_reached,
            elapsed_millis: stopwatch.elapsed().as_millis() as u64,
            stopped_at: Utc::now(),
        },
        RecordingEvent::MaxDurationReached => MediaEvent::MaxDurationReached,
        RecordingEvent::Exception(e) => MediaEvent::RecordingFailed(e),
    }
}

pub fn connectivity_event(event: ConnectivityEvent) -> ControlsEvent {
    ControlsEvent::Connectivity(event)
}

/// Spawn a task forwarding `stream` into the session queue
fn forward<T, F>(
    name: &'static str,
    mut stream: BoxStream<'static, T>,
    events: mpsc::UnboundedSender<Event>,
    map: F,
) -> JoinHandle<()>
where
    T: std::fmt::Debug + Send + 'static,
    F: Fn(T) -> Event + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(item) = stream.next().await {
            debug!(source = name, event = ?item, "Hardware event");
            if events.send(map(item)).is_err() {
                break;
            }
        }
        info!(source = name, "Hardware event forwarder finished");
    })
}

/// Start forwarding every engine callback stream into the session queue
///
/// Returns the forwarder handles so the owner can abort them on shutdown.
pub fn spawn_forwarders(
    engine: &dyn CaptureEngine,
    stopwatch: &Stopwatch,
    events: &mpsc::UnboundedSender<Event>,
) -> Vec<JoinHandle<()>> {
    let recording = engine.observe_recording_events();
    let connectivity = engine.observe_connectivity_events();

    let stopwatch = stopwatch.clone();
    vec![
        forward("recording", recording, events.clone(), move |event| {
            recording_event(event, &stopwatch).into()
        }),
        forward("connectivity", connectivity, events.clone(), |event| {
            connectivity_event(event).into()
        }),
    ]
}
