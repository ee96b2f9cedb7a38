// SPDX-License-Identifier: GPL-3.0-only

//! Camera session
//!
//! A session is one long-lived task that owns the [`SessionState`] and
//! applies events to it strictly one at a time:
//!
//! ```text
//!  UI intents ─────┐
//!  task results ───┤                     ┌──▶ state (watch)
//!  stopwatch ticks ┼──▶ event queue ──▶ reduce ──▶ effect (capacity 1)
//!  hardware ───────┘                     └──▶ follow-up task
//! ```
//!
//! Consumers only ever see the projected state through
//! [`SessionHandle::subscribe_state`] and one-shot notifications through
//! [`SessionHandle::subscribe_effects`]. Both are fed by the loop; nothing
//! else writes the state.

pub mod capture_config;
pub mod effects;
pub mod events;
pub mod handlers;
pub mod ingestion;
pub mod media;
pub mod projector;
pub mod state;
pub mod task;
pub mod update;

use crate::backends::auth::AuthValidator;
use crate::backends::camera::CaptureEngine;
use crate::config::SessionOptions;
use crate::errors::{SessionError, SessionResult};
use crate::storage::{self, StateStore};
use crate::stopwatch::Stopwatch;
use effects::{EffectReceiver, EffectSender, effect_channel};
use events::{Event, MediaEvent};
use parking_lot::Mutex;
use state::SessionState;
use std::sync::Arc;
use task::TaskContext;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};
use update::{Reduction, reduce};

/// Entry point for starting sessions
pub struct CameraSession;

impl CameraSession {
    /// Start a session loop on the current tokio runtime
    ///
    /// `initial` restores a persisted state; without it a fresh state tagged
    /// with a new session id is used. Devices are enumerated when the state
    /// does not already carry camera information.
    pub async fn start(
        engine: Arc<dyn CaptureEngine>,
        auth: Arc<dyn AuthValidator>,
        options: SessionOptions,
        initial: Option<SessionState>,
    ) -> SessionResult<SessionHandle> {
        let mut state = initial.unwrap_or_else(|| {
            let tag = uuid::Uuid::new_v4().simple().to_string();
            SessionState::new(&tag[..8])
        });

        if state.camera_info.front_camera.is_none() && state.camera_info.back_camera.is_none() {
            state.camera_info = engine.enumerate_devices().await?;
            info!(
                back = ?state.camera_info.back_camera.as_ref().map(|d| d.id.as_str()),
                front = ?state.camera_info.front_camera.as_ref().map(|d| d.id.as_str()),
                "Cameras enumerated"
            );
        }
        projector::project(&mut state);

        let (events_tx, events_rx) = mpsc::unbounded_channel::<Event>();
        let effects = effect_channel();
        let (state_tx, state_rx) = watch::channel(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let ticks = events_tx.clone();
        let stopwatch = Stopwatch::new(options.stopwatch_interval, move |elapsed| {
            let event = MediaEvent::RecordingTimerUpdated(elapsed.as_millis() as u64);
            if ticks.send(event.into()).is_err() {
                trace!("Session closed, tick dropped");
            }
        });

        // Subscribed here so no hardware event after start is missed
        let forwarders = ingestion::spawn_forwarders(engine.as_ref(), &stopwatch, &events_tx);

        let ctx = TaskContext {
            engine,
            auth,
            stopwatch: stopwatch.clone(),
            events: events_tx.clone(),
            effects: effects.clone(),
            options,
        };

        info!(session = %state.media.session_tag, "Session started");
        let worker = tokio::spawn(run(state, events_rx, state_tx, ctx, shutdown_rx, forwarders));

        Ok(SessionHandle {
            events: events_tx,
            state: state_rx,
            effects,
            stopwatch,
            shutdown: Mutex::new(Some(shutdown_tx)),
            worker: Mutex::new(Some(worker)),
        })
    }
}

/// The serialized reducer loop
async fn run(
    mut state: SessionState,
    mut events: mpsc::UnboundedReceiver<Event>,
    state_tx: watch::Sender<SessionState>,
    ctx: TaskContext,
    mut shutdown: oneshot::Receiver<()>,
    forwarders: Vec<JoinHandle<()>>,
) {
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    loop {
        let event = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        let name = event.name();
        let Reduction {
            state: next,
            effect,
            task,
        } = reduce(&state, event);
        state = next;
        state_tx.send_replace(state.clone());

        if let Some(effect) = effect {
            debug!(event = name, ?effect, "Publishing effect");
            ctx.publish(effect);
        }

        tasks.retain(|task| !task.is_finished());
        if let Some(handle) = task.spawn(&ctx) {
            trace!(event = name, running = tasks.len() + 1, "Follow-up task spawned");
            tasks.push(handle);
        }
    }

    for handle in forwarders.iter().chain(tasks.iter()) {
        handle.abort();
    }
    ctx.stopwatch.stop();
    info!(session = %state.media.session_tag, "Session stopped");
}

/// Handle to a running session
///
/// Dropping the handle stops the session.
pub struct SessionHandle {
    events: mpsc::UnboundedSender<Event>,
    state: watch::Receiver<SessionState>,
    effects: EffectSender,
    stopwatch: Stopwatch,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SessionHandle {
    /// Submit an event to the session
    pub fn send(&self, event: impl Into<Event>) -> SessionResult<()> {
        let event = event.into();
        let name = event.name();
        self.events.send(event).map_err(|_| SessionError::InvalidTransition {
            event: name,
            state: "stopped",
        })
    }

    /// Latest projected state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Stream of projected states
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Effects published from now on
    pub fn subscribe_effects(&self) -> EffectReceiver {
        self.effects.subscribe()
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    /// Save every sub-state of the latest snapshot
    pub fn persist(&self, store: &dyn StateStore) -> SessionResult<()> {
        storage::save_state(store, &self.state())
    }

    /// Stop the session and wait for the loop to finish
    ///
    /// Calling it again is a no-op.
    pub async fn stop(&self) {
        let Some(shutdown) = self.shutdown.lock().take() else {
            debug!("Session already stopped");
            return;
        };
        if shutdown.send(()).is_err() {
            debug!("Session loop already finished");
        }

        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                debug!(error = %e, "Session loop ended abnormally");
            }
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.lock().is_none() || self.events.is_closed()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.lock().take() {
            let _ = shutdown.send(());
        }
    }
}
