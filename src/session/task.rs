// SPDX-License-Identifier: GPL-3.0-only

//! Follow-up tasks
//!
//! A [`Task`] is deferred work returned by a reducer. It runs after the new
//! state has been published, may await the capture engine and reports back
//! only by sending new events or publishing effects through its
//! [`TaskContext`]. Tasks never see the session state.

use crate::backends::auth::AuthValidator;
use crate::backends::camera::CaptureEngine;
use crate::config::SessionOptions;
use crate::session::effects::{CameraEvent, CameraEventData, Effect, EffectSender};
use crate::session::events::Event;
use crate::stopwatch::Stopwatch;
use futures::future::{BoxFuture, join_all};
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Everything a follow-up task may touch
#[derive(Clone)]
pub struct TaskContext {
    pub engine: Arc<dyn CaptureEngine>,
    pub auth: Arc<dyn AuthValidator>,
    pub stopwatch: Stopwatch,
    pub events: mpsc::UnboundedSender<Event>,
    pub effects: EffectSender,
    pub options: SessionOptions,
}

impl TaskContext {
    /// Feed an event back into the session
    pub fn send(&self, event: impl Into<Event>) {
        let event = event.into();
        let name = event.name();
        if self.events.send(event).is_err() {
            debug!(event = name, "Session closed, event dropped");
        }
    }

    pub fn publish(&self, effect: Effect) {
        self.effects.publish(effect);
    }

    /// Publish an analytics event stamped with the current time
    pub fn report(&self, data: CameraEventData) {
        self.publish(Effect::SendEvent(CameraEvent::now(data)));
    }
}

type Job = Box<dyn FnOnce(TaskContext) -> BoxFuture<'static, ()> + Send>;

/// Deferred work produced by a reducer
#[derive(Default)]
pub struct Task {
    jobs: Vec<Job>,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({} jobs)", self.jobs.len())
    }
}

impl Task {
    pub fn none() -> Self {
        Self::default()
    }

    /// Run `job` with the session's task context
    pub fn perform<F, Fut>(job: F) -> Self
    where
        F: FnOnce(TaskContext) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            jobs: vec![Box::new(move |ctx| job(ctx).boxed())],
        }
    }

    /// Run several tasks concurrently
    pub fn batch(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            jobs: tasks.into_iter().flat_map(|task| task.jobs).collect(),
        }
    }

    /// Publish an analytics event
    pub fn report(data: CameraEventData) -> Self {
        Self::perform(move |ctx| async move { ctx.report(data) })
    }

    /// Publish an effect after the reduction's own effect
    pub fn publish(effect: Effect) -> Self {
        Self::perform(move |ctx| async move { ctx.publish(effect) })
    }

    /// Dismiss the current toast once it has been shown long enough
    pub fn dismiss_toast() -> Self {
        Self::perform(|ctx| async move {
            tokio::time::sleep(ctx.options.toast_duration).await;
            ctx.publish(Effect::DismissToast);
        })
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Run every job to completion on the current task
    pub async fn run(self, ctx: TaskContext) {
        join_all(self.jobs.into_iter().map(|job| job(ctx.clone()))).await;
    }

    /// Run the task in the background
    pub fn spawn(self, ctx: &TaskContext) -> Option<JoinHandle<()>> {
        if self.is_empty() {
            return None;
        }
        Some(tokio::spawn(self.run(ctx.clone())))
    }
}

/// What a single handler produces besides the new state
#[derive(Debug, Default)]
pub struct Outcome {
    pub effect: Option<Effect>,
    pub task: Task,
}

impl Outcome {
    /// Nothing beyond the state change
    pub fn none() -> Self {
        Self::default()
    }

    pub fn effect(effect: Effect) -> Self {
        Self {
            effect: Some(effect),
            task: Task::none(),
        }
    }

    pub fn task(task: Task) -> Self {
        Self { effect: None, task }
    }

    pub fn with(effect: Effect, task: Task) -> Self {
        Self {
            effect: Some(effect),
            task,
        }
    }
}
