// SPDX-License-Identifier: GPL-3.0-only

//! Pausable stopwatch
//!
//! Measures the elapsed time of a recording and reports it on a fixed
//! interval while running. Elapsed time survives pause/resume: the running
//! state keeps a virtual start instant (`now - accumulated`) instead of a
//! counter, so it never drifts with the tick rate.
//!
//! ```text
//!            start                 pause
//!  Stopped ────────▶ Running ◀──────────────▶ Paused
//!     ▲                 │        resume          │
//!     └─────── stop ────┴────────────────────────┘
//! ```

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Callback receiving the elapsed time
pub type TickCallback = Arc<dyn Fn(Duration) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchStatus {
    Stopped,
    Running,
    Paused,
}

struct Inner {
    status: StopwatchStatus,
    /// Elapsed time banked while paused or stopped
    accumulated: Duration,
    /// Virtual start instant, only meaningful while running
    started_at: Instant,
    /// Bumped whenever a ticker is cancelled
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl Inner {
    fn elapsed(&self) -> Duration {
        match self.status {
            StopwatchStatus::Running => self.started_at.elapsed(),
            StopwatchStatus::Paused | StopwatchStatus::Stopped => self.accumulated,
        }
    }

    fn cancel_ticker(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

/// Cloneable handle to one stopwatch
#[derive(Clone)]
pub struct Stopwatch {
    inner: Arc<Mutex<Inner>>,
    interval: Duration,
    on_tick: TickCallback,
}

impl std::fmt::Debug for Stopwatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Stopwatch")
            .field("status", &inner.status)
            .field("elapsed", &inner.elapsed())
            .field("interval", &self.interval)
            .finish()
    }
}

impl Stopwatch {
    /// Create a stopped stopwatch reporting every `interval`
    pub fn new(interval: Duration, on_tick: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                status: StopwatchStatus::Stopped,
                accumulated: Duration::ZERO,
                started_at: Instant::now(),
                generation: 0,
                ticker: None,
            })),
            interval,
            on_tick: Arc::new(on_tick),
        }
    }

    pub fn status(&self) -> StopwatchStatus {
        self.inner.lock().status
    }

    pub fn elapsed(&self) -> Duration {
        self.inner.lock().elapsed()
    }

    /// Start counting from the banked elapsed time
    ///
    /// No-op while already running.
    pub fn start(&self) {
        let mut inner = self.inner.lock();
        if inner.status == StopwatchStatus::Running {
            trace!("Stopwatch already running");
            return;
        }
        self.run(&mut inner);
        debug!(elapsed_ms = inner.accumulated.as_millis() as u64, "Stopwatch started");
    }

    /// Stop ticking, keeping the elapsed time
    ///
    /// No-op unless running.
    pub fn pause(&self) {
        let mut inner = self.inner.lock();
        if inner.status != StopwatchStatus::Running {
            trace!(status = ?inner.status, "Stopwatch not running, pause ignored");
            return;
        }
        inner.accumulated = inner.started_at.elapsed();
        inner.status = StopwatchStatus::Paused;
        inner.cancel_ticker();
        debug!(elapsed_ms = inner.accumulated.as_millis() as u64, "Stopwatch paused");
    }

    /// Continue a paused stopwatch
    ///
    /// No-op unless paused.
    pub fn resume(&self) {
        let mut inner = self.inner.lock();
        if inner.status != StopwatchStatus::Paused {
            trace!(status = ?inner.status, "Stopwatch not paused, resume ignored");
            return;
        }
        self.run(&mut inner);
        debug!(elapsed_ms = inner.accumulated.as_millis() as u64, "Stopwatch resumed");
    }

    /// Cancel ticking and reset to zero, reporting a final zero
    pub fn stop(&self) {
        {
            let mut inner = self.inner.lock();
            inner.cancel_ticker();
            inner.status = StopwatchStatus::Stopped;
            inner.accumulated = Duration::ZERO;
        }
        (self.on_tick)(Duration::ZERO);
        debug!("Stopwatch stopped");
    }

    /// Start counting from zero, whatever the current state
    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    fn run(&self, inner: &mut Inner) {
        let now = Instant::now();
        inner.started_at = now.checked_sub(inner.accumulated).unwrap_or(now);
        inner.status = StopwatchStatus::Running;
        inner.cancel_ticker();
        inner.ticker = Some(tokio::spawn(tick_loop(
            Arc::downgrade(&self.inner),
            inner.generation,
            self.interval,
            self.on_tick.clone(),
        )));
    }
}

async fn tick_loop(
    inner: Weak<Mutex<Inner>>,
    generation: u64,
    interval: Duration,
    on_tick: TickCallback,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let elapsed = {
            let inner = inner.lock();
            if inner.generation != generation || inner.status != StopwatchStatus::Running {
                break;
            }
            inner.started_at.elapsed()
        };
        on_tick(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_stopwatch() -> (Stopwatch, Arc<Mutex<Vec<Duration>>>) {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = ticks.clone();
        let stopwatch = Stopwatch::new(Duration::from_secs(1), move |elapsed| {
            sink.lock().push(elapsed);
        });
        (stopwatch, ticks)
    }

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|v| Duration::from_millis(*v)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_while_running() {
        let (stopwatch, ticks) = recording_stopwatch();
        stopwatch.start();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(*ticks.lock(), ms(&[1000, 2000, 3000]));
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_keeps_single_loop() {
        let (stopwatch, ticks) = recording_stopwatch();
        stopwatch.start();
        tokio::time::sleep(Duration::from_millis(500)).await;
        stopwatch.start();
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(*ticks.lock(), ms(&[1000, 2000]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_retains_elapsed_time() {
        let (stopwatch, ticks) = recording_stopwatch();
        stopwatch.start();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        stopwatch.pause();
        assert_eq!(stopwatch.status(), StopwatchStatus::Paused);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(2500));

        stopwatch.resume();
        tokio::time::sleep(Duration::from_millis(1200)).await;

        let ticks = ticks.lock().clone();
        assert_eq!(ticks, ms(&[1000, 2000, 3500]));
        assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume_are_guarded() {
        let (stopwatch, ticks) = recording_stopwatch();
        stopwatch.pause();
        stopwatch.resume();
        assert_eq!(stopwatch.status(), StopwatchStatus::Stopped);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(ticks.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_counts_from_zero() {
        let (stopwatch, ticks) = recording_stopwatch();
        stopwatch.start();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        stopwatch.pause();

        stopwatch.restart();
        assert_eq!(stopwatch.status(), StopwatchStatus::Running);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(*ticks.lock(), ms(&[1000, 2000, 0, 1000]));
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_may_query_the_stopwatch() {
        let handle: Arc<Mutex<Option<Stopwatch>>> = Arc::new(Mutex::new(None));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (slot, sink) = (handle.clone(), seen.clone());
        let stopwatch = Stopwatch::new(Duration::from_secs(1), move |elapsed| {
            let stopwatch = slot.lock().clone();
            if let Some(stopwatch) = stopwatch {
                sink.lock().push((elapsed, stopwatch.status(), stopwatch.elapsed()));
            }
        });
        *handle.lock() = Some(stopwatch.clone());

        stopwatch.start();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        stopwatch.stop();

        let seen = seen.lock().clone();
        assert_eq!(
            seen,
            vec![
                (
                    Duration::from_millis(1000),
                    StopwatchStatus::Running,
                    Duration::from_millis(1000)
                ),
                (Duration::ZERO, StopwatchStatus::Stopped, Duration::ZERO),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_resets_and_reports_zero() {
        let (stopwatch, ticks) = recording_stopwatch();
        stopwatch.start();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        stopwatch.stop();
        stopwatch.stop();

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(*ticks.lock(), ms(&[1000, 0, 0]));
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
        assert_eq!(stopwatch.status(), StopwatchStatus::Stopped);
    }
}
