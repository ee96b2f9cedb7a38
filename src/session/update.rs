// SPDX-License-Identifier: GPL-3.0-only

//! Event reduction
//!
//! [`reduce`] is the single entry point of the state machine. It routes an
//! event to the reducer for its domain, then runs the projector so derived
//! fields are consistent before anyone sees the new state.
//!
//! # Domains
//!
//! - `handlers::controls`: preview, lens, flash, focus, zoom, connectivity
//! - `handlers::ui`: panels, resolution picker, orientation, media detail
//! - `handlers::media`: recording lifecycle, images, media list
//! - `handlers::configuration`: setup, authentication, permissions, logs

use crate::session::effects::Effect;
use crate::session::events::Event;
use crate::session::projector;
use crate::session::state::SessionState;
use crate::session::task::Task;
use tracing::trace;

/// Result of reducing one event
#[derive(Debug)]
pub struct Reduction {
    /// Projected state after the event
    pub state: SessionState,
    /// Effect to publish before the task runs
    pub effect: Option<Effect>,
    /// Follow-up work
    pub task: Task,
}

/// Apply `event` to `state`
///
/// Deterministic: the same state and event always give the same reduction.
/// Clocks, the capture engine and the stopwatch are only reached through
/// the returned task.
pub fn reduce(state: &SessionState, event: Event) -> Reduction {
    trace!(event = event.name(), "Reducing");

    let mut next = state.clone();
    let outcome = match event {
        Event::Controls(event) => next.reduce_controls(event),
        Event::Ui(event) => next.reduce_ui(event),
        Event::Media(event) => next.reduce_media(event),
        Event::Configuration(event) => next.reduce_configuration(event),
    };
    projector::project(&mut next);

    Reduction {
        state: next,
        effect: outcome.effect,
        task: outcome.task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::SimulatedEngine;
    use crate::session::events::{MediaEvent, UiEvent};
    use crate::session::state::RecordingState;

    fn initial() -> SessionState {
        let mut state = SessionState::new("t");
        state.camera_info = SimulatedEngine::default_devices();
        projector::project(&mut state);
        state
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let state = initial();
        let reduction = reduce(&state, MediaEvent::CaptureButtonPressed.into());

        assert_eq!(state.recording_state(), RecordingState::Idle);
        assert_eq!(reduction.state.recording_state(), RecordingState::Recording);
        assert!(reduction.state.controls.pause_enabled);
        assert!(!reduction.state.controls.flip_lens_enabled);
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let state = initial();
        let a = reduce(&state, UiEvent::ResolutionsButtonPressed.into());
        let b = reduce(&state, UiEvent::ResolutionsButtonPressed.into());
        assert_eq!(a.state, b.state);
        assert_eq!(a.effect, b.effect);
    }

    #[test]
    fn test_rejected_event_keeps_projected_state() {
        let state = initial();
        let reduction = reduce(&state, MediaEvent::PauseButtonPressed.into());
        assert_eq!(reduction.state, state);
        assert!(reduction.effect.is_none());
        assert!(reduction.task.is_empty());
    }
}
