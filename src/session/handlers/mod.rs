// SPDX-License-Identifier: GPL-3.0-only

//! Domain reducers
//!
//! One module per event domain. Every handler is a method on
//! [`SessionState`] that mutates a working copy of the state and returns the
//! [`Outcome`] (optional effect plus follow-up task) of the transition.
//! Handlers never call the capture engine directly and never touch
//! [`crate::session::state::ControlsState`]; the projector recomputes it
//! after every event.

pub mod configuration;
pub mod controls;
pub mod media;
pub mod ui;

use crate::errors::SessionError;
use crate::session::state::SessionState;
use crate::session::task::Outcome;
use tracing::debug;

impl SessionState {
    /// Refuse an event the current state cannot accept
    pub(crate) fn reject(&self, event: &'static str, state: &'static str) -> Outcome {
        let err = SessionError::InvalidTransition { event, state };
        debug!(%err, "Ignoring event");
        Outcome::none()
    }
}
