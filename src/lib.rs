// SPDX-License-Identifier: MPL-2.0

//! Camera Session - an event-driven controller for one camera interaction
//!
//! This library owns the state of a camera session from setup to close:
//! preview, lens and flash control, tap-to-focus and zoom, video recording
//! with pause/resume, still images and the list of captured media.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: State model, events, reducers, projector and session loop
//! - [`backends`]: Capture engine and authentication abstractions
//! - [`stopwatch`]: Pausable recording timer
//! - [`orientation`]: Device orientation and media rotation
//! - [`config`]: Session configuration and runtime options
//! - [`storage`]: Persistence of session state
//!
//! # Example
//!
//! ```ignore
//! let engine = Arc::new(SimulatedEngine::default());
//! let auth = Arc::new(StaticValidator::accepting());
//! let session = CameraSession::start(engine, auth, SessionOptions::default(), None).await?;
//! session.send(MediaEvent::CaptureButtonPressed)?;
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod orientation;
pub mod session;
pub mod stopwatch;
pub mod storage;

// Re-export commonly used types
pub use backends::auth::{AuthValidator, StaticValidator};
pub use backends::camera::{CaptureEngine, SimulatedEngine};
pub use config::{CameraMode, SessionConfig, SessionOptions};
pub use errors::{EngineError, SessionError, SessionResult};
pub use session::effects::{CameraEvent, CameraEventType, Effect, EffectReceiver};
pub use session::events::{ConfigurationEvent, ControlsEvent, Event, MediaEvent, UiEvent};
pub use session::state::SessionState;
pub use session::{CameraSession, SessionHandle};
pub use stopwatch::Stopwatch;
