// SPDX-License-Identifier: GPL-3.0-only

//! Collaborators of the session
//!
//! The session core is hardware-agnostic. Everything it needs from the
//! outside world is expressed as a trait here:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Session Loop                  │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                  │
//! │  ┌─────────────────┐  ┌──────────────────┐  │
//! │  │  CaptureEngine  │  │  AuthValidator   │  │
//! │  │  (camera/*)     │  │  (auth)          │  │
//! │  └─────────────────┘  └──────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`auth`]: Session authentication check
//! - [`camera`]: Capture engine trait, shared camera types and a simulated engine

pub mod auth;
pub mod camera;
