// SPDX-License-Identifier: GPL-3.0-only

//! Session authentication collaborator

use crate::errors::{SessionError, SessionResult};
use futures::FutureExt;
use futures::future::BoxFuture;

/// Checks that the host application is allowed to open a camera session
pub trait AuthValidator: Send + Sync {
    fn validate(&self) -> BoxFuture<'_, SessionResult<()>>;
}

/// Validator with a fixed answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticValidator {
    rejection: Option<String>,
}

impl StaticValidator {
    pub fn accepting() -> Self {
        Self { rejection: None }
    }

    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            rejection: Some(reason.into()),
        }
    }
}

impl Default for StaticValidator {
    fn default() -> Self {
        Self::accepting()
    }
}

impl AuthValidator for StaticValidator {
    fn validate(&self) -> BoxFuture<'_, SessionResult<()>> {
        async move {
            match &self.rejection {
                None => Ok(()),
                Some(reason) => Err(SessionError::AuthenticationFailure(reason.clone())),
            }
        }
        .boxed()
    }
}
