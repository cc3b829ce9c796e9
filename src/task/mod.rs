//! Collaborators that perform the actual work of a worker iteration.
//!
//! Workers only see the [`Authenticator`] and [`TaskExecutor`] traits; the
//! HTTP implementations live in [`http`].
pub mod http;

use std::fmt;

use async_trait::async_trait;

use crate::error::TaskError;

/// Bearer credential handed from the authenticator to the task executor.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self { token }
    }

    #[must_use]
    pub const fn token(&self) -> &str {
        self.token.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Obtains a credential for one worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::CredentialAcquisitionFailed`] when no usable
    /// credential could be obtained.
    async fn acquire(&self) -> Result<Credential, TaskError>;
}

#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Performs one task iteration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskExecutionFailure`] when the iteration did not
    /// succeed. The caller still counts the iteration.
    async fn execute(&self, credential: &Credential) -> Result<(), TaskError>;
}

#[cfg(test)]
pub(crate) mod test_support;
