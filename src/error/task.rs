use thiserror::Error;

/// Per-worker failures. These never escape the worker that observed them.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Credential acquisition failed: {reason}")]
    CredentialAcquisitionFailed { reason: String },
    #[error("Task iteration failed: {reason}")]
    TaskExecutionFailure { reason: String },
    #[error("Failed to build request URL from '{base}' and '{path}': {source}")]
    JoinUrl {
        base: String,
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

impl TaskError {
    pub(crate) fn credential(reason: impl Into<String>) -> Self {
        TaskError::CredentialAcquisitionFailed {
            reason: reason.into(),
        }
    }

    pub(crate) fn execution(reason: impl Into<String>) -> Self {
        TaskError::TaskExecutionFailure {
            reason: reason.into(),
        }
    }
}
