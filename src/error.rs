// src/error.rs
//! Error taxonomy. Collaborator failures are classified so the retry policy
//! can tell transient conditions from terminal ones; pipeline errors cover
//! the only fatal case (nothing to run).

use thiserror::Error;

/// Failure of a single collaborator fetch/process call.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("request timed out")]
    Timeout,

    #[error("rate limited by upstream (429)")]
    RateLimited,

    #[error("server error {status}")]
    Server { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl CollaboratorError {
    /// Transient conditions worth another attempt: timeouts, 429, 5xx,
    /// and network-level failures. Parse and query errors are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            CollaboratorError::Timeout
            | CollaboratorError::RateLimited
            | CollaboratorError::Network(_) => true,
            CollaboratorError::Server { status } => *status >= 500,
            CollaboratorError::Parse(_) | CollaboratorError::InvalidQuery(_) => false,
        }
    }
}

/// Fatal pipeline-level errors. Contained failures (one collaborator, one
/// indication) never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no collaborators configured; nothing to run")]
    NoCollaborators,

    #[error("scoring weights must sum to 1.0, got {0}")]
    InvalidWeights(f64),
}
