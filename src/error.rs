//! Error types for DavinciPics signalling

use std::time::Duration;
use thiserror::Error;

/// Signal-level errors
#[derive(Error, Debug)]
pub enum SignalError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Request violates a domain rule, raised before any I/O
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network, DNS or connection failure reaching the endpoint
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("Remote rejection: {status} - {body}")]
    RemoteRejection { status: u16, body: String },

    /// Caller-supplied deadline passed before the call completed
    #[error("Deadline elapsed after {0:?}")]
    DeadlineElapsed(Duration),
}

impl SignalError {
    /// Short machine-readable reason, used as a log field
    pub fn reason(&self) -> &'static str {
        match self {
            SignalError::Config(_) => "configuration_error",
            SignalError::Validation(_) => "validation_failed",
            SignalError::Transport(_) => "transport_error",
            SignalError::RemoteRejection { .. } => "remote_rejection",
            SignalError::DeadlineElapsed(_) => "deadline_elapsed",
        }
    }

    /// Whether repeating the same signal could succeed
    ///
    /// Nothing in this crate retries; callers decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            SignalError::Config(_) | SignalError::Validation(_) => false,
            SignalError::Transport(_) | SignalError::DeadlineElapsed(_) => true,
            SignalError::RemoteRejection { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Result type alias for convenience
pub type SignalResult<T> = Result<T, SignalError>;
