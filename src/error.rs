//! Error types for athena-query.
//!
//! Every failure on the query path is classified into exactly one of these
//! variants before it is rendered into a `QueryResults` value.

use thiserror::Error;

use crate::query::QueryStatus;

/// Main error type for athena-query operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AthenaError {
    /// Malformed request, caught before anything is submitted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The engine rejected a call or could not be reached.
    #[error("AWS client error: {0}")]
    Transport(String),

    /// The engine reports the execution as FAILED or CANCELLED.
    #[error("{}", failure_message(.status, .reason))]
    QueryFailure {
        status: QueryStatus,
        reason: Option<String>,
    },

    /// The execution did not reach a terminal state within the deadline.
    #[error("Query exceeded maximum wait time of {limit_secs} seconds")]
    Timeout { limit_secs: u64 },

    /// Configuration errors (unreadable config file, bad values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else (unexpected engine responses, bugs).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AthenaError {
    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation Error",
            Self::Transport(_) => "Transport Error",
            Self::QueryFailure { .. } => "Query Failure",
            Self::Timeout { .. } => "Timeout",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the sentinel status this error is reported under.
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::QueryFailure { status, .. } => *status,
            Self::Timeout { .. } => QueryStatus::Timeout,
            _ => QueryStatus::Error,
        }
    }

    /// Returns the engine-supplied state change reason, if any.
    pub fn state_change_reason(&self) -> Option<String> {
        match self {
            Self::QueryFailure { reason, .. } => reason.clone(),
            Self::Timeout { .. } => Some(self.to_string()),
            _ => None,
        }
    }
}

fn failure_message(status: &QueryStatus, reason: &Option<String>) -> String {
    match reason {
        Some(reason) => reason.clone(),
        None => format!("Query failed with status: {status}"),
    }
}

/// Result type alias using AthenaError.
pub type Result<T> = std::result::Result<T, AthenaError>;
