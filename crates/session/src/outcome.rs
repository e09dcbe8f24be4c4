//! Result of a session operation, with its user-facing message

use blackhole_http::ClientError;
use tracing::{info, warn};

/// Success or failure of a store operation
///
/// Both arms carry a message suitable for a notification, so callers never
/// need their own generic error banner.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success { value: T, message: String },
    Failure { message: String },
}

impl<T> Outcome<T> {
    pub fn success(value: T, message: impl Into<String>) -> Self {
        let message = message.into();
        info!(%message, "Session operation succeeded");
        Self::Success { value, message }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(%message, "Session operation failed");
        Self::Failure { message }
    }

    /// Failure whose message comes from the server, or `fallback` when the
    /// response carried none
    pub fn from_error(error: &ClientError, fallback: &str) -> Self {
        warn!("Request failed: {error}");
        Self::failure(error.server_message().unwrap_or(fallback))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message } => message,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Error arm holds the failure message
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::Failure { message } => Err(message),
        }
    }
}
