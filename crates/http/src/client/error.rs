//! Client error types

use crate::types::ErrorBody;
use thiserror::Error;

/// Client error types
///
/// Status variants carry the `error` field of the response body when the
/// server sent one. Callers fall back to their own message when it is absent.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {}", describe(.message))]
    ServerError { status: u16, message: Option<String> },

    /// Credential missing, expired or rejected
    #[error("Authentication failed: {}", describe(.0))]
    AuthenticationFailed(Option<String>),

    /// Resource not found
    #[error("Resource not found: {}", describe(.0))]
    NotFound(Option<String>),

    /// Bad request
    #[error("Bad request: {}", describe(.0))]
    BadRequest(Option<String>),

    /// Forbidden
    #[error("Forbidden: {}", describe(.0))]
    Forbidden(Option<String>),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

fn describe(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no details")
}

impl ClientError {
    /// Create error from HTTP status code and the raw response body
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = extract_error_message(body);
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status of the failed response, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }

    /// Message the server put in the body's `error` field
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::BadRequest(message)
            | Self::AuthenticationFailed(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::ServerError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the server rejected the bearer credential
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}

/// Pull the `error` field out of a JSON error body
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn maps_status_codes() {
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST, ""),
            ClientError::BadRequest(None)
        ));
        assert!(ClientError::from_status(StatusCode::UNAUTHORIZED, "").is_auth_expired());
        assert!(matches!(
            ClientError::from_status(StatusCode::FORBIDDEN, ""),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, ""),
            ClientError::NotFound(_)
        ));
        assert_eq!(
            ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "").status(),
            Some(500)
        );
    }

    #[test]
    fn extracts_server_error_field() {
        let error = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error": "البريد الإلكتروني موجود بالفعل"}"#,
        );
        assert_eq!(error.server_message(), Some("البريد الإلكتروني موجود بالفعل"));
    }

    #[test]
    fn non_json_or_blank_error_has_no_message() {
        assert_eq!(extract_error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(extract_error_message(r#"{"message": "ok"}"#), None);
        assert_eq!(extract_error_message(r#"{"error": "  "}"#), None);
    }
}
