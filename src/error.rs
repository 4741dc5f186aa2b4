// Error types for the session guard and its collaborators

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

pub const NO_SESSION_MESSAGE: &str = "Session expired. Please log in again.";
pub const IDLE_TIMEOUT_MESSAGE: &str = "Session expired due to inactivity. Please log in again.";

/// Failures reported by a session store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration loading and validation failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("no configuration file found")]
    NotFound,
}

/// Outcomes that terminate a request at the session guard
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session expired. Please log in again.")]
    NoSession,

    #[error("Session expired due to inactivity. Please log in again.")]
    IdleTimeoutExceeded,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Whether the client must re-authenticate
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::NoSession | Self::IdleTimeoutExceeded)
    }
}

/// Failures seen by the client-side session manager
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Credentials were cleared; the user must sign in again
    #[error("{message}")]
    SessionExpired { message: String, redirect_to: String },

    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("credential storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("credential encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// JSON body of an authentication failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFailureBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub session_expired: bool,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SessionError::NoSession | SessionError::IdleTimeoutExceeded => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            SessionError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            SessionError::Store(e) => {
                tracing::error!("Session store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Session store unavailable".to_string(),
                )
            }
        };

        let body = AuthFailureBody {
            message,
            session_expired: self.is_session_expired(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expired_bodies_carry_flag() {
        let body = AuthFailureBody {
            message: SessionError::IdleTimeoutExceeded.to_string(),
            session_expired: SessionError::IdleTimeoutExceeded.is_session_expired(),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "message": "Session expired due to inactivity. Please log in again.",
                "sessionExpired": true
            })
        );
    }

    #[test]
    fn test_non_expiry_errors_omit_flag() {
        let body = AuthFailureBody {
            message: "Invalid credentials".to_string(),
            session_expired: SessionError::InvalidCredentials.is_session_expired(),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "message": "Invalid credentials" })
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SessionError::NoSession.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SessionError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SessionError::Store(StoreError::Unavailable("down".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
