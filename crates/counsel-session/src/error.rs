use crate::ApiError;

use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors surfaced by the explicit auth operations (login, OTP, magic link, ...).
///
/// `SessionReconciler::get_current_user` never returns these; it resolves every
/// failure to the cached identity or `None`.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Authentication failed: {message} {location}")]
    AuthenticationFailed {
        message: String,
        status: Option<u16>,
        location: ErrorLocation,
    },

    #[error("Network or server error: {message} {location}")]
    NetworkOrServer {
        message: String,
        status: Option<u16>,
        location: ErrorLocation,
    },

    #[error("Invalid {field}: {message} {location}")]
    Validation {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },
}

impl SessionError {
    #[track_caller]
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
            status: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn network_or_server(message: impl Into<String>) -> Self {
        Self::NetworkOrServer {
            message: message.into(),
            status: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Map a transport error onto the caller-facing taxonomy.
    ///
    /// 4xx responses are authentication failures carrying the backend message;
    /// 5xx, network and decode failures are `NetworkOrServer`.
    #[track_caller]
    pub fn from_api(err: ApiError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        let status = err.status_code();
        let message = err.user_message();

        match status {
            Some(code) if (400..500).contains(&code) => Self::AuthenticationFailed {
                message,
                status,
                location,
            },
            _ => Self::NetworkOrServer {
                message,
                status,
                location,
            },
        }
    }

    /// Like [`from_api`](Self::from_api), but a status in `rejected` means the
    /// server refused the shape of `field` and maps to `Validation`.
    #[track_caller]
    pub fn from_api_for_field(err: ApiError, field: &'static str, rejected: &[u16]) -> Self {
        match err.status_code() {
            Some(code) if rejected.contains(&code) => Self::Validation {
                field,
                message: err.user_message(),
                location: ErrorLocation::from(Location::caller()),
            },
            _ => Self::from_api(err),
        }
    }

    /// The user-facing message without the source location suffix.
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationFailed { message, .. }
            | Self::NetworkOrServer { message, .. }
            | Self::Validation { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { status, .. } | Self::NetworkOrServer { status, .. } => {
                *status
            }
            Self::Validation { .. } => None,
        }
    }
}

impl From<ApiError> for SessionError {
    #[track_caller]
    fn from(err: ApiError) -> Self {
        SessionError::from_api(err)
    }
}

pub type Result<T> = StdResult<T, SessionError>;
