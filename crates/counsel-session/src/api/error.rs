use std::panic::Location;

use error_location::ErrorLocation;
use serde_json::Value;
use thiserror::Error;

static NULL_BODY: Value = Value::Null;

/// Failure of a single call against the auth API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Network error: {message} {location}")]
    Network {
        message: String,
        location: ErrorLocation,
    },

    #[error("API error {status}: {message} {location}")]
    Status {
        status: u16,
        message: String,
        code: Option<String>,
        body: Value,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Convert reqwest error with context
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ApiError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Convert JSON error with context
    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        ApiError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Connection-level failure reported by a non-reqwest transport
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Non-success HTTP status with its decoded body
    #[track_caller]
    pub fn status(status: u16, message: impl Into<String>, code: Option<String>, body: Value) -> Self {
        ApiError::Status {
            status,
            message: message.into(),
            code,
            body,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// HTTP status code, when the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http { source, .. } => source.status().map(|s| s.as_u16()),
            ApiError::Network { .. } | ApiError::Json { .. } => None,
        }
    }

    /// Message suitable for showing to a user (no location suffix)
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. }
            | ApiError::Network { message, .. }
            | ApiError::Status { message, .. }
            | ApiError::Json { message, .. } => message.clone(),
        }
    }

    /// Decoded response body for status errors, `Null` otherwise
    pub fn body(&self) -> &Value {
        match self {
            ApiError::Status { body, .. } => body,
            _ => &NULL_BODY,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ApiError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ApiError::from_json(err)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
