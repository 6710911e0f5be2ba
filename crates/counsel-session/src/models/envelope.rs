//! The `{error, message, user, ...}` envelope shared by the auth endpoints.

use counsel_core::Identity;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of the auth endpoints.
///
/// Every field is optional; the backend mixes OAuth-style snake_case token
/// fields with camelCase ones, so both spellings are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthEnvelope {
    /// `true`/`false`, or an `{code, message}` object on some failures
    pub error: Value,
    pub success: Option<bool>,
    pub message: Option<String>,
    pub message_ar: Option<String>,
    pub message_en: Option<String>,
    pub code: Option<String>,
    pub user: Option<Value>,

    pub requires: Option<Requires>,
    pub requires_otp: Option<bool>,
    pub email: Option<String>,
    pub login_session_token: Option<String>,
    pub login_session_expires_in: Option<u64>,

    #[serde(rename = "access_token")]
    pub oauth_access_token: Option<String>,
    #[serde(rename = "refresh_token")]
    pub oauth_refresh_token: Option<String>,
    #[serde(rename = "expires_in")]
    pub oauth_expires_in: Option<u64>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,

    pub password_warning: Option<PasswordBreachWarning>,
    pub security_warning: Option<SecurityWarning>,
    pub email_verification: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Requires {
    pub otp: bool,
    pub mfa: bool,
}

/// Returned on login when the password appears in a known breach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordBreachWarning {
    pub breached: bool,
    pub count: u64,
    pub message: String,
}

/// Attached to an OTP challenge when the password is compromised but login may proceed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityWarning {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub message_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breach_count: Option<u64>,
    pub require_password_change: bool,
}

impl AuthEnvelope {
    /// Decode an envelope; `null` and non-object bodies decode as empty.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.error, Value::Bool(true) | Value::Object(_))
    }

    /// The user record, if the body carries an object under `user`.
    pub fn identity(&self) -> Option<Identity> {
        self.user
            .clone()
            .and_then(|user| Identity::from_value(user).ok())
    }

    /// Nested `requires.otp` takes precedence over legacy `requiresOtp`.
    pub fn otp_required(&self) -> bool {
        self.requires.is_some_and(|r| r.otp) || self.requires_otp == Some(true)
    }

    pub fn access_token(&self) -> Option<&str> {
        non_empty(self.oauth_access_token.as_deref())
            .or_else(|| non_empty(self.access_token.as_deref()))
    }

    pub fn refresh_token(&self) -> Option<&str> {
        non_empty(self.oauth_refresh_token.as_deref())
            .or_else(|| non_empty(self.refresh_token.as_deref()))
    }

    pub fn token_expires_in(&self) -> Option<u64> {
        self.oauth_expires_in
            .filter(|secs| *secs > 0)
            .or(self.expires_in.filter(|secs| *secs > 0))
    }

    /// Backend message, preferring the Arabic text the UI shows first.
    pub fn display_message(&self) -> Option<&str> {
        non_empty(self.message_ar.as_deref()).or_else(|| non_empty(self.message.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
