use crate::{PasswordBreachWarning, SecurityWarning};

use counsel_core::Identity;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default OTP lifetime when the backend omits `expiresIn`.
pub const DEFAULT_OTP_EXPIRES_IN_SECS: u64 = 300;
/// Default login-session lifetime when the backend omits `loginSessionExpiresIn`.
pub const DEFAULT_LOGIN_SESSION_EXPIRES_IN_SECS: u64 = 600;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    /// Username or email
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            captcha_token: None,
            remember_me: None,
        }
    }
}

/// Completed login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub user: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<PasswordBreachWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification: Option<Value>,
}

/// Password accepted; an emailed one-time code must be verified to finish.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpChallenge {
    pub code: String,
    pub message: String,
    pub message_en: String,
    /// Masked email for display (`u***r@example.com`)
    pub email: String,
    /// The identifier the user typed; sent back with the code
    pub full_email: String,
    pub expires_in: u64,
    pub login_session_token: String,
    pub login_session_expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_warning: Option<SecurityWarning>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginOutcome {
    Authenticated(LoginResult),
    OtpRequired(OtpChallenge),
}

impl LoginOutcome {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(result) => Some(&result.user),
            Self::OtpRequired(_) => None,
        }
    }
}
