use counsel_core::Identity;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a one-time code is being requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    #[default]
    Login,
    Registration,
    VerifyEmail,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Login => "login",
            Self::Registration => "registration",
            Self::VerifyEmail => "verify_email",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body of `POST /auth/verify-otp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
    #[serde(default)]
    pub purpose: OtpPurpose,
    /// Required when `purpose` is `login`; proves the password step passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_session_token: Option<String>,
}

/// Successful OTP verification; the session is established.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerification {
    pub user: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification: Option<Value>,
}

/// OTP rate-limit state from `GET /auth/otp-status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OtpStatus {
    pub attempts_remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_time: Option<String>,
}
