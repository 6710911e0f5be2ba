use serde::{Deserialize, Serialize};

/// Code returned when the verification-email endpoint is rate limited.
pub const RATE_LIMITED_CODE: &str = "RATE_LIMITED";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailVerificationResult {
    pub success: bool,
    pub message: String,
}

/// Outcome of the public "send me a verification link" request.
///
/// The result does not reveal whether the address is registered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerificationEmailRequestResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl VerificationEmailRequestResult {
    pub fn is_rate_limited(&self) -> bool {
        self.code.as_deref() == Some(RATE_LIMITED_CODE)
    }
}
