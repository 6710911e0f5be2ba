use super::{Inner, SessionReconciler};
use crate::models::email_verification::RATE_LIMITED_CODE;
use crate::{
    AuthEnvelope, EmailVerificationResult, SessionError, SessionResult,
    VerificationEmailRequestResult,
};

use log::{debug, info, warn};
use serde_json::Value;

const RATE_LIMITED_MESSAGE_AR: &str = "يرجى الانتظار قبل إعادة الإرسال";
const RATE_LIMITED_MESSAGE_EN: &str = "Please wait before resending";
const GENERIC_SENT_MESSAGE_AR: &str =
    "إذا كان هذا البريد مسجلاً وغير مُفعّل، سيتم إرسال رابط التفعيل.";
const GENERIC_SENT_MESSAGE_EN: &str =
    "If this email is registered and not verified, a verification link will be sent.";

impl SessionReconciler {
    /// Send a verification link to the signed-in user's address.
    pub async fn send_verification_email(&self) -> SessionResult<EmailVerificationResult> {
        let envelope = self.inner.api.resend_verification().await?;
        Ok(send_result(envelope))
    }

    /// Same endpoint as [`send_verification_email`](Self::send_verification_email).
    pub async fn resend_verification_email(&self) -> SessionResult<EmailVerificationResult> {
        self.send_verification_email().await
    }

    /// Confirm an address with the token from a verification link.
    ///
    /// On success the cached identity is marked verified in place.
    pub async fn verify_email(&self, token: &str) -> SessionResult<EmailVerificationResult> {
        if token.trim().is_empty() {
            return Err(SessionError::validation("token", "Verification token is required"));
        }

        let envelope = self.inner.api.verify_email(token.trim()).await?;
        let success = !envelope.is_error();

        if success {
            let verified_at = envelope
                .user
                .as_ref()
                .and_then(|user| user.get("emailVerifiedAt"))
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| self.inner.clock.now_rfc3339());

            self.inner.mark_email_verified(verified_at);
        }

        Ok(EmailVerificationResult {
            success,
            message: envelope.message.unwrap_or_default(),
        })
    }

    /// Public "resend my verification link" request for users who cannot sign in.
    ///
    /// Never fails. A rate-limited request reports the wait; every other
    /// failure reports a generic success so the response does not reveal
    /// whether the address is registered.
    pub async fn request_verification_email(&self, email: &str) -> VerificationEmailRequestResult {
        match self.inner.api.request_verification_email(email.trim()).await {
            Ok(envelope) => VerificationEmailRequestResult {
                success: !envelope.is_error(),
                message: envelope.message.unwrap_or_default(),
                message_en: envelope.message_en,
                code: envelope.code,
                ..Default::default()
            },
            Err(e) if e.status_code() == Some(429) => {
                let body = e.body();
                warn!("Verification email request rate limited");
                VerificationEmailRequestResult {
                    success: false,
                    message: str_field(body, "message")
                        .unwrap_or_else(|| RATE_LIMITED_MESSAGE_AR.to_string()),
                    message_en: Some(
                        str_field(body, "messageEn")
                            .unwrap_or_else(|| RATE_LIMITED_MESSAGE_EN.to_string()),
                    ),
                    wait_seconds: body.get("waitSeconds").and_then(Value::as_u64),
                    wait_minutes: body.get("waitMinutes").and_then(Value::as_u64),
                    code: Some(RATE_LIMITED_CODE.to_string()),
                }
            }
            Err(e) => {
                debug!("Verification email request failed (reported as sent): {e}");
                VerificationEmailRequestResult {
                    success: true,
                    message: GENERIC_SENT_MESSAGE_AR.to_string(),
                    message_en: Some(GENERIC_SENT_MESSAGE_EN.to_string()),
                    ..Default::default()
                }
            }
        }
    }
}

impl Inner {
    fn mark_email_verified(&self, verified_at: String) {
        let mut state = self.lock_state();

        let Some(cached) = self.cache.read() else {
            debug!("Email verified with no cached identity to update");
            return;
        };

        let mut identity = cached.identity;
        identity.insert("isEmailVerified", Value::Bool(true));
        identity.insert("emailVerifiedAt", Value::String(verified_at));
        self.cache.store(&identity);
        state.recent = None;

        info!("Email verified: user {}", identity.id().unwrap_or("-"));
    }
}

fn send_result(envelope: AuthEnvelope) -> EmailVerificationResult {
    EmailVerificationResult {
        success: !envelope.is_error() && envelope.success != Some(false),
        message: envelope.message.unwrap_or_default(),
    }
}

fn str_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
