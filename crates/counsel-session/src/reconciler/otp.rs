use super::SessionReconciler;
use crate::{
    OtpPurpose, OtpResponse, OtpStatus, OtpVerification, SessionError, SessionResult,
    VerifyOtpRequest,
};

use log::info;

const OTP_FAILED_MESSAGE: &str = "OTP verification failed";
/// A wrong code is a 400 and stays an authentication failure
const MALFORMED_OTP_STATUSES: &[u16] = &[422];
const LOGIN_SESSION_EXPIRED_MESSAGE: &str = "Login session expired. Please sign in again.";

impl SessionReconciler {
    /// Email a one-time code.
    pub async fn send_otp(&self, email: &str, purpose: OtpPurpose) -> SessionResult<OtpResponse> {
        require_email(email)?;

        let response = self.inner.api.send_otp(email.trim(), purpose).await?;
        info!("OTP sent ({})", purpose.as_str());
        Ok(response)
    }

    /// Same endpoint as [`send_otp`](Self::send_otp).
    pub async fn resend_otp(&self, email: &str, purpose: OtpPurpose) -> SessionResult<OtpResponse> {
        self.send_otp(email, purpose).await
    }

    /// Verify a one-time code. Success is a full login.
    ///
    /// For `OtpPurpose::Login` the `login_session_token` from the password
    /// step is mandatory and is checked before any request is made.
    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> SessionResult<OtpVerification> {
        require_email(&request.email)?;

        if request.otp.trim().is_empty() {
            return Err(SessionError::validation("otp", "Verification code is required"));
        }

        let has_session_token = request
            .login_session_token
            .as_deref()
            .is_some_and(|token| !token.is_empty());
        if request.purpose == OtpPurpose::Login && !has_session_token {
            return Err(SessionError::validation(
                "login_session_token",
                LOGIN_SESSION_EXPIRED_MESSAGE,
            ));
        }

        let envelope = self
            .inner
            .api
            .verify_otp(request)
            .await
            .map_err(|e| SessionError::from_api_for_field(e, "otp", MALFORMED_OTP_STATUSES))?;
        let identity = self
            .inner
            .complete_authentication(&envelope, OTP_FAILED_MESSAGE)?;

        self.inner.establish(&identity);
        info!("OTP verified: user {}", identity.id().unwrap_or("-"));

        Ok(OtpVerification {
            user: identity,
            email_verification: envelope.email_verification,
        })
    }

    /// Remaining OTP attempts for the current client.
    pub async fn check_otp_status(&self) -> SessionResult<OtpStatus> {
        let body = self.inner.api.otp_status().await?;

        let data = body
            .get("data")
            .cloned()
            .ok_or_else(|| SessionError::network_or_server("OTP status response has no data"))?;

        serde_json::from_value(data).map_err(|e| {
            SessionError::network_or_server(format!("Malformed OTP status response: {e}"))
        })
    }
}

pub(super) fn require_email(email: &str) -> SessionResult<()> {
    if email.trim().is_empty() {
        return Err(SessionError::validation("email", "Email is required"));
    }
    Ok(())
}
