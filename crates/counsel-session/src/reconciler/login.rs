//! Password login and the shared "complete an authentication" path.

use super::{Inner, SessionReconciler};
use crate::models::credentials::{
    DEFAULT_LOGIN_SESSION_EXPIRES_IN_SECS, DEFAULT_OTP_EXPIRES_IN_SECS,
};
use crate::{
    AuthEnvelope, LoginCredentials, LoginOutcome, LoginResult, OtpChallenge, SessionError,
    SessionResult,
};

use counsel_core::Identity;

use log::{info, warn};
use serde_json::Value;

const OTP_REQUIRED_CODE: &str = "OTP_REQUIRED";
const OTP_REQUIRED_MESSAGE_AR: &str = "يرجى إدخال رمز التحقق المرسل إلى بريدك الإلكتروني";
const OTP_REQUIRED_MESSAGE_EN: &str = "Please enter the verification code sent to your email";
const LOGIN_FAILED_MESSAGE: &str = "Login failed";
const MISSING_SESSION_TOKEN_MESSAGE: &str = "Authentication system error. Please try again.";

impl SessionReconciler {
    /// Authenticate with username (or email) and password.
    ///
    /// Returns [`LoginOutcome::OtpRequired`] when the backend asks for an
    /// emailed code; nothing is cached in that case. On
    /// [`LoginOutcome::Authenticated`] the identity is normalized, breach flags
    /// are applied, and every cache tier is written.
    pub async fn login(&self, credentials: &LoginCredentials) -> SessionResult<LoginOutcome> {
        if credentials.username.trim().is_empty() {
            return Err(SessionError::validation("username", "Username is required"));
        }
        if credentials.password.is_empty() {
            return Err(SessionError::validation("password", "Password is required"));
        }

        let envelope = self.inner.api.login(credentials).await?;

        if envelope.otp_required() {
            return match envelope.login_session_token.as_deref().filter(|t| !t.is_empty()) {
                Some(token) => {
                    info!(
                        "Password verified, OTP required (masked email: {})",
                        envelope.email.as_deref().unwrap_or("-")
                    );
                    Ok(LoginOutcome::OtpRequired(otp_challenge(
                        &envelope,
                        &credentials.username,
                        token,
                    )))
                }
                None => {
                    warn!("Backend required OTP without a login session token");
                    Err(SessionError::authentication_failed(
                        MISSING_SESSION_TOKEN_MESSAGE,
                    ))
                }
            };
        }

        let mut identity = self.inner.complete_authentication(&envelope, LOGIN_FAILED_MESSAGE)?;

        let warning = envelope.password_warning.clone();
        if let Some(warning) = warning.as_ref().filter(|w| w.breached) {
            warn!("Password found in {} known breaches", warning.count);
            identity.insert("mustChangePassword", Value::Bool(true));
            identity.insert("passwordBreached", Value::Bool(true));
        }

        self.inner.establish(&identity);
        info!(
            "Logged in: user {} (firm {})",
            identity.id().unwrap_or("-"),
            identity.firm_id().unwrap_or("-")
        );

        Ok(LoginOutcome::Authenticated(LoginResult {
            user: identity,
            warning,
            email_verification: envelope.email_verification,
        }))
    }
}

impl Inner {
    /// Validate a login-like response, store its tokens, and return the
    /// normalized identity. Does not touch the cache.
    pub(super) fn complete_authentication(
        &self,
        envelope: &AuthEnvelope,
        default_message: &str,
    ) -> SessionResult<Identity> {
        let identity = match envelope.identity() {
            Some(identity) if !envelope.is_error() => identity,
            _ => {
                let message = envelope
                    .message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(default_message);
                return Err(SessionError::authentication_failed(message));
            }
        };

        self.tokens.store_from(envelope, self.clock.now_millis());

        Ok(identity.normalized())
    }
}

fn otp_challenge(envelope: &AuthEnvelope, username: &str, token: &str) -> OtpChallenge {
    OtpChallenge {
        code: OTP_REQUIRED_CODE.to_string(),
        message: envelope
            .display_message()
            .unwrap_or(OTP_REQUIRED_MESSAGE_AR)
            .to_string(),
        message_en: envelope
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(envelope.message_en.as_deref().filter(|m| !m.is_empty()))
            .unwrap_or(OTP_REQUIRED_MESSAGE_EN)
            .to_string(),
        email: envelope.email.clone().unwrap_or_default(),
        full_email: username.to_string(),
        expires_in: envelope
            .expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_OTP_EXPIRES_IN_SECS),
        login_session_token: token.to_string(),
        login_session_expires_in: envelope
            .login_session_expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_LOGIN_SESSION_EXPIRES_IN_SECS),
        security_warning: envelope.security_warning.clone(),
    }
}
