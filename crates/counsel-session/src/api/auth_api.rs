use crate::{
    ApiResult, AuthEnvelope, AuthTransport, AvailabilityField, LoginCredentials,
    MagicLinkResponse, OtpPurpose, OtpResponse, RegisterData, VerifyOtpRequest,
};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Typed wrappers over the `/auth/*` endpoints.
#[derive(Clone)]
pub struct AuthApi {
    transport: Arc<dyn AuthTransport>,
}

impl AuthApi {
    pub fn new(transport: Arc<dyn AuthTransport>) -> Self {
        Self { transport }
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthEnvelope> {
        let body = serde_json::to_value(credentials)?;
        let value = self.transport.post("/auth/login", Some(body)).await?;
        Ok(AuthEnvelope::from_value(value)?)
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.transport.post("/auth/logout", None).await?;
        Ok(())
    }

    /// `GET /auth/me`
    pub async fn me(&self) -> ApiResult<AuthEnvelope> {
        let value = self.transport.get("/auth/me").await?;
        Ok(AuthEnvelope::from_value(value)?)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub async fn register(&self, data: &RegisterData) -> ApiResult<AuthEnvelope> {
        let body = serde_json::to_value(data)?;
        let value = self.transport.post("/auth/register", Some(body)).await?;
        Ok(AuthEnvelope::from_value(value)?)
    }

    /// Raw body: `{error, available, message}`
    pub async fn check_availability(
        &self,
        field: AvailabilityField,
        value: &str,
    ) -> ApiResult<Value> {
        let body = json!({ "field": field.as_str(), "value": value });
        self.transport
            .post("/auth/check-availability", Some(body))
            .await
    }

    // =========================================================================
    // OTP
    // =========================================================================

    pub async fn send_otp(&self, email: &str, purpose: OtpPurpose) -> ApiResult<OtpResponse> {
        let body = json!({ "email": email, "purpose": purpose.as_str() });
        let value = self.transport.post("/auth/send-otp", Some(body)).await?;
        decode(value)
    }

    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> ApiResult<AuthEnvelope> {
        let body = serde_json::to_value(request)?;
        let value = self.transport.post("/auth/verify-otp", Some(body)).await?;
        Ok(AuthEnvelope::from_value(value)?)
    }

    /// Raw body: `{success, data: {attemptsRemaining, resetTime}}`
    pub async fn otp_status(&self) -> ApiResult<Value> {
        self.transport.get("/auth/otp-status").await
    }

    // =========================================================================
    // Magic link
    // =========================================================================

    pub async fn send_magic_link(&self, email: &str) -> ApiResult<MagicLinkResponse> {
        let body = json!({ "email": email });
        let value = self
            .transport
            .post("/auth/magic-link/send", Some(body))
            .await?;
        decode(value)
    }

    pub async fn verify_magic_link(&self, token: &str) -> ApiResult<AuthEnvelope> {
        let body = json!({ "token": token });
        let value = self
            .transport
            .post("/auth/magic-link/verify", Some(body))
            .await?;
        Ok(AuthEnvelope::from_value(value)?)
    }

    // =========================================================================
    // Email verification
    // =========================================================================

    /// Used for both the first send and resends.
    pub async fn resend_verification(&self) -> ApiResult<AuthEnvelope> {
        let value = self
            .transport
            .post("/auth/resend-verification", None)
            .await?;
        Ok(AuthEnvelope::from_value(value)?)
    }

    pub async fn verify_email(&self, token: &str) -> ApiResult<AuthEnvelope> {
        let body = json!({ "token": token });
        let value = self.transport.post("/auth/verify-email", Some(body)).await?;
        Ok(AuthEnvelope::from_value(value)?)
    }

    /// Public endpoint; works without a session.
    pub async fn request_verification_email(&self, email: &str) -> ApiResult<AuthEnvelope> {
        let body = json!({ "email": email });
        let value = self
            .transport
            .post("/auth/request-verification-email", Some(body))
            .await?;
        Ok(AuthEnvelope::from_value(value)?)
    }
}

/// Decode a response body; an empty body decodes as the default value.
fn decode<T: DeserializeOwned + Default>(value: Value) -> ApiResult<T> {
    match value {
        Value::Null => Ok(T::default()),
        value => Ok(serde_json::from_value(value)?),
    }
}
