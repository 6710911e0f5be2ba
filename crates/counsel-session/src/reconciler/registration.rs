use super::SessionReconciler;
use crate::{Availability, AvailabilityField, RegisterData, SessionError, SessionResult};

use log::info;
use serde_json::Value;

const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";
const AVAILABILITY_FAILED_MESSAGE: &str = "Availability check failed";
const MALFORMED_AVAILABILITY_STATUSES: &[u16] = &[400, 422];

impl SessionReconciler {
    /// Create an account. Does not sign in.
    pub async fn register(&self, data: &RegisterData) -> SessionResult<()> {
        if data.email.trim().is_empty() {
            return Err(SessionError::validation("email", "Email is required"));
        }
        if data.password.is_empty() {
            return Err(SessionError::validation("password", "Password is required"));
        }

        let envelope = self.inner.api.register(data).await?;
        if envelope.is_error() {
            let message = envelope
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| REGISTRATION_FAILED_MESSAGE.to_string());
            return Err(SessionError::authentication_failed(message));
        }

        info!("Registered {}", data.email.trim());
        Ok(())
    }

    /// Ask whether an email, username or phone number is still free.
    pub async fn check_availability(
        &self,
        field: AvailabilityField,
        value: &str,
    ) -> SessionResult<Availability> {
        if value.trim().is_empty() {
            return Err(SessionError::validation(
                "value",
                format!("A {field} is required"),
            ));
        }

        let body = self
            .inner
            .api
            .check_availability(field, value.trim())
            .await
            .map_err(|e| {
                SessionError::from_api_for_field(e, "value", MALFORMED_AVAILABILITY_STATUSES)
            })?;

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(String::from);

        if body.get("error").and_then(Value::as_bool) == Some(true) {
            return Err(SessionError::authentication_failed(
                message.unwrap_or_else(|| AVAILABILITY_FAILED_MESSAGE.to_string()),
            ));
        }

        Ok(Availability {
            available: body
                .get("available")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            message,
        })
    }
}
