use super::SessionReconciler;
use super::otp::require_email;
use crate::{MagicLinkResponse, SessionError, SessionResult};

use counsel_core::Identity;

use log::info;

const MAGIC_LINK_FAILED_MESSAGE: &str = "Magic link verification failed";

impl SessionReconciler {
    /// Email a passwordless sign-in link.
    pub async fn send_magic_link(&self, email: &str) -> SessionResult<MagicLinkResponse> {
        require_email(email)?;

        let response = self.inner.api.send_magic_link(email.trim()).await?;
        info!("Magic link sent");
        Ok(response)
    }

    /// Exchange a magic-link token for a session. Success is a full login.
    pub async fn verify_magic_link(&self, token: &str) -> SessionResult<Identity> {
        if token.trim().is_empty() {
            return Err(SessionError::validation("token", "Magic link token is required"));
        }

        let envelope = self.inner.api.verify_magic_link(token.trim()).await?;
        let identity = self
            .inner
            .complete_authentication(&envelope, MAGIC_LINK_FAILED_MESSAGE)?;

        self.inner.establish(&identity);
        info!("Magic link verified: user {}", identity.id().unwrap_or("-"));

        Ok(identity)
    }
}
