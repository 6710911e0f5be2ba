//! Access/refresh token persistence.

use crate::{
    ACCESS_TOKEN_KEY, AuthEnvelope, KeyValueStore, REFRESH_TOKEN_KEY, TOKEN_EXPIRES_AT_KEY,
};

use std::sync::Arc;

use log::{debug, warn};

/// Token slots in the shared key-value store.
///
/// Storage failures are logged and swallowed: a token that fails to persist
/// only costs a re-login, never the current operation.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist the tokens carried by an auth response.
    ///
    /// Returns `false` when the response has no access token (nothing stored).
    pub fn store_from(&self, envelope: &AuthEnvelope, now_millis: u64) -> bool {
        let Some(access) = envelope.access_token() else {
            warn!("Auth response did not include an access token");
            return false;
        };

        self.set(ACCESS_TOKEN_KEY, access);

        if let Some(refresh) = envelope.refresh_token() {
            self.set(REFRESH_TOKEN_KEY, refresh);
        }

        match envelope.token_expires_in() {
            Some(secs) => {
                let expires_at = now_millis.saturating_add(secs.saturating_mul(1000));
                self.set(TOKEN_EXPIRES_AT_KEY, &expires_at.to_string());
            }
            None => self.remove(TOKEN_EXPIRES_AT_KEY),
        }

        debug!(
            "Stored tokens (refresh: {}, expires_in: {:?})",
            envelope.refresh_token().is_some(),
            envelope.token_expires_in()
        );
        true
    }

    pub fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    /// Access-token expiry in epoch milliseconds, when known.
    pub fn expires_at(&self) -> Option<u64> {
        self.get(TOKEN_EXPIRES_AT_KEY)
            .and_then(|value| value.parse().ok())
    }

    pub fn clear(&self) {
        self.remove(ACCESS_TOKEN_KEY);
        self.remove(REFRESH_TOKEN_KEY);
        self.remove(TOKEN_EXPIRES_AT_KEY);
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to read {key}: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!("Failed to store {key}: {e}");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!("Failed to remove {key}: {e}");
        }
    }
}
