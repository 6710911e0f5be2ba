use crate::{AUTH_STORAGE_KEY, CacheSource, CacheTier, KeyValueStore, TierRead};

use counsel_core::Identity;

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;

/// The UI state layer's `auth-storage` blob, shaped `{ "state": { "user": ... } }`.
///
/// Owned by another component: reads tolerate any shape, writes are skipped,
/// and `clear` only nulls `state.user` so the rest of the blob survives.
pub struct SecondaryTier {
    store: Arc<dyn KeyValueStore>,
}

impl SecondaryTier {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> Option<Value> {
        match self.store.get(AUTH_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!("Ignoring unreadable {AUTH_STORAGE_KEY}: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read {AUTH_STORAGE_KEY}: {e}");
                None
            }
        }
    }
}

impl CacheTier for SecondaryTier {
    fn source(&self) -> CacheSource {
        CacheSource::Secondary
    }

    fn read(&self) -> TierRead {
        let user = self
            .load()
            .and_then(|blob| blob.get("state")?.get("user").cloned());

        match user {
            Some(user @ Value::Object(_)) => match Identity::from_value(user) {
                Ok(identity) => TierRead::Hit(identity),
                Err(_) => TierRead::Miss,
            },
            _ => TierRead::Miss,
        }
    }

    fn write(&self, _identity: &Identity) {}

    fn clear(&self) {
        let Some(mut blob) = self.load() else {
            return;
        };

        let Some(state) = blob.get_mut("state").and_then(Value::as_object_mut) else {
            return;
        };

        if state.get("user").is_none_or(Value::is_null) {
            return;
        }

        state.insert("user".to_string(), Value::Null);

        match serde_json::to_string(&blob) {
            Ok(json) => {
                if let Err(e) = self.store.set(AUTH_STORAGE_KEY, &json) {
                    warn!("Failed to write {AUTH_STORAGE_KEY}: {e}");
                }
            }
            Err(e) => warn!("Failed to serialize {AUTH_STORAGE_KEY}: {e}"),
        }
    }
}
