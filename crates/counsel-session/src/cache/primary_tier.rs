use crate::{CacheSource, CacheTier, KeyValueStore, TierRead, USER_KEY};

use counsel_core::Identity;

use std::sync::Arc;

use log::warn;
use serde_json::Value;

/// The `user` entry: the JSON-serialized identity.
pub struct PrimaryTier {
    store: Arc<dyn KeyValueStore>,
}

impl PrimaryTier {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl CacheTier for PrimaryTier {
    fn source(&self) -> CacheSource {
        CacheSource::Primary
    }

    fn read(&self) -> TierRead {
        let raw = match self.store.get(USER_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return TierRead::Miss,
            Err(e) => {
                warn!("Failed to read {USER_KEY}: {e}");
                return TierRead::Miss;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Null) => TierRead::Miss,
            Ok(value) => match Identity::from_value(value) {
                Ok(identity) => TierRead::Hit(identity),
                Err(e) => TierRead::Corrupt(e.to_string()),
            },
            Err(e) => TierRead::Corrupt(e.to_string()),
        }
    }

    fn write(&self, identity: &Identity) {
        let json = match serde_json::to_string(identity) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize identity: {e}");
                return;
            }
        };

        if let Err(e) = self.store.set(USER_KEY, &json) {
            warn!("Failed to write {USER_KEY}: {e}");
        }
    }

    fn clear(&self) {
        if let Err(e) = self.store.remove(USER_KEY) {
            warn!("Failed to remove {USER_KEY}: {e}");
        }
    }
}
