use crate::{CacheSource, CacheTier, TierRead};

use counsel_core::Identity;

use std::sync::{Mutex, PoisonError};

/// In-process backup that survives the persisted entry being wiped underneath us.
#[derive(Debug, Default)]
pub struct MemoryTier {
    identity: Mutex<Option<Identity>>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheTier for MemoryTier {
    fn source(&self) -> CacheSource {
        CacheSource::Memory
    }

    fn read(&self) -> TierRead {
        let identity = self.identity.lock().unwrap_or_else(PoisonError::into_inner);
        match identity.as_ref() {
            Some(identity) => TierRead::Hit(identity.clone()),
            None => TierRead::Miss,
        }
    }

    fn write(&self, identity: &Identity) {
        *self.identity.lock().unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
    }

    fn clear(&self) {
        *self.identity.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
