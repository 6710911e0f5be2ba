use crate::{
    CacheSource, CacheTier, KeyValueStore, MemoryTier, PrimaryTier, SecondaryTier, TierRead,
};

use counsel_core::Identity;

use std::sync::Arc;

use log::{debug, warn};

/// An identity together with the tier it was found in.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedIdentity {
    pub identity: Identity,
    pub source: CacheSource,
}

/// Ordered fallback chain over the cache tiers.
pub struct IdentityCache {
    tiers: Vec<Box<dyn CacheTier>>,
}

impl IdentityCache {
    /// Primary, memory, secondary, all but memory backed by `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_tiers(vec![
            Box::new(PrimaryTier::new(Arc::clone(&store))),
            Box::new(MemoryTier::new()),
            Box::new(SecondaryTier::new(store)),
        ])
    }

    pub fn with_tiers(tiers: Vec<Box<dyn CacheTier>>) -> Self {
        Self { tiers }
    }

    /// Walk the chain and return the first identity found.
    ///
    /// A hit is copied into every other tier. Tiers that held unreadable data
    /// are cleared only when no tier produced an identity; otherwise the
    /// repair write already replaced their contents.
    pub fn read(&self) -> Option<CachedIdentity> {
        let mut corrupt: Vec<&dyn CacheTier> = Vec::new();

        for (index, tier) in self.tiers.iter().enumerate() {
            match tier.read() {
                TierRead::Hit(identity) => {
                    let source = tier.source();
                    if index > 0 || !corrupt.is_empty() {
                        debug!("Identity found in {source} tier, repairing the others");
                    }

                    for (other_index, other) in self.tiers.iter().enumerate() {
                        if other_index != index {
                            other.write(&identity);
                        }
                    }

                    return Some(CachedIdentity { identity, source });
                }
                TierRead::Miss => {}
                TierRead::Corrupt(reason) => {
                    warn!("Unreadable identity in {} tier: {reason}", tier.source());
                    corrupt.push(tier.as_ref());
                }
            }
        }

        for tier in corrupt {
            warn!("Removing unreadable identity from {} tier", tier.source());
            tier.clear();
        }

        None
    }

    /// Write the identity to every tier.
    pub fn store(&self, identity: &Identity) {
        for tier in &self.tiers {
            tier.write(identity);
        }
    }

    /// Clear every tier.
    pub fn clear(&self) {
        for tier in &self.tiers {
            tier.clear();
        }
    }
}
