//! Tiered identity cache.
//!
//! Three independently readable tiers, consulted in order: the primary store
//! entry, an in-process backup, and the UI state layer's persisted blob. A hit
//! in any tier repairs the others.

pub(crate) mod identity_cache;
pub(crate) mod memory_tier;
pub(crate) mod primary_tier;
pub(crate) mod secondary_tier;

pub use identity_cache::{CachedIdentity, IdentityCache};
pub use memory_tier::MemoryTier;
pub use primary_tier::PrimaryTier;
pub use secondary_tier::SecondaryTier;

use counsel_core::Identity;

use std::fmt;

use serde::Serialize;

/// Which tier a cached identity was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheSource {
    Primary,
    Memory,
    Secondary,
}

impl fmt::Display for CacheSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primary => "primary",
            Self::Memory => "memory",
            Self::Secondary => "secondary",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TierRead {
    Hit(Identity),
    Miss,
    /// Entry present but unreadable; carries the parse error
    Corrupt(String),
}

/// One slot in the fallback chain.
///
/// Writes and clears are best effort: failures are logged by the tier and
/// never propagate, since the chain must keep answering from the other tiers.
pub trait CacheTier: Send + Sync {
    fn source(&self) -> CacheSource;

    fn read(&self) -> TierRead;

    fn write(&self, identity: &Identity);

    fn clear(&self);
}
