//! String key-value persistence behind the cache tiers and token storage.

pub(crate) mod error;
pub(crate) mod file_store;
pub(crate) mod memory_store;

pub use error::{Result as StoreResult, StoreError};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Synchronous string store with local-storage semantics.
///
/// Values are opaque strings; callers own the encoding. Implementations use
/// interior mutability so one store can be shared by the cache, the token
/// store, and the HTTP transport.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}
