use async_trait::async_trait;
use bytes::Bytes;
use shared::{Result, TtlSecs};

// Ports are the pluggable extension points for backing stores

/// Port for a key-value store with server-enforced expiration.
///
/// Implementations must make individual `get`/`put` calls atomic per key; no
/// multi-key guarantees are required.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Fetch the raw entry for `key`, or `None` if it is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Store `value` under `key`, replacing any previous entry and its expiration.
    async fn put(&self, key: &str, value: Bytes, ttl: TtlSecs) -> Result<()>;

    /// Remove the entry for `key`. Returns whether one existed.
    async fn delete(&self, key: &str) -> Result<bool>;
}
