pub mod moka_store;
pub mod redis_store;

pub use moka_store::MokaStore;
pub use redis_store::RedisStore;

use shared::config::{CacheStoreKind, Config};
use shared::Result;
use stash::ports::CacheStore;
use std::sync::Arc;
use tracing::info;

/// Builds the backing store selected by configuration
pub struct StorageFactory;

impl StorageFactory {
    pub async fn from_config(config: &Config) -> Result<Arc<dyn CacheStore>> {
        match config.cache_store {
            CacheStoreKind::Memory => {
                let store = MokaStore::new("stash".to_string(), config.cache_max_entries);
                info!(
                    "Using in-process cache store (max entries: {})",
                    config
                        .cache_max_entries
                        .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
                );
                Ok(Arc::new(store))
            }
            CacheStoreKind::Redis => {
                let store = RedisStore::connect(&config.redis_url, config.cache_prefix.clone()).await?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use shared::TtlSecs;

    fn memory_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            http_port: 0,
            data_dir: "./data".to_string(),
            cache_store: CacheStoreKind::Memory,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            cache_prefix: None,
            cache_max_entries: Some(100),
            user_cache_ttl: TtlSecs::new(60).unwrap(),
            user_cache_enabled: true,
            decode_fallback: Default::default(),
            seed_users: 0,
        }
    }

    #[tokio::test]
    async fn test_factory_builds_memory_store() {
        let store = StorageFactory::from_config(&memory_config()).await.unwrap();

        store
            .put("k", Bytes::from_static(b"v"), TtlSecs::new(10).unwrap())
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(Bytes::from_static(b"v")));
    }

    #[tokio::test]
    async fn test_factory_rejects_malformed_redis_url() {
        let config = Config {
            cache_store: CacheStoreKind::Redis,
            redis_url: "not a url".to_string(),
            ..memory_config()
        };

        let result = StorageFactory::from_config(&config).await;
        assert!(matches!(result, Err(shared::Error::Store(_))));
    }
}
