use super::codec::{self, DecodeError};
use crate::ports::CacheStore;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{DecodeFallback, TtlSecs};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CacheAsideError<E> {
    #[error("invalid cache key: {0}")]
    InvalidKey(String),

    #[error("cache store read failed: {0}")]
    StoreRead(shared::Error),

    #[error("cached entry for '{key}' could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: DecodeError,
    },

    #[error("{0}")]
    Compute(E),
}

impl<E> CacheAsideError<E> {
    /// Unwrap the computation's own error, if that is what failed.
    pub fn into_compute(self) -> Option<E> {
        match self {
            CacheAsideError::Compute(e) => Some(e),
            _ => None,
        }
    }
}

/// Read-through cache over a [`CacheStore`].
///
/// `get_or_set` returns the stored value for a key if one exists, otherwise
/// runs the supplied computation once, stores its JSON encoding with the given
/// ttl and returns it. The handle is stateless apart from the store it wraps,
/// so it is cheap to clone into every component that needs it.
///
/// Concurrent misses on the same key are not coalesced: each caller runs its
/// own computation and the store keeps whichever write lands last. Callers are
/// expected to cache idempotent lookups only.
///
/// A failed store read is returned as [`CacheAsideError::StoreRead`] without
/// computing; a failed store write is logged and the computed value returned.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    decode_fallback: DecodeFallback,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            decode_fallback: DecodeFallback::default(),
        }
    }

    pub fn with_decode_fallback(mut self, decode_fallback: DecodeFallback) -> Self {
        self.decode_fallback = decode_fallback;
        self
    }

    pub fn decode_fallback(&self) -> DecodeFallback {
        self.decode_fallback
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: TtlSecs,
        compute: F,
    ) -> Result<T, CacheAsideError<E>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if key.is_empty() {
            return Err(CacheAsideError::InvalidKey(
                "key must not be empty".to_string(),
            ));
        }

        let cached = self
            .store
            .get(key)
            .await
            .map_err(CacheAsideError::StoreRead)?;

        if let Some(raw) = cached {
            match codec::decode::<T>(&raw) {
                Ok(value) => {
                    debug!("Cache hit for '{}'", key);
                    return Ok(value);
                }
                Err(err) => {
                    if let Some(value) = self.recover_undecodable(key, &raw, err)? {
                        return Ok(value);
                    }
                }
            }
        }

        debug!("Cache miss for '{}', computing", key);
        let value = compute().await.map_err(CacheAsideError::Compute)?;

        // Encoded before the write so only owned bytes are held across it.
        let encoded = codec::encode(&value);
        self.put_best_effort(key, encoded, ttl).await;

        Ok(value)
    }

    /// Apply the decode fallback to an entry that failed to decode.
    ///
    /// `Ok(None)` means "treat as a miss".
    fn recover_undecodable<T, E>(
        &self,
        key: &str,
        raw: &[u8],
        err: DecodeError,
    ) -> Result<Option<T>, CacheAsideError<E>>
    where
        T: DeserializeOwned,
    {
        match self.decode_fallback {
            DecodeFallback::Recompute => {
                warn!(
                    "Cached entry for '{}' could not be decoded ({}), recomputing",
                    key, err
                );
                Ok(None)
            }
            DecodeFallback::Raw => match codec::decode_raw::<T>(raw) {
                Ok(value) => {
                    debug!("Cache hit for '{}' served as raw string", key);
                    Ok(Some(value))
                }
                Err(_) => Err(CacheAsideError::Decode {
                    key: key.to_string(),
                    source: err,
                }),
            },
            DecodeFallback::Fail => Err(CacheAsideError::Decode {
                key: key.to_string(),
                source: err,
            }),
        }
    }

    async fn put_best_effort(
        &self,
        key: &str,
        encoded: Result<Bytes, serde_json::Error>,
        ttl: TtlSecs,
    ) {
        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode value for '{}', not caching: {}", key, e);
                return;
            }
        };

        match self.store.put(key, bytes, ttl).await {
            Ok(()) => debug!("Cached '{}' for {}", key, ttl),
            Err(e) => warn!("Failed to set cache entry '{}': {}", key, e),
        }
    }
}

impl std::fmt::Debug for CacheAside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("decode_fallback", &self.decode_fallback)
            .finish()
    }
}
