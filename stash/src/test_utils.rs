use crate::ports::CacheStore;
use async_trait::async_trait;
use bytes::Bytes;
use shared::{Error, Result, TtlSecs};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// HashMap-backed store with switchable failures, for exercising the cache
/// without a real backend.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    entries: Mutex<HashMap<String, (Bytes, Instant)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    pub(crate) reads: AtomicUsize,
    pub(crate) writes: AtomicUsize,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert an entry directly, bypassing failure injection.
    pub(crate) fn seed(&self, key: &str, value: impl Into<Bytes>, ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.into(), Instant::now() + ttl));
    }

    /// Read an entry directly, bypassing failure injection.
    pub(crate) fn peek(&self, key: &str) -> Option<Bytes> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone())
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Store("connection refused".to_string()));
        }
        Ok(self.peek(key))
    }

    async fn put(&self, key: &str, value: Bytes, ttl: TtlSecs) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Store("read-only replica".to_string()));
        }
        self.seed(key, value, ttl.as_duration());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Store("read-only replica".to_string()));
        }
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}
