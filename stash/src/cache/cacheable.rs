use super::{CacheAside, CacheAsideError, KeyTemplate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::TtlSecs;
use std::future::Future;

/// Caching policy for one operation: how to derive its key and how long to keep
/// the result.
///
/// Wrap the operation body in [`Cacheable::call`]; the key is rendered from the
/// operation's identifying parameters before delegating to
/// [`CacheAside::get_or_set`]. A disabled policy runs the body directly.
#[derive(Clone, Debug)]
pub struct Cacheable {
    template: KeyTemplate,
    ttl: TtlSecs,
    enabled: bool,
}

impl Cacheable {
    pub fn new(template: KeyTemplate, ttl: TtlSecs) -> Self {
        Self {
            template,
            ttl,
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ttl(&self) -> TtlSecs {
        self.ttl
    }

    pub fn template(&self) -> &KeyTemplate {
        &self.template
    }

    pub fn key(&self, params: &[(&str, &str)]) -> shared::Result<String> {
        self.template.render(params)
    }

    pub async fn call<T, E, F, Fut>(
        &self,
        cache: &CacheAside,
        params: &[(&str, &str)],
        compute: F,
    ) -> Result<T, CacheAsideError<E>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.enabled {
            return compute().await.map_err(CacheAsideError::Compute);
        }

        let key = self.key(params).map_err(|e| match e {
            shared::Error::InvalidKey(msg) => CacheAsideError::InvalidKey(msg),
            other => CacheAsideError::InvalidKey(other.to_string()),
        })?;
        cache.get_or_set(&key, self.ttl, compute).await
    }
}
