use shared::config::Config;
use stash::cache::CacheAside;
use stash::ports::CacheStore;
use stash::users::{UserError, UserRepository, UserService};
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(user_service: Arc<UserService>) -> Self {
        Self { user_service }
    }

    /// Wire the user service to `store` using the cache settings in `config`
    pub fn from_parts(
        config: &Config,
        store: Arc<dyn CacheStore>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Result<Self, UserError> {
        let cache = CacheAside::new(store).with_decode_fallback(config.decode_fallback);
        let user_service = UserService::new(user_repo, cache, config.user_cache_ttl)?
            .with_cache_enabled(config.user_cache_enabled);
        Ok(Self::new(Arc::new(user_service)))
    }
}
