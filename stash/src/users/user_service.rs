use super::error::UserError;
use super::models::{NewUser, User, UserPage};
use super::repository::UserRepository;
use crate::cache::{CacheAside, Cacheable, KeyTemplate};
use shared::TtlSecs;
use std::sync::Arc;
use tracing::{info, warn};

pub const MAX_PAGE_SIZE: usize = 100;
pub const USER_KEY_TEMPLATE: &str = "user:id:{id}";

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    cache: CacheAside,
    by_id: Cacheable,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        cache: CacheAside,
        by_id_ttl: TtlSecs,
    ) -> Result<Self, UserError> {
        let template =
            KeyTemplate::parse(USER_KEY_TEMPLATE).map_err(|e| UserError::Cache(e.to_string()))?;
        Ok(Self {
            user_repo,
            cache,
            by_id: Cacheable::new(template, by_id_ttl),
        })
    }

    /// Turn the by-id cache on or off without rebuilding the service
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.by_id = self.by_id.enabled(enabled);
        self
    }

    /// Create a user from a quote request
    pub async fn create_user(&self, req: NewUser) -> Result<User, UserError> {
        let company = req.company.trim();
        if company.is_empty() {
            return Err(UserError::Validation("empresa must not be empty".to_string()));
        }
        if req.amount <= 0 {
            return Err(UserError::Validation("valor must be greater than zero".to_string()));
        }

        let user = User::new(company.to_string(), req.final_quote());
        info!("Creating user {} for '{}'", user.id, user.company);
        self.user_repo.save(user).await
    }

    /// Get a user by ID through the read-through cache.
    ///
    /// Unknown IDs are cached too (as `null`) for the same ttl.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, UserError> {
        let repo = &self.user_repo;
        let user = self
            .by_id
            .call(&self.cache, &[("id", id)], || repo.find_by_id(id))
            .await?;
        Ok(user)
    }

    /// List live users, one page at a time
    pub async fn list_users(&self, page: usize, limit: usize) -> Result<UserPage, UserError> {
        if page == 0 {
            return Err(UserError::Validation("page must be at least 1".to_string()));
        }
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(UserError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let data = self.user_repo.find_page(page, limit).await?;
        let total_items = self.user_repo.count().await?;
        Ok(UserPage::new(data, page, limit, total_items))
    }

    /// Soft-delete a user and drop its cached entry.
    ///
    /// A lookup that missed before the delete may still write the old user
    /// after the invalidation, so a deleted user can be served from the cache
    /// for up to the by-id ttl.
    pub async fn soft_delete_user(&self, id: &str) -> Result<(), UserError> {
        self.user_repo.soft_delete(id).await?;
        info!("Soft-deleted user {}", id);

        if !self.by_id.is_enabled() {
            return Ok(());
        }
        match self.by_id.key(&[("id", id)]) {
            Ok(key) => {
                if let Err(e) = self.cache.store().delete(&key).await {
                    warn!("Failed to invalidate cache entry '{}': {}", key, e);
                }
            }
            Err(e) => warn!("Failed to derive cache key for user {}: {}", id, e),
        }
        Ok(())
    }
}
