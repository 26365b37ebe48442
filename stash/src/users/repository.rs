use super::error::UserError;
use super::models::User;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or replace a user document
    async fn save(&self, user: User) -> Result<User, UserError>;

    /// Find a live (not soft-deleted) user by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, UserError>;

    /// One page of live users, 1-based, in key order
    async fn find_page(&self, page: usize, limit: usize) -> Result<Vec<User>, UserError>;

    /// Number of live users
    async fn count(&self) -> Result<usize, UserError>;

    /// Mark a live user as deleted
    async fn soft_delete(&self, id: &str) -> Result<(), UserError>;
}
