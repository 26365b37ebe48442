use super::error::UserError;
use super::models::User;
use super::repository::UserRepository;
use async_trait::async_trait;
use sled::Db;
use std::path::Path;

const USERS_TREE: &str = "users";

/// User documents stored as JSON in a sled tree, keyed by ID.
#[derive(Clone)]
pub struct SledUserRepository {
    db: Db,
}

impl SledUserRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, UserError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn users_tree(&self) -> Result<sled::Tree, UserError> {
        Ok(self.db.open_tree(USERS_TREE)?)
    }

    fn live_users(&self) -> Result<impl Iterator<Item = Result<User, UserError>>, UserError> {
        let users_tree = self.users_tree()?;
        Ok(users_tree
            .iter()
            .map(|item| {
                let (_, user_data) = item?;
                Ok(serde_json::from_slice::<User>(&user_data)?)
            })
            .filter(|user| !matches!(user, Ok(u) if u.deleted)))
    }
}

#[async_trait]
impl UserRepository for SledUserRepository {
    async fn save(&self, user: User) -> Result<User, UserError> {
        let users_tree = self.users_tree()?;
        let user_json = serde_json::to_vec(&user)?;
        users_tree.insert(user.id.as_bytes(), user_json)?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, UserError> {
        let users_tree = self.users_tree()?;

        if let Some(user_data) = users_tree.get(id.as_bytes())? {
            let user: User = serde_json::from_slice(&user_data)?;
            if !user.deleted {
                return Ok(Some(user));
            }
        }

        Ok(None)
    }

    async fn find_page(&self, page: usize, limit: usize) -> Result<Vec<User>, UserError> {
        let skip = page.saturating_sub(1).saturating_mul(limit);
        self.live_users()?.skip(skip).take(limit).collect()
    }

    async fn count(&self) -> Result<usize, UserError> {
        let mut total = 0;
        for user in self.live_users()? {
            user?;
            total += 1;
        }
        Ok(total)
    }

    async fn soft_delete(&self, id: &str) -> Result<(), UserError> {
        let mut user = self.find_by_id(id).await?.ok_or(UserError::NotFound)?;
        user.mark_deleted();
        self.save(user).await?;
        Ok(())
    }
}
