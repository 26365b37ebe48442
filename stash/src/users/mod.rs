// Public API
pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod sled_repository;
pub mod user_service;

// Re-export commonly used types
pub use error::UserError;
pub use models::{NewUser, User, UserPage};
pub use repository::UserRepository;
pub use seed::seed_users;
pub use sled_repository::SledUserRepository;
pub use user_service::UserService;
