pub mod health;
pub mod users;

pub use health::{health_check, hello};
pub use users::{create_user, delete_user, get_user, list_users};
