pub mod requests;
pub mod responses;

pub use requests::{CreateUserRequest, PaginationQuery};
pub use responses::{ErrorResponse, MessageResponse};
