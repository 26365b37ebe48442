use serde::Deserialize;
use stash::users::NewUser;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub empresa: String,
    pub valor: i64,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        NewUser {
            company: req.empresa,
            amount: req.valor,
        }
    }
}

/// Raw `?page=&limit=` values; parsed in `validation` so bad input gets a JSON error body
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}
