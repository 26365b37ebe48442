use crate::cache::CacheAsideError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl From<sled::Error> for UserError {
    fn from(err: sled::Error) -> Self {
        UserError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for UserError {
    fn from(err: serde_json::Error) -> Self {
        UserError::Serialization(err.to_string())
    }
}

impl From<CacheAsideError<UserError>> for UserError {
    fn from(err: CacheAsideError<UserError>) -> Self {
        match err {
            CacheAsideError::Compute(inner) => inner,
            other => UserError::Cache(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_errors_pass_through_cache_layer() {
        let err: UserError = CacheAsideError::Compute(UserError::Storage("disk full".into())).into();
        assert!(matches!(err, UserError::Storage(msg) if msg == "disk full"));
    }

    #[test]
    fn test_cache_failures_are_wrapped() {
        let err: UserError =
            CacheAsideError::<UserError>::StoreRead(shared::Error::Store("timeout".into())).into();
        assert!(matches!(err, UserError::Cache(msg) if msg.contains("timeout")));
    }
}
