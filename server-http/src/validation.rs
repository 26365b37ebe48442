use crate::api::PaginationQuery;
use stash::users::user_service::MAX_PAGE_SIZE;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    NotANumber {
        field: &'static str,
        value: String,
    },
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NotANumber { field, value } => {
                write!(f, "Invalid {}: '{}' is not a positive integer", field, value)
            }
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "Invalid {}: {} is out of range [{}, {}]",
                field, value, min, max
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

/// Resolve `?page=&limit=`, applying defaults for absent or blank values
pub fn validate_pagination(query: &PaginationQuery) -> Result<Pagination, ValidationError> {
    let page = parse_field("page", query.page.as_deref(), DEFAULT_PAGE)?;
    let limit = parse_field("limit", query.limit.as_deref(), DEFAULT_LIMIT)?;

    if page < 1 {
        return Err(ValidationError::OutOfRange {
            field: "page",
            value: page,
            min: 1,
            max: usize::MAX,
        });
    }
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "limit",
            value: limit,
            min: 1,
            max: MAX_PAGE_SIZE,
        });
    }

    Ok(Pagination { page, limit })
}

fn parse_field(
    field: &'static str,
    raw: Option<&str>,
    default: usize,
) -> Result<usize, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| ValidationError::NotANumber {
            field,
            value: value.to_string(),
        }),
    }
}
