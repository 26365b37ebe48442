use crate::api::{CreateUserRequest, ErrorResponse, PaginationQuery};
use crate::state::AppState;
use crate::validation::validate_pagination;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use stash::users::{User, UserError, UserPage};
use tracing::{error, info, warn};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: UserError) -> ApiError {
    let status = match &e {
        UserError::NotFound => StatusCode::NOT_FOUND,
        UserError::Validation(_) => StatusCode::BAD_REQUEST,
        UserError::Storage(_) | UserError::Serialization(_) | UserError::Cache(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        error!("User request failed: {}", e);
    } else {
        warn!("User request rejected: {}", e);
    }
    (status, Json(ErrorResponse::new(e.to_string())))
}

/// GET /users?page=&limit= - List live users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<UserPage>, ApiError> {
    let paging = validate_pagination(&query)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))))?;

    info!("LIST_USERS: page={}, limit={}", paging.page, paging.limit);

    state
        .user_service
        .list_users(paging.page, paging.limit)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /users - Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    info!("CREATE_USER: empresa={}, valor={}", req.empresa, req.valor);

    match state.user_service.create_user(req.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user))),
        Err(e) => Err(error_response(e)),
    }
}

/// GET /users/{id} - Get a user through the read-through cache
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    info!("GET_USER: id={}", id);

    match state.user_service.get_user_by_id(&id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("User not found")),
        )),
        Err(e) => Err(error_response(e)),
    }
}

/// DELETE /users/{id} - Soft-delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE_USER: id={}", id);

    state
        .user_service
        .soft_delete_user(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}
