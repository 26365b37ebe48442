use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// The router wrapped so trailing slashes are trimmed before route matching
pub type App = NormalizePath<Router>;

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::hello))
        // Health check
        .route("/health", get(handlers::health_check))
        // User routes
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router plus path normalization. `Router::layer` only runs after a route
/// matched, so the normalizer has to wrap the whole router.
pub fn build_app(state: AppState) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
