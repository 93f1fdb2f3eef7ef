use axum::{
    Json, Router,
    http::{Method, Uri},
    routing::get,
};

use crate::{error::AppError, state::AppState};

pub mod doc;
pub mod health;
pub mod items;
pub mod params;
pub mod shopcarts;

/// Everything the service routes, minus the transport middleware stack
/// that `main` layers on top. Tests drive this router directly.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_check))
        .nest("/shopcarts", shopcarts::router().merge(items::router()))
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

/// Root URL response: a small machine-readable service descriptor.
async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Shopcart REST API Service",
        "version": env!("CARGO_PKG_VERSION"),
        "paths": { "shopcarts": "/shopcarts" },
    }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Path '{}' was not found.", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!(
        "Method '{method}' is not allowed on '{}'.",
        uri.path()
    ))
}
