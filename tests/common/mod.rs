use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use sea_orm::{ConnectionTrait, Statement};
use serde_json::Value;
use tower::ServiceExt;

use shopcart_api::{db, db::OrmConn, routes, state::AppState};

/// Connects to the test database, resets it, and builds the app router.
/// Returns `None` when no database is configured so the flow tests can
/// skip in environments without Postgres.
pub async fn setup() -> anyhow::Result<Option<(Router, OrmConn)>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests."
                );
                return Ok(None);
            }
        };

    let orm = db::connect(&database_url).await?;
    db::run_migrations(&orm).await?;

    // Clean tables between runs.
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE shopcart_item, shopcart RESTART IDENTITY CASCADE",
    ))
    .await?;

    let router = routes::app_router(AppState { orm: orm.clone() });
    Ok(Some((router, orm)))
}

/// Sends one request through the router; a `Some` body goes out as JSON.
/// Returns the status, response headers, and parsed body (`Null` when the
/// response body is empty).
pub async fn request(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, headers, value)
}

/// Like [`request`] but with full control over the Content-Type header,
/// for exercising the 415 path.
pub async fn request_with_content_type(
    router: &Router,
    method: Method,
    uri: &str,
    body: &str,
    content_type: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    let response = router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
