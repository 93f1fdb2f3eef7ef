use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode, header},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, ErrorBody},
    extract::AppJson,
    models::Shopcart,
    routes::params::ItemFilters,
    state::AppState,
    store,
};

/// Response of the checkout endpoint: the cart id and its freshly
/// recomputed total.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutSummary {
    pub id: i32,
    pub total_price: Decimal,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shopcarts).post(create_shopcart))
        .route(
            "/{id}",
            get(get_shopcart)
                .put(update_shopcart)
                .delete(delete_shopcart),
        )
        .route("/{id}/checkout", get(checkout_shopcart))
}

#[utoipa::path(
    get,
    path = "/shopcarts",
    params(
        ("product_id" = Option<i32>, Query, description = "Only carts containing an item with this product id"),
        ("name" = Option<String>, Query, description = "Only carts containing an item with this name")
    ),
    responses(
        (status = 200, description = "List shopcarts", body = Vec<Shopcart>)
    ),
    tag = "Shopcarts"
)]
pub async fn list_shopcarts(
    State(state): State<AppState>,
    Query(filters): Query<ItemFilters>,
) -> AppResult<Json<Vec<Shopcart>>> {
    let carts = if filters.is_empty() {
        store::shopcarts::find_all(&state.orm).await?
    } else {
        store::shopcarts::find_by_item_filters(
            &state.orm,
            filters.product_id,
            filters.name.as_deref(),
        )
        .await?
    };
    tracing::info!(count = carts.len(), "returning shopcarts");
    Ok(Json(carts))
}

#[utoipa::path(
    get,
    path = "/shopcarts/{id}",
    params(
        ("id" = i32, Path, description = "Shopcart ID")
    ),
    responses(
        (status = 200, description = "Get shopcart", body = Shopcart),
        (status = 404, description = "Shopcart not found", body = ErrorBody),
    ),
    tag = "Shopcarts"
)]
pub async fn get_shopcart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Shopcart>> {
    let cart = store::shopcarts::find_by_id(&state.orm, id)
        .await?
        .ok_or_else(|| AppError::shopcart_not_found(id))?;
    Ok(Json(cart))
}

#[utoipa::path(
    post,
    path = "/shopcarts",
    request_body = Shopcart,
    responses(
        (status = 201, description = "Create shopcart", body = Shopcart,
         headers(("Location" = String, description = "URL of the created shopcart"))),
        (status = 400, description = "Validation failed", body = ErrorBody),
    ),
    tag = "Shopcarts"
)]
pub async fn create_shopcart(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<Shopcart>)> {
    let cart = Shopcart::deserialize(&payload)?;
    let created = store::shopcarts::create(&state.orm, &cart).await?;

    let Some(id) = created.id else {
        return Err(AppError::Database(sea_orm::DbErr::Custom(
            "insert returned no id".to_string(),
        )));
    };
    let location = [(header::LOCATION, format!("/shopcarts/{id}"))];
    Ok((StatusCode::CREATED, location, Json(created)))
}

#[utoipa::path(
    put,
    path = "/shopcarts/{id}",
    params(
        ("id" = i32, Path, description = "Shopcart ID")
    ),
    request_body = Shopcart,
    responses(
        (status = 200, description = "Updated shopcart", body = Shopcart),
        (status = 404, description = "Shopcart not found", body = ErrorBody),
    ),
    tag = "Shopcarts"
)]
pub async fn update_shopcart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Json<Shopcart>> {
    if store::shopcarts::find_by_id(&state.orm, id).await?.is_none() {
        return Err(AppError::shopcart_not_found(id));
    }

    let mut cart = Shopcart::deserialize(&payload)?;
    cart.id = Some(id);

    // An `items` key, even an empty array, replaces the item rows; its
    // absence leaves them alone and only the cart fields change.
    let replace_items = payload.get("items").is_some_and(|items| !items.is_null());

    let mut updated = store::shopcarts::update(&state.orm, &cart, replace_items).await?;
    if replace_items {
        updated.total_price = store::shopcarts::recalculate_total(&state.orm, id).await?;
    }
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/shopcarts/{id}",
    params(
        ("id" = i32, Path, description = "Shopcart ID")
    ),
    responses(
        (status = 204, description = "Shopcart deleted (or was already gone)")
    ),
    tag = "Shopcarts"
)]
pub async fn delete_shopcart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    // Deleting an absent cart is a no-op, never an error.
    if store::shopcarts::find_by_id(&state.orm, id).await?.is_some() {
        store::shopcarts::delete(&state.orm, id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/shopcarts/{id}/checkout",
    params(
        ("id" = i32, Path, description = "Shopcart ID")
    ),
    responses(
        (status = 200, description = "Recomputed cart total", body = CheckoutSummary),
        (status = 404, description = "Shopcart not found", body = ErrorBody),
    ),
    tag = "Shopcarts"
)]
pub async fn checkout_shopcart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CheckoutSummary>> {
    if store::shopcarts::find_by_id(&state.orm, id).await?.is_none() {
        return Err(AppError::shopcart_not_found(id));
    }
    let total_price = store::shopcarts::recalculate_total(&state.orm, id).await?;
    Ok(Json(CheckoutSummary { id, total_price }))
}
