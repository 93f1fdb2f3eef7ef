use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode, header},
    routing::get,
};
use sea_orm::TransactionTrait;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult, ErrorBody},
    extract::AppJson,
    models::ShopcartItem,
    routes::params::ItemFilters,
    state::AppState,
    store::{self, storage_error},
    validation,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/items",
            get(list_items).post(add_item).delete(delete_all_items),
        )
        .route(
            "/{id}/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

#[utoipa::path(
    get,
    path = "/shopcarts/{id}/items",
    params(
        ("id" = i32, Path, description = "Shopcart ID"),
        ("product_id" = Option<i32>, Query, description = "Only items with this product id"),
        ("name" = Option<String>, Query, description = "Only items with this name")
    ),
    responses(
        (status = 200, description = "List the cart's items", body = Vec<ShopcartItem>),
        (status = 404, description = "Shopcart not found", body = ErrorBody),
    ),
    tag = "Items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Path(shopcart_id): Path<i32>,
    Query(filters): Query<ItemFilters>,
) -> AppResult<Json<Vec<ShopcartItem>>> {
    let cart = store::shopcarts::find_by_id(&state.orm, shopcart_id)
        .await?
        .ok_or_else(|| AppError::shopcart_not_found(shopcart_id))?;

    let items: Vec<ShopcartItem> = cart
        .items
        .into_iter()
        .filter(|item| filters.matches(item))
        .collect();
    tracing::info!(shopcart_id, count = items.len(), "returning items");
    Ok(Json(items))
}

/// Add a product to a cart. When the cart already holds a line for the
/// posted `product_id` the quantities merge onto that line; a second row
/// for the same product is never created. Either way the cart total is
/// recomputed before the response goes out.
#[utoipa::path(
    post,
    path = "/shopcarts/{id}/items",
    params(
        ("id" = i32, Path, description = "Shopcart ID")
    ),
    request_body = ShopcartItem,
    responses(
        (status = 201, description = "Item merged or created", body = ShopcartItem,
         headers(("Location" = String, description = "URL of the item resource"))),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "Shopcart not found", body = ErrorBody),
    ),
    tag = "Items"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Path(shopcart_id): Path<i32>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<ShopcartItem>)> {
    let txn = state.orm.begin().await.map_err(storage_error)?;

    if store::shopcarts::find_by_id(&txn, shopcart_id).await?.is_none() {
        return Err(AppError::shopcart_not_found(shopcart_id));
    }

    // The merge branch only needs these two; the new-item branch runs
    // full validation on the whole payload below.
    let body = validation::as_object(&payload)?;
    let product_id = validation::required_int(body, "product_id")?;
    let quantity = validation::required_quantity(body, "quantity")?;

    let existing =
        store::items::find_by_product_and_shopcart(&txn, product_id, shopcart_id).await?;
    let item = match existing {
        Some(mut line) => {
            line.quantity += quantity;
            tracing::info!(
                shopcart_id,
                product_id,
                quantity = line.quantity,
                "merged quantities onto existing line"
            );
            store::items::update(&txn, &line).await?
        }
        None => {
            let mut with_owner = payload.clone();
            if let Some(map) = with_owner.as_object_mut() {
                map.insert("shopcart_id".to_string(), Value::from(shopcart_id));
            }
            let item = ShopcartItem::deserialize(&with_owner)?;
            store::items::create(&txn, &item).await?
        }
    };

    store::shopcarts::recalculate_total(&txn, shopcart_id).await?;
    txn.commit().await.map_err(storage_error)?;

    let Some(item_id) = item.id else {
        return Err(AppError::Database(sea_orm::DbErr::Custom(
            "insert returned no id".to_string(),
        )));
    };
    let location = [(
        header::LOCATION,
        format!("/shopcarts/{shopcart_id}/items/{item_id}"),
    )];
    Ok((StatusCode::CREATED, location, Json(item)))
}

#[utoipa::path(
    get,
    path = "/shopcarts/{id}/items/{item_id}",
    params(
        ("id" = i32, Path, description = "Shopcart ID"),
        ("item_id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Get item", body = ShopcartItem),
        (status = 404, description = "Shopcart or item not found", body = ErrorBody),
    ),
    tag = "Items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path((shopcart_id, item_id)): Path<(i32, i32)>,
) -> AppResult<Json<ShopcartItem>> {
    if store::shopcarts::find_by_id(&state.orm, shopcart_id).await?.is_none() {
        return Err(AppError::shopcart_not_found(shopcart_id));
    }

    let item = store::items::find_by_id(&state.orm, item_id)
        .await?
        .filter(|item| item.shopcart_id == shopcart_id)
        .ok_or_else(|| AppError::item_not_found(item_id))?;
    Ok(Json(item))
}

#[utoipa::path(
    put,
    path = "/shopcarts/{id}/items/{item_id}",
    params(
        ("id" = i32, Path, description = "Shopcart ID"),
        ("item_id" = i32, Path, description = "Item ID")
    ),
    request_body = ShopcartItem,
    responses(
        (status = 200, description = "Updated item", body = ShopcartItem),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "Shopcart or item not found", body = ErrorBody),
    ),
    tag = "Items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path((shopcart_id, item_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Json<ShopcartItem>> {
    let txn = state.orm.begin().await.map_err(storage_error)?;

    if store::shopcarts::find_by_id(&txn, shopcart_id).await?.is_none() {
        return Err(AppError::shopcart_not_found(shopcart_id));
    }
    if store::items::find_by_id(&txn, item_id)
        .await?
        .filter(|item| item.shopcart_id == shopcart_id)
        .is_none()
    {
        return Err(AppError::item_not_found(item_id));
    }

    // Ownership is immutable: the path decides the cart, not the body.
    let mut with_owner = payload.clone();
    if let Some(map) = with_owner.as_object_mut() {
        map.insert("shopcart_id".to_string(), Value::from(shopcart_id));
    }
    let mut item = ShopcartItem::deserialize(&with_owner)?;
    item.id = Some(item_id);

    let updated = store::items::update(&txn, &item).await?;
    store::shopcarts::recalculate_total(&txn, shopcart_id).await?;
    txn.commit().await.map_err(storage_error)?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/shopcarts/{id}/items/{item_id}",
    params(
        ("id" = i32, Path, description = "Shopcart ID"),
        ("item_id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item deleted (or was already gone)"),
        (status = 404, description = "Shopcart not found", body = ErrorBody),
    ),
    tag = "Items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path((shopcart_id, item_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    let txn = state.orm.begin().await.map_err(storage_error)?;

    if store::shopcarts::find_by_id(&txn, shopcart_id).await?.is_none() {
        return Err(AppError::shopcart_not_found(shopcart_id));
    }

    // Deleting an absent item is a no-op; the total only moves when a
    // row actually went away.
    let existing = store::items::find_by_id(&txn, item_id)
        .await?
        .filter(|item| item.shopcart_id == shopcart_id);
    if existing.is_some() {
        store::items::delete(&txn, item_id).await?;
        store::shopcarts::recalculate_total(&txn, shopcart_id).await?;
    }
    txn.commit().await.map_err(storage_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/shopcarts/{id}/items",
    params(
        ("id" = i32, Path, description = "Shopcart ID")
    ),
    responses(
        (status = 204, description = "All items deleted, total reset to 0"),
        (status = 404, description = "Shopcart not found", body = ErrorBody),
    ),
    tag = "Items"
)]
pub async fn delete_all_items(
    State(state): State<AppState>,
    Path(shopcart_id): Path<i32>,
) -> AppResult<StatusCode> {
    let txn = state.orm.begin().await.map_err(storage_error)?;

    if store::shopcarts::find_by_id(&txn, shopcart_id).await?.is_none() {
        return Err(AppError::shopcart_not_found(shopcart_id));
    }

    store::items::delete_by_shopcart(&txn, shopcart_id).await?;
    store::shopcarts::recalculate_total(&txn, shopcart_id).await?;
    txn.commit().await.map_err(storage_error)?;

    Ok(StatusCode::NO_CONTENT)
}
