//! Persistence operations for shopcart line items.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    entity::{ShopcartItems, shopcart_items},
    error::AppResult,
    models::ShopcartItem,
    validation::ValidationError,
};

use super::storage_error;

pub(crate) fn from_row(row: shopcart_items::Model) -> ShopcartItem {
    ShopcartItem {
        id: Some(row.id),
        shopcart_id: row.shopcart_id,
        product_id: row.product_id,
        name: row.name,
        quantity: row.quantity,
        price: row.price,
    }
}

/// Inserts a new line item under its `shopcart_id`.
pub async fn create<C: ConnectionTrait>(db: &C, item: &ShopcartItem) -> AppResult<ShopcartItem> {
    let row = shopcart_items::ActiveModel {
        id: NotSet,
        shopcart_id: Set(item.shopcart_id),
        product_id: Set(item.product_id),
        name: Set(item.name.clone()),
        quantity: Set(item.quantity),
        price: Set(item.price),
    }
    .insert(db)
    .await
    .map_err(storage_error)?;
    tracing::debug!(item_id = row.id, shopcart_id = row.shopcart_id, "created item");
    Ok(from_row(row))
}

/// Replaces all fields of an existing item; fails when `id` is unset.
pub async fn update<C: ConnectionTrait>(db: &C, item: &ShopcartItem) -> AppResult<ShopcartItem> {
    let Some(id) = item.id else {
        return Err(ValidationError::MissingField("id").into());
    };
    let row = shopcart_items::ActiveModel {
        id: Unchanged(id),
        shopcart_id: Set(item.shopcart_id),
        product_id: Set(item.product_id),
        name: Set(item.name.clone()),
        quantity: Set(item.quantity),
        price: Set(item.price),
    }
    .update(db)
    .await
    .map_err(storage_error)?;
    Ok(from_row(row))
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    ShopcartItems::delete_by_id(id)
        .exec(db)
        .await
        .map_err(storage_error)?;
    Ok(())
}

pub async fn delete_by_shopcart<C: ConnectionTrait>(db: &C, shopcart_id: i32) -> AppResult<()> {
    let result = ShopcartItems::delete_many()
        .filter(shopcart_items::Column::ShopcartId.eq(shopcart_id))
        .exec(db)
        .await
        .map_err(storage_error)?;
    tracing::debug!(shopcart_id, deleted = result.rows_affected, "cleared items");
    Ok(())
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<ShopcartItem>> {
    Ok(ShopcartItems::find_by_id(id).one(db).await?.map(from_row))
}

/// All items belonging to a cart, in insertion order.
pub async fn find_all_by_shopcart<C: ConnectionTrait>(
    db: &C,
    shopcart_id: i32,
) -> AppResult<Vec<ShopcartItem>> {
    let rows = ShopcartItems::find()
        .filter(shopcart_items::Column::ShopcartId.eq(shopcart_id))
        .order_by_asc(shopcart_items::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(from_row).collect())
}

/// The unique line for a product within a cart, if any. This is the
/// lookup behind the merge-on-add rule.
pub async fn find_by_product_and_shopcart<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
    shopcart_id: i32,
) -> AppResult<Option<ShopcartItem>> {
    let row = ShopcartItems::find()
        .filter(shopcart_items::Column::ProductId.eq(product_id))
        .filter(shopcart_items::Column::ShopcartId.eq(shopcart_id))
        .one(db)
        .await?;
    Ok(row.map(from_row))
}

// The three finders below return only the first matching row (lowest id),
// matching the long-observed behavior of this service.

pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<Option<ShopcartItem>> {
    let row = ShopcartItems::find()
        .filter(shopcart_items::Column::Name.eq(name))
        .order_by_asc(shopcart_items::Column::Id)
        .one(db)
        .await?;
    Ok(row.map(from_row))
}

pub async fn find_by_product_id<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
) -> AppResult<Option<ShopcartItem>> {
    let row = ShopcartItems::find()
        .filter(shopcart_items::Column::ProductId.eq(product_id))
        .order_by_asc(shopcart_items::Column::Id)
        .one(db)
        .await?;
    Ok(row.map(from_row))
}

pub async fn find_by_shopcart_id<C: ConnectionTrait>(
    db: &C,
    shopcart_id: i32,
) -> AppResult<Option<ShopcartItem>> {
    let row = ShopcartItems::find()
        .filter(shopcart_items::Column::ShopcartId.eq(shopcart_id))
        .order_by_asc(shopcart_items::Column::Id)
        .one(db)
        .await?;
    Ok(row.map(from_row))
}
