//! Persistence operations for shopcarts, including the derived-total
//! recalculation every item mutation runs through.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait, Condition,
    ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{
    entity::{ShopcartItems, Shopcarts, shopcart_items, shopcarts},
    error::AppResult,
    models::{Shopcart, ShopcartItem},
    validation::ValidationError,
};

use super::storage_error;

fn assemble(row: shopcarts::Model, items: Vec<ShopcartItem>) -> Shopcart {
    Shopcart {
        id: Some(row.id),
        total_price: row.total_price,
        items,
    }
}

/// Persists a new cart and its initial items in one transaction. The
/// payload's per-item `shopcart_id` is replaced with the assigned cart id.
pub async fn create<C>(db: &C, cart: &Shopcart) -> AppResult<Shopcart>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await.map_err(storage_error)?;

    let row = shopcarts::ActiveModel {
        id: NotSet,
        total_price: Set(cart.total_price),
    }
    .insert(&txn)
    .await
    .map_err(storage_error)?;

    let mut items = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        let mut owned = item.clone();
        owned.shopcart_id = row.id;
        items.push(super::items::create(&txn, &owned).await?);
    }

    txn.commit().await.map_err(storage_error)?;
    tracing::info!(shopcart_id = row.id, items = items.len(), "created shopcart");
    Ok(assemble(row, items))
}

/// Persists changes to an existing cart; fails when `id` is unset. With
/// `replace_items` the cart's item rows are dropped and rebuilt from
/// `cart.items`; otherwise the stored items are left untouched.
pub async fn update<C>(db: &C, cart: &Shopcart, replace_items: bool) -> AppResult<Shopcart>
where
    C: ConnectionTrait + TransactionTrait,
{
    let Some(id) = cart.id else {
        return Err(ValidationError::MissingField("id").into());
    };

    let txn = db.begin().await.map_err(storage_error)?;

    let row = shopcarts::ActiveModel {
        id: Unchanged(id),
        total_price: Set(cart.total_price),
    }
    .update(&txn)
    .await
    .map_err(storage_error)?;

    let items = if replace_items {
        super::items::delete_by_shopcart(&txn, id).await?;
        let mut items = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            let mut owned = item.clone();
            owned.shopcart_id = id;
            items.push(super::items::create(&txn, &owned).await?);
        }
        items
    } else {
        super::items::find_all_by_shopcart(&txn, id).await?
    };

    txn.commit().await.map_err(storage_error)?;
    Ok(assemble(row, items))
}

/// Removes the cart; the `ON DELETE CASCADE` foreign key takes its items
/// with it.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let result = Shopcarts::delete_by_id(id)
        .exec(db)
        .await
        .map_err(storage_error)?;
    tracing::info!(shopcart_id = id, deleted = result.rows_affected, "deleted shopcart");
    Ok(())
}

/// Recomputes the cart's total from its current items, persists it, and
/// returns the new value. Every item-mutating endpoint calls this before
/// responding.
pub async fn recalculate_total<C: ConnectionTrait>(db: &C, shopcart_id: i32) -> AppResult<Decimal> {
    let items = super::items::find_all_by_shopcart(db, shopcart_id).await?;
    let total = Shopcart::total_from_items(&items);

    shopcarts::ActiveModel {
        id: Unchanged(shopcart_id),
        total_price: Set(total),
    }
    .update(db)
    .await
    .map_err(storage_error)?;

    tracing::debug!(shopcart_id, %total, "recalculated total");
    Ok(total)
}

pub async fn find_all<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Shopcart>> {
    let rows = Shopcarts::find()
        .order_by_asc(shopcarts::Column::Id)
        .all(db)
        .await?;

    let mut carts = Vec::with_capacity(rows.len());
    for row in rows {
        let items = super::items::find_all_by_shopcart(db, row.id).await?;
        carts.push(assemble(row, items));
    }
    Ok(carts)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Shopcart>> {
    let Some(row) = Shopcarts::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let items = super::items::find_all_by_shopcart(db, row.id).await?;
    Ok(Some(assemble(row, items)))
}

/// The distinct carts owning at least one item matching every given
/// predicate, ordered by first matching item. Each cart appears once.
pub async fn find_by_item_filters<C: ConnectionTrait>(
    db: &C,
    product_id: Option<i32>,
    name: Option<&str>,
) -> AppResult<Vec<Shopcart>> {
    let mut condition = Condition::all();
    if let Some(product_id) = product_id {
        condition = condition.add(shopcart_items::Column::ProductId.eq(product_id));
    }
    if let Some(name) = name {
        condition = condition.add(shopcart_items::Column::Name.eq(name));
    }

    let matches = ShopcartItems::find()
        .filter(condition)
        .order_by_asc(shopcart_items::Column::Id)
        .all(db)
        .await?;

    let mut shopcart_ids: Vec<i32> = Vec::new();
    for item in &matches {
        if !shopcart_ids.contains(&item.shopcart_id) {
            shopcart_ids.push(item.shopcart_id);
        }
    }

    let mut carts = Vec::with_capacity(shopcart_ids.len());
    for id in shopcart_ids {
        if let Some(cart) = find_by_id(db, id).await? {
            carts.push(cart);
        }
    }
    Ok(carts)
}

pub async fn find_by_item_product_id<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
) -> AppResult<Vec<Shopcart>> {
    find_by_item_filters(db, Some(product_id), None).await
}

pub async fn find_by_item_name<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<Vec<Shopcart>> {
    find_by_item_filters(db, None, Some(name)).await
}
