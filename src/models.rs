use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::validation::{self, ValidationResult};

/// A shopping cart owning an ordered collection of line items.
///
/// `total_price` is derived state: it must equal the sum of
/// `price * quantity` over `items` after any item mutation. The store's
/// `recalculate_total` is the only place that recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Shopcart {
    /// Server-assigned; `None` until the cart is persisted.
    pub id: Option<i32>,
    pub total_price: Decimal,
    pub items: Vec<ShopcartItem>,
}

/// One product line within a cart. A cart holds at most one line per
/// `product_id`; adding the same product again merges quantities.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ShopcartItem {
    /// Server-assigned; `None` until the item is persisted.
    pub id: Option<i32>,
    pub shopcart_id: i32,
    pub product_id: i32,
    pub name: String,
    pub quantity: i32,
    /// Unit price at the time the product was added, not the catalog price.
    pub price: Decimal,
}

impl Shopcart {
    /// Populates a cart from an untyped JSON payload, classifying every
    /// failure. `items` is optional; each element is item-validated.
    pub fn deserialize(data: &Value) -> ValidationResult<Self> {
        let map = validation::as_object(data)?;
        let total_price = validation::required_money(map, "total_price")?;

        let mut items = Vec::new();
        if let Some(raw_items) = validation::optional_array(map, "items")? {
            for raw in raw_items {
                items.push(ShopcartItem::deserialize(raw)?);
            }
        }

        Ok(Self {
            id: None,
            total_price,
            items,
        })
    }

    /// Sum of `price * quantity` over the given items, rounded to two
    /// decimals. Pure; persisting the result is the store's job.
    pub fn total_from_items(items: &[ShopcartItem]) -> Decimal {
        let total: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        validation::round_money(total)
    }
}

impl ShopcartItem {
    pub fn deserialize(data: &Value) -> ValidationResult<Self> {
        let map = validation::as_object(data)?;
        Ok(Self {
            id: None,
            shopcart_id: validation::required_int(map, "shopcart_id")?,
            product_id: validation::required_int(map, "product_id")?,
            name: validation::required_name(map, "name")?,
            quantity: validation::required_quantity(map, "quantity")?,
            price: validation::required_money(map, "price")?,
        })
    }
}
