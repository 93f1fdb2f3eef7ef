use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::ShopcartItem;

/// Equality filters shared by the cart list and the per-cart item list.
/// When both are given they are ANDed.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ItemFilters {
    pub product_id: Option<i32>,
    pub name: Option<String>,
}

impl ItemFilters {
    pub fn is_empty(&self) -> bool {
        self.product_id.is_none() && self.name.is_none()
    }

    pub fn matches(&self, item: &ShopcartItem) -> bool {
        self.product_id.is_none_or(|product_id| item.product_id == product_id)
            && self
                .name
                .as_deref()
                .is_none_or(|name| item.name == name)
    }
}
