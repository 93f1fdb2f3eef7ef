pub mod shopcart_items;
pub mod shopcarts;

pub use shopcart_items::Entity as ShopcartItems;
pub use shopcarts::Entity as Shopcarts;
