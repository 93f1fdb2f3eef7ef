use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    error::ErrorBody,
    models::{Shopcart, ShopcartItem},
    routes::{health, items, params, shopcarts},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        shopcarts::list_shopcarts,
        shopcarts::create_shopcart,
        shopcarts::get_shopcart,
        shopcarts::update_shopcart,
        shopcarts::delete_shopcart,
        shopcarts::checkout_shopcart,
        items::list_items,
        items::add_item,
        items::get_item,
        items::update_item,
        items::delete_item,
        items::delete_all_items,
    ),
    components(
        schemas(
            Shopcart,
            ShopcartItem,
            ErrorBody,
            shopcarts::CheckoutSummary,
            params::ItemFilters,
            health::HealthData,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Shopcarts", description = "Shopcart resource endpoints"),
        (name = "Items", description = "Nested shopcart item endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
