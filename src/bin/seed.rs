use rust_decimal::Decimal;

use shopcart_api::{
    config::AppConfig,
    db,
    models::{Shopcart, ShopcartItem},
    store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = db::connect(&config.database_url).await?;
    db::run_migrations(&orm).await?;

    let cart = store::shopcarts::create(
        &orm,
        &Shopcart {
            id: None,
            total_price: Decimal::ZERO,
            items: Vec::new(),
        },
    )
    .await?;
    let Some(shopcart_id) = cart.id else {
        anyhow::bail!("seed cart came back without an id");
    };

    for (product_id, name, quantity, price) in [
        (101, "Axum Hoodie", 1, Decimal::new(5500, 2)),
        (102, "Ferris Mug", 2, Decimal::new(1250, 2)),
        (103, "Rust Sticker Pack", 5, Decimal::new(399, 2)),
    ] {
        store::items::create(
            &orm,
            &ShopcartItem {
                id: None,
                shopcart_id,
                product_id,
                name: name.to_string(),
                quantity,
                price,
            },
        )
        .await?;
    }
    let total = store::shopcarts::recalculate_total(&orm, shopcart_id).await?;

    println!("Seed completed. Shopcart ID: {shopcart_id}, total: {total}");
    Ok(())
}
