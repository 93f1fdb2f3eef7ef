use shopcart_api::{config::AppConfig, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = db::connect(&config.database_url).await?;
    db::run_migrations(&orm).await?;
    println!("Migrations applied");
    Ok(())
}
