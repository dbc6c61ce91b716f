use store_api::{config::AppConfig, db::create_pool, services::seed_service};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let resp = seed_service::create_sample_data(&pool).await?;
    println!("{}", resp.message);
    Ok(())
}
