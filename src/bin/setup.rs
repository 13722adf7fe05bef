use ecommerce_warehouse::{
    config::AppConfig, db::AccessMode, pipeline, state::Warehouse, telemetry::init_tracing,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;

    let warehouse = Warehouse::open(&config.database_url, AccessMode::ReadWrite).await?;
    let result = pipeline::setup(&warehouse).await;
    warehouse.close().await;
    result?;

    println!("Star schema created in '{}'", config.database_url);
    Ok(())
}
