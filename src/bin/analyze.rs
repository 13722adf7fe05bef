use ecommerce_warehouse::{
    config::AppConfig, db::AccessMode, pipeline, state::Warehouse, telemetry::init_tracing,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;

    let warehouse = Warehouse::open(&config.database_url, AccessMode::ReadOnly).await?;
    let result = pipeline::analyze(&warehouse).await;
    warehouse.close().await;

    for report in result? {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
