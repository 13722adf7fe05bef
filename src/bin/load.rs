use ecommerce_warehouse::{
    config::AppConfig, db::AccessMode, pipeline, state::Warehouse, telemetry::init_tracing,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;

    let warehouse = Warehouse::open(&config.database_url, AccessMode::ReadWrite).await?;
    let result = pipeline::load(&warehouse, &config).await;
    warehouse.close().await;
    let report = result?;

    for table in &report.tables {
        println!("  {:<13} {:>7} rows loaded", table.table, table.inserted);
    }
    println!("All data loaded into '{}'", config.database_url);
    Ok(())
}
