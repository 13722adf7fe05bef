use ecommerce_warehouse::{
    config::AppConfig, db::AccessMode, pipeline, state::Warehouse, telemetry::init_tracing,
};

/// Setup, load and analyze in one run over a single store handle.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;

    let warehouse = Warehouse::open(&config.database_url, AccessMode::ReadWrite).await?;
    let result = run(&warehouse, &config).await;
    warehouse.close().await;
    result
}

async fn run(warehouse: &Warehouse, config: &AppConfig) -> anyhow::Result<()> {
    pipeline::setup(warehouse).await?;

    let load = pipeline::load(warehouse, config).await?;
    tracing::info!(batch_id = %load.batch_id, "batch committed");

    for report in pipeline::analyze(warehouse).await? {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
