//! The three batch phases, in the order a warehouse must go through them:
//! schema setup, data load, analytics.

use crate::{
    config::AppConfig,
    db::run_migrations,
    error::WarehouseResult,
    master_data::MasterData,
    report::Report,
    services::{
        analytics::run_all_reports,
        calendar::enumerate_dates,
        generator::{GeneratorSettings, generate_orders},
        loader::{LoadReport, load_warehouse},
    },
    state::Warehouse,
};

/// Create the star schema if it is not there yet. Safe to re-run.
pub async fn setup(state: &Warehouse) -> WarehouseResult<()> {
    let statements = run_migrations(&state.orm).await?;
    tracing::info!(
        statements,
        tables = "fact_orders, dim_customer, dim_product, dim_date, dim_location",
        "star schema ready"
    );
    Ok(())
}

/// Master data from `WAREHOUSE_MASTER_DATA` when configured, the built-in
/// lists otherwise.
pub fn master_data(config: &AppConfig) -> WarehouseResult<MasterData> {
    match &config.master_data_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading master data file");
            MasterData::from_json_file(path)
        }
        None => Ok(MasterData::default()),
    }
}

/// Generate one batch of orders and load it with its dimensions.
pub async fn load(state: &Warehouse, config: &AppConfig) -> WarehouseResult<LoadReport> {
    let master = master_data(config)?;
    let calendar = enumerate_dates(config.start_date, config.end_date)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        orders = config.num_orders,
        start = %config.start_date,
        end = %config.end_date,
        "generating orders"
    );

    let settings = GeneratorSettings::new(config.num_orders, seed);
    let lines = generate_orders(&master, &calendar, &settings)?;
    load_warehouse(state, &master, &calendar, &lines).await
}

pub async fn analyze(state: &Warehouse) -> WarehouseResult<Vec<Report<serde_json::Value>>> {
    run_all_reports(state).await
}
