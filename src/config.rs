use std::{env, path::PathBuf};

use anyhow::Context;
use chrono::NaiveDate;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://ecommerce_warehouse.db";
pub const DEFAULT_NUM_ORDERS: usize = 20_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub num_orders: usize,
    /// `None` draws a fresh seed for the run.
    pub seed: Option<u64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub master_data_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let num_orders = match lookup("WAREHOUSE_NUM_ORDERS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("WAREHOUSE_NUM_ORDERS is not a count: {raw}"))?,
            None => DEFAULT_NUM_ORDERS,
        };
        let seed = lookup("WAREHOUSE_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("WAREHOUSE_SEED is not an unsigned integer: {raw}"))
            })
            .transpose()?;
        let start_date = parse_date(&lookup, "WAREHOUSE_START_DATE", (2023, 1, 1))?;
        let end_date = parse_date(&lookup, "WAREHOUSE_END_DATE", (2023, 12, 31))?;
        let master_data_path = lookup("WAREHOUSE_MASTER_DATA").map(PathBuf::from);

        Ok(Self {
            database_url,
            num_orders,
            seed,
            start_date,
            end_date,
            master_data_path,
        })
    }
}

fn parse_date(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: (i32, u32, u32),
) -> anyhow::Result<NaiveDate> {
    match lookup(key) {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("{key} is not a YYYY-MM-DD date: {raw}")),
        None => {
            let (y, m, d) = default;
            NaiveDate::from_ymd_opt(y, m, d).context("invalid built-in default date")
        }
    }
}
