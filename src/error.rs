use chrono::NaiveDate;
use thiserror::Error;

use crate::models::Dimension;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("schema error in {migration}: {source}")]
    Schema {
        migration: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// A fact row names a natural key the dimension mapping does not contain.
    #[error("order {order_id} references unknown {dimension} key '{natural_key}'")]
    KeyResolution {
        dimension: Dimension,
        natural_key: String,
        order_id: String,
    },

    #[error("invalid master data: {0}")]
    InvalidMasterData(String),

    #[error("invalid generator settings: {0}")]
    InvalidSettings(String),

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("query '{query}' failed: {source}")]
    Query {
        query: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error: {0}")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type WarehouseResult<T> = Result<T, WarehouseError>;
