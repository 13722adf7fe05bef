use crate::{
    db::{AccessMode, DbPool, OrmConn, create_orm_conn, create_pool},
    error::WarehouseResult,
};

/// The one store handle a run works through. `pool` serves raw `sqlx`
/// queries, `orm` wraps the same pool for entity work.
#[derive(Clone)]
pub struct Warehouse {
    pub pool: DbPool,
    pub orm: OrmConn,
}

impl Warehouse {
    pub async fn open(database_url: &str, mode: AccessMode) -> WarehouseResult<Self> {
        let pool = create_pool(database_url, mode).await?;
        let orm = create_orm_conn(pool.clone());
        tracing::debug!(database_url, ?mode, "warehouse opened");
        Ok(Self { pool, orm })
    }

    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("warehouse closed");
    }
}
