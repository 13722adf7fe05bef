use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QuerySelect, TransactionTrait,
    sea_query::OnConflict,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    entity::{
        DimCustomer, DimDate, DimLocation, DimProduct, FactOrders, dim_customer, dim_date,
        dim_location, dim_product, fact_orders,
    },
    error::{WarehouseError, WarehouseResult},
    master_data::MasterData,
    models::{DateRow, Dimension, OrderLine},
    services::calendar::{date_key, date_row},
    state::Warehouse,
};

/// Rows per multi-row INSERT, kept well under SQLite's bound-parameter limit.
const INSERT_BATCH_SIZE: usize = 500;

/// Natural key to engine-assigned surrogate key, per dimension.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    pub customers: HashMap<String, i64>,
    pub products: HashMap<String, i64>,
    pub locations: HashMap<String, i64>,
    /// Dates are keyed by their ISO string, so only membership matters.
    pub dates: HashSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKeys {
    pub customer_key: i64,
    pub product_key: i64,
    pub date_key: String,
    pub location_key: i64,
}

impl KeyMap {
    pub fn resolve(&self, line: &OrderLine) -> WarehouseResult<ResolvedKeys> {
        let missing = |dimension: Dimension, natural_key: &str| WarehouseError::KeyResolution {
            dimension,
            natural_key: natural_key.to_string(),
            order_id: line.order_id.clone(),
        };

        let customer_key = *self
            .customers
            .get(&line.customer_id)
            .ok_or_else(|| missing(Dimension::Customer, &line.customer_id))?;
        let product_key = *self
            .products
            .get(&line.product_id)
            .ok_or_else(|| missing(Dimension::Product, &line.product_id))?;
        let location_key = *self
            .locations
            .get(&line.postal_code)
            .ok_or_else(|| missing(Dimension::Location, &line.postal_code))?;
        let date_key = date_key(line.order_date);
        if !self.dates.contains(&date_key) {
            return Err(missing(Dimension::Date, &date_key));
        }

        Ok(ResolvedKeys {
            customer_key,
            product_key,
            date_key,
            location_key,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLoad {
    pub table: &'static str,
    pub inserted: u64,
    pub total: u64,
}

#[derive(Debug, Clone)]
pub struct DimensionLoad {
    pub keys: KeyMap,
    pub tables: Vec<TableLoad>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub batch_id: Uuid,
    pub tables: Vec<TableLoad>,
}

impl LoadReport {
    pub fn table(&self, name: &str) -> Option<&TableLoad> {
        self.tables.iter().find(|t| t.table == name)
    }
}

/// Insert-if-absent every dimension row, then read back the surrogate keys.
pub async fn load_dimensions<C: ConnectionTrait>(
    conn: &C,
    master: &MasterData,
    dates: &[DateRow],
) -> WarehouseResult<DimensionLoad> {
    let customers = master.customers.iter().map(|c| dim_customer::ActiveModel {
        customer_key: NotSet,
        customer_id: Set(c.customer_id.clone()),
        full_name: Set(c.full_name.clone()),
        email: Set(c.email.clone()),
        age_group: Set(Some(c.age_group.as_str().to_string())),
        gender: Set(Some(c.gender.clone())),
        loyalty_tier: Set(Some(c.loyalty_tier.as_str().to_string())),
    });
    let inserted_customers = insert_if_absent(
        conn,
        customers,
        OnConflict::column(dim_customer::Column::CustomerId)
            .do_nothing()
            .to_owned(),
    )
    .await?;

    let products = master.products.iter().map(|p| dim_product::ActiveModel {
        product_key: NotSet,
        product_id: Set(p.product_id.clone()),
        product_name: Set(p.product_name.clone()),
        category: Set(p.category.clone()),
        sub_category: Set(Some(p.sub_category.clone())),
        brand: Set(Some(p.brand.clone())),
        unit_cost: Set(p.unit_cost),
    });
    let inserted_products = insert_if_absent(
        conn,
        products,
        OnConflict::column(dim_product::Column::ProductId)
            .do_nothing()
            .to_owned(),
    )
    .await?;

    let locations = master.locations.iter().map(|l| dim_location::ActiveModel {
        location_key: NotSet,
        city: Set(l.city.clone()),
        state: Set(l.state.clone()),
        region: Set(l.region.as_str().to_string()),
        postal_code: Set(l.postal_code.clone()),
    });
    let inserted_locations = insert_if_absent(
        conn,
        locations,
        OnConflict::column(dim_location::Column::PostalCode)
            .do_nothing()
            .to_owned(),
    )
    .await?;

    let date_models = dates.iter().map(|d| dim_date::ActiveModel {
        date_key: Set(d.date_key.clone()),
        year: Set(d.year),
        quarter: Set(d.quarter as i32),
        month: Set(d.month as i32),
        month_name: Set(d.month_name.clone()),
        week_of_year: Set(d.week_of_year as i32),
        day_of_month: Set(d.day_of_month as i32),
        day_name: Set(d.day_name.clone()),
        is_weekend: Set(d.is_weekend),
    });
    let inserted_dates = insert_if_absent(
        conn,
        date_models,
        OnConflict::column(dim_date::Column::DateKey)
            .do_nothing()
            .to_owned(),
    )
    .await?;

    let keys = read_key_map(conn).await?;

    let tables = vec![
        TableLoad {
            table: "dim_customer",
            inserted: inserted_customers,
            total: keys.customers.len() as u64,
        },
        TableLoad {
            table: "dim_product",
            inserted: inserted_products,
            total: keys.products.len() as u64,
        },
        TableLoad {
            table: "dim_location",
            inserted: inserted_locations,
            total: keys.locations.len() as u64,
        },
        TableLoad {
            table: "dim_date",
            inserted: inserted_dates,
            total: keys.dates.len() as u64,
        },
    ];

    Ok(DimensionLoad { keys, tables })
}

/// Current natural-to-surrogate mapping of every dimension.
pub async fn read_key_map<C: ConnectionTrait>(conn: &C) -> WarehouseResult<KeyMap> {
    let customers: Vec<(String, i64)> = DimCustomer::find()
        .select_only()
        .column(dim_customer::Column::CustomerId)
        .column(dim_customer::Column::CustomerKey)
        .into_tuple()
        .all(conn)
        .await?;
    let products: Vec<(String, i64)> = DimProduct::find()
        .select_only()
        .column(dim_product::Column::ProductId)
        .column(dim_product::Column::ProductKey)
        .into_tuple()
        .all(conn)
        .await?;
    let locations: Vec<(String, i64)> = DimLocation::find()
        .select_only()
        .column(dim_location::Column::PostalCode)
        .column(dim_location::Column::LocationKey)
        .into_tuple()
        .all(conn)
        .await?;
    let dates: Vec<String> = DimDate::find()
        .select_only()
        .column(dim_date::Column::DateKey)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(KeyMap {
        customers: customers.into_iter().collect(),
        products: products.into_iter().collect(),
        locations: locations.into_iter().collect(),
        dates: dates.into_iter().collect(),
    })
}

/// Resolve every line against `keys` and bulk-insert the facts. Nothing is
/// written unless every line resolves.
pub async fn insert_facts<C: ConnectionTrait>(
    conn: &C,
    keys: &KeyMap,
    lines: &[OrderLine],
) -> WarehouseResult<u64> {
    let models = lines
        .iter()
        .map(|line| keys.resolve(line).map(|resolved| fact_model(line, resolved)))
        .collect::<WarehouseResult<Vec<_>>>()?;

    insert_batches(conn, models.into_iter(), None).await
}

/// Load master data, the calendar and the generated lines as one unit:
/// everything is committed together or rolled back together.
pub async fn load_warehouse(
    state: &Warehouse,
    master: &MasterData,
    calendar: &[NaiveDate],
    lines: &[OrderLine],
) -> WarehouseResult<LoadReport> {
    master.validate()?;
    let batch_id = Uuid::new_v4();
    let date_rows: Vec<DateRow> = calendar.iter().copied().map(date_row).collect();

    let txn = state.orm.begin().await?;
    let staged = async {
        let dimensions = load_dimensions(&txn, master, &date_rows).await?;
        let inserted_facts = insert_facts(&txn, &dimensions.keys, lines).await?;
        let total_facts = FactOrders::find().count(&txn).await?;

        let mut tables = dimensions.tables;
        tables.push(TableLoad {
            table: "fact_orders",
            inserted: inserted_facts,
            total: total_facts,
        });
        Ok::<_, WarehouseError>(tables)
    }
    .await;

    let tables = match staged {
        Ok(tables) => {
            txn.commit().await?;
            tables
        }
        Err(err) => {
            tracing::error!(%batch_id, error = %err, "load failed, rolling back");
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(%batch_id, error = %rollback_err, "rollback failed");
            }
            return Err(err);
        }
    };

    for t in &tables {
        tracing::info!(
            %batch_id,
            table = t.table,
            inserted = t.inserted,
            total = t.total,
            "table loaded"
        );
    }

    Ok(LoadReport { batch_id, tables })
}

fn fact_model(line: &OrderLine, keys: ResolvedKeys) -> fact_orders::ActiveModel {
    fact_orders::ActiveModel {
        order_line_id: NotSet,
        order_id: Set(line.order_id.clone()),
        customer_key: Set(keys.customer_key),
        product_key: Set(keys.product_key),
        date_key: Set(keys.date_key),
        location_key: Set(keys.location_key),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        discount_pct: Set(line.discount_pct),
        gross_revenue: Set(line.gross_revenue),
        net_revenue: Set(line.net_revenue),
        profit: Set(line.profit),
        is_returned: Set(line.is_returned),
    }
}

async fn insert_if_absent<C, A>(
    conn: &C,
    models: impl Iterator<Item = A>,
    conflict: OnConflict,
) -> WarehouseResult<u64>
where
    C: ConnectionTrait,
    A: ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    insert_batches(conn, models, Some(conflict)).await
}

async fn insert_batches<C, A>(
    conn: &C,
    models: impl Iterator<Item = A>,
    conflict: Option<OnConflict>,
) -> WarehouseResult<u64>
where
    C: ConnectionTrait,
    A: ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let mut models = models.peekable();
    let mut inserted = 0;

    while models.peek().is_some() {
        let batch: Vec<A> = models.by_ref().take(INSERT_BATCH_SIZE).collect();
        let mut insert = <A::Entity as EntityTrait>::insert_many(batch);
        if let Some(conflict) = &conflict {
            insert = insert.on_conflict(conflict.clone());
        }
        inserted += insert.exec_without_returning(conn).await?;
    }

    Ok(inserted)
}
