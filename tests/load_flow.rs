use ecommerce_warehouse::{
    error::WarehouseError,
    models::Dimension,
    services::{
        calendar::{date_row, enumerate_dates},
        generator::{GeneratorSettings, generate_orders},
        loader::{load_dimensions, load_warehouse, read_key_map},
    },
};

mod common;
use common::{count, memory_warehouse, tiny_master, ymd};

// Integration flow: generate -> load -> every fact row joins all four dimensions.
#[tokio::test]
async fn loaded_facts_reference_existing_dimensions() -> anyhow::Result<()> {
    let warehouse = memory_warehouse().await?;
    let master = tiny_master();
    let calendar = enumerate_dates(ymd(2023, 3, 1), ymd(2023, 3, 10))?;
    let lines = generate_orders(&master, &calendar, &GeneratorSettings::new(100, 7))?;

    let report = load_warehouse(&warehouse, &master, &calendar, &lines).await?;

    let facts = report.table("fact_orders").expect("fact table reported");
    assert_eq!(facts.inserted, lines.len() as u64);
    assert_eq!(report.table("dim_customer").unwrap().total, 3);
    assert_eq!(report.table("dim_product").unwrap().total, 3);
    assert_eq!(report.table("dim_location").unwrap().total, 2);
    assert_eq!(report.table("dim_date").unwrap().total, 10);

    let orphans: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM fact_orders f
        LEFT JOIN dim_customer c ON f.customer_key = c.customer_key
        LEFT JOIN dim_product p ON f.product_key = p.product_key
        LEFT JOIN dim_date d ON f.date_key = d.date_key
        LEFT JOIN dim_location l ON f.location_key = l.location_key
        WHERE c.customer_key IS NULL
           OR p.product_key IS NULL
           OR d.date_key IS NULL
           OR l.location_key IS NULL
        "#,
    )
    .fetch_one(&warehouse.pool)
    .await?;
    assert_eq!(orphans, 0);
    assert_eq!(count(&warehouse, "fact_orders").await?, lines.len() as i64);

    // natural keys survive the trip through surrogate keys
    let first = &lines[0];
    let (customer_id, product_id, postal_code): (String, String, String) = sqlx::query_as(
        r#"
        SELECT c.customer_id, p.product_id, l.postal_code
        FROM fact_orders f
        JOIN dim_customer c ON f.customer_key = c.customer_key
        JOIN dim_product p ON f.product_key = p.product_key
        JOIN dim_location l ON f.location_key = l.location_key
        ORDER BY f.order_line_id
        LIMIT 1
        "#,
    )
    .fetch_one(&warehouse.pool)
    .await?;
    assert_eq!(customer_id, first.customer_id);
    assert_eq!(product_id, first.product_id);
    assert_eq!(postal_code, first.postal_code);

    warehouse.close().await;
    Ok(())
}

#[tokio::test]
async fn dimension_load_is_idempotent() -> anyhow::Result<()> {
    let warehouse = memory_warehouse().await?;
    let master = tiny_master();
    let dates: Vec<_> = enumerate_dates(ymd(2023, 1, 1), ymd(2023, 1, 31))?
        .into_iter()
        .map(date_row)
        .collect();

    let first = load_dimensions(&warehouse.orm, &master, &dates).await?;
    let second = load_dimensions(&warehouse.orm, &master, &dates).await?;

    assert!(first.tables.iter().all(|t| t.inserted == t.total));
    assert!(second.tables.iter().all(|t| t.inserted == 0));
    assert_eq!(count(&warehouse, "dim_customer").await?, 3);
    assert_eq!(count(&warehouse, "dim_product").await?, 3);
    assert_eq!(count(&warehouse, "dim_location").await?, 2);
    assert_eq!(count(&warehouse, "dim_date").await?, 31);

    // surrogate keys are stable across re-insertion
    assert_eq!(first.keys.customers, second.keys.customers);
    assert_eq!(first.keys.products, second.keys.products);
    assert_eq!(first.keys.locations, second.keys.locations);
    Ok(())
}

#[tokio::test]
async fn reloading_appends_facts_without_duplicating_dimensions() -> anyhow::Result<()> {
    let warehouse = memory_warehouse().await?;
    let master = tiny_master();
    let calendar = enumerate_dates(ymd(2023, 3, 1), ymd(2023, 3, 10))?;
    let first = generate_orders(&master, &calendar, &GeneratorSettings::new(20, 1))?;
    let second = generate_orders(&master, &calendar, &GeneratorSettings::new(30, 2))?;

    let a = load_warehouse(&warehouse, &master, &calendar, &first).await?;
    let b = load_warehouse(&warehouse, &master, &calendar, &second).await?;

    assert_ne!(a.batch_id, b.batch_id);
    assert_eq!(b.table("dim_customer").unwrap().inserted, 0);
    assert_eq!(b.table("dim_date").unwrap().inserted, 0);
    assert_eq!(
        b.table("fact_orders").unwrap().total,
        (first.len() + second.len()) as u64
    );
    assert_eq!(count(&warehouse, "dim_customer").await?, 3);
    Ok(())
}

#[tokio::test]
async fn unknown_natural_key_rolls_back_the_whole_load() -> anyhow::Result<()> {
    let warehouse = memory_warehouse().await?;
    let master = tiny_master();
    let calendar = enumerate_dates(ymd(2023, 3, 1), ymd(2023, 3, 10))?;
    let mut lines = generate_orders(&master, &calendar, &GeneratorSettings::new(40, 9))?;
    let last = lines.last_mut().expect("at least one line");
    last.customer_id = "GHOST".into();
    let order_id = last.order_id.clone();

    let err = load_warehouse(&warehouse, &master, &calendar, &lines)
        .await
        .unwrap_err();
    match err {
        WarehouseError::KeyResolution {
            dimension,
            natural_key,
            order_id: failed_order,
        } => {
            assert_eq!(dimension, Dimension::Customer);
            assert_eq!(natural_key, "GHOST");
            assert_eq!(failed_order, order_id);
        }
        other => panic!("expected key resolution failure, got {other}"),
    }

    for table in ["dim_customer", "dim_product", "dim_location", "dim_date", "fact_orders"] {
        assert_eq!(count(&warehouse, table).await?, 0, "{table} not rolled back");
    }
    Ok(())
}

#[tokio::test]
async fn order_date_outside_calendar_fails_resolution() -> anyhow::Result<()> {
    let warehouse = memory_warehouse().await?;
    let master = tiny_master();
    let calendar = enumerate_dates(ymd(2023, 3, 1), ymd(2023, 3, 10))?;
    let mut lines = generate_orders(&master, &calendar, &GeneratorSettings::new(5, 3))?;
    lines[0].order_date = ymd(2030, 1, 1);

    let err = load_warehouse(&warehouse, &master, &calendar, &lines)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WarehouseError::KeyResolution { dimension: Dimension::Date, ref natural_key, .. }
            if natural_key == "2030-01-01"
    ));
    Ok(())
}

#[tokio::test]
async fn engine_rejects_dangling_foreign_keys() -> anyhow::Result<()> {
    let warehouse = memory_warehouse().await?;
    let result = sqlx::query(
        r#"
        INSERT INTO fact_orders
            (order_id, customer_key, product_key, date_key, location_key,
             quantity, unit_price, discount_pct, gross_revenue, net_revenue, profit, is_returned)
        VALUES ('ORD000001', 999, 999, '2023-01-01', 999, 1, 10.0, 0.0, 10.0, 10.0, 2.0, 0)
        "#,
    )
    .execute(&warehouse.pool)
    .await;
    assert!(result.is_err(), "foreign keys are not enforced");
    Ok(())
}

#[tokio::test]
async fn key_map_reflects_engine_assigned_keys() -> anyhow::Result<()> {
    let warehouse = memory_warehouse().await?;
    let master = tiny_master();
    let dates = vec![date_row(ymd(2023, 1, 1))];
    load_dimensions(&warehouse.orm, &master, &dates).await?;

    let keys = read_key_map(&warehouse.orm).await?;
    let mut customer_keys: Vec<i64> = keys.customers.values().copied().collect();
    customer_keys.sort_unstable();
    customer_keys.dedup();
    assert_eq!(customer_keys.len(), 3);
    assert!(keys.dates.contains("2023-01-01"));
    assert!(keys.locations.contains_key("411001"));
    Ok(())
}
