#![allow(dead_code)]

use chrono::NaiveDate;
use ecommerce_warehouse::{
    db::AccessMode,
    master_data::MasterData,
    models::{AgeGroup, CustomerSeed, LocationSeed, LoyaltyTier, ProductSeed, Region},
    pipeline,
    state::Warehouse,
};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// In-memory warehouse with the star schema applied.
pub async fn memory_warehouse() -> anyhow::Result<Warehouse> {
    let warehouse = Warehouse::open("sqlite::memory:", AccessMode::ReadWrite).await?;
    pipeline::setup(&warehouse).await?;
    Ok(warehouse)
}

/// Three customers, three products in three categories, two locations.
pub fn tiny_master() -> MasterData {
    let customer = |id: &str, name: &str, tier| CustomerSeed {
        customer_id: id.into(),
        full_name: name.into(),
        email: Some(format!("{}@example.com", id.to_lowercase())),
        age_group: AgeGroup::From25To34,
        gender: "F".into(),
        loyalty_tier: tier,
    };
    let product = |id: &str, name: &str, category: &str, unit_cost| ProductSeed {
        product_id: id.into(),
        product_name: name.into(),
        category: category.into(),
        sub_category: "General".into(),
        brand: "Acme".into(),
        unit_cost,
    };

    MasterData {
        customers: vec![
            customer("C1", "Ada Lovelace", LoyaltyTier::Gold),
            customer("C2", "Grace Hopper", LoyaltyTier::Bronze),
            customer("C3", "Edsger Dijkstra", LoyaltyTier::Platinum),
        ],
        products: vec![
            product("P1", "Monitor", "Electronics", 100.0),
            product("P2", "Desk", "Furniture", 250.0),
            product("P3", "Notebook", "Stationery", 5.5),
        ],
        locations: vec![
            LocationSeed {
                city: "Pune".into(),
                state: "Maharashtra".into(),
                region: Region::West,
                postal_code: "411001".into(),
            },
            LocationSeed {
                city: "Delhi".into(),
                state: "Delhi".into(),
                region: Region::North,
                postal_code: "110001".into(),
            },
        ],
    }
}

pub async fn count(warehouse: &Warehouse, table: &str) -> anyhow::Result<i64> {
    let n = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&warehouse.pool)
        .await?;
    Ok(n)
}
