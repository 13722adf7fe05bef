use serde::Serialize;
use sqlx::FromRow;

use crate::{
    db::DbPool,
    error::{WarehouseError, WarehouseResult},
    report::Report,
    state::Warehouse,
};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CategoryRevenue {
    pub category: String,
    pub total_orders: i64,
    pub units_sold: i64,
    pub net_revenue: f64,
    pub total_profit: f64,
    pub avg_discount_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MonthlyRevenue {
    pub year: i64,
    pub month: i64,
    pub month_name: String,
    pub net_revenue: f64,
    pub orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ProductRanking {
    pub product_name: String,
    pub category: String,
    pub net_revenue: f64,
    pub overall_rank: i64,
    pub rank_in_category: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CumulativeRevenue {
    pub year: i64,
    pub month: i64,
    pub month_name: String,
    pub monthly_revenue: f64,
    pub cumulative_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RegionTierRevenue {
    pub region: String,
    pub loyalty_tier: Option<String>,
    pub orders: i64,
    pub net_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ReturnRate {
    pub product_name: String,
    pub total_lines: i64,
    pub returned: i64,
    pub return_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MonthOverMonth {
    pub year: i64,
    pub month: i64,
    pub month_name: String,
    pub revenue: f64,
    /// `None` for the first month.
    pub prev_month_rev: Option<f64>,
    pub change: Option<f64>,
}

/// Unrounded grand totals over every fact row.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WarehouseTotals {
    pub fact_rows: i64,
    pub orders: i64,
    pub net_revenue: f64,
    pub profit: f64,
}

const REVENUE_BY_CATEGORY: &str = r#"
    SELECT
        p.category,
        COUNT(DISTINCT f.order_id)          AS total_orders,
        SUM(f.quantity)                     AS units_sold,
        ROUND(SUM(f.net_revenue), 2)        AS net_revenue,
        ROUND(SUM(f.profit), 2)             AS total_profit,
        ROUND(AVG(f.discount_pct) * 100, 1) AS avg_discount_pct
    FROM fact_orders f
    JOIN dim_product p ON f.product_key = p.product_key
    GROUP BY p.category
    ORDER BY net_revenue DESC
"#;

const MONTHLY_REVENUE_TREND: &str = r#"
    SELECT
        d.year,
        d.month,
        d.month_name,
        ROUND(SUM(f.net_revenue), 2) AS net_revenue,
        COUNT(DISTINCT f.order_id)   AS orders
    FROM fact_orders f
    JOIN dim_date d ON f.date_key = d.date_key
    GROUP BY d.year, d.month, d.month_name
    ORDER BY d.year, d.month
"#;

const PRODUCT_REVENUE_RANKING: &str = r#"
    SELECT
        product_name,
        category,
        ROUND(net_revenue, 2) AS net_revenue,
        RANK() OVER (ORDER BY net_revenue DESC) AS overall_rank,
        RANK() OVER (PARTITION BY category ORDER BY net_revenue DESC) AS rank_in_category
    FROM (
        SELECT p.product_name, p.category, SUM(f.net_revenue) AS net_revenue
        FROM fact_orders f
        JOIN dim_product p ON f.product_key = p.product_key
        GROUP BY p.product_name, p.category
    )
    ORDER BY overall_rank, product_name
    LIMIT ?
"#;

const CUMULATIVE_MONTHLY_REVENUE: &str = r#"
    SELECT
        year,
        month,
        month_name,
        ROUND(monthly_revenue, 2) AS monthly_revenue,
        ROUND(SUM(monthly_revenue) OVER (ORDER BY year, month), 2) AS cumulative_revenue
    FROM (
        SELECT d.year, d.month, d.month_name, SUM(f.net_revenue) AS monthly_revenue
        FROM fact_orders f
        JOIN dim_date d ON f.date_key = d.date_key
        GROUP BY d.year, d.month, d.month_name
    )
    ORDER BY year, month
"#;

const REVENUE_BY_REGION_AND_TIER: &str = r#"
    SELECT
        l.region,
        c.loyalty_tier,
        COUNT(DISTINCT f.order_id)   AS orders,
        ROUND(SUM(f.net_revenue), 2) AS net_revenue
    FROM fact_orders f
    JOIN dim_location l ON f.location_key = l.location_key
    JOIN dim_customer c ON f.customer_key = c.customer_key
    GROUP BY l.region, c.loyalty_tier
    ORDER BY l.region, net_revenue DESC
"#;

const RETURN_RATE_BY_PRODUCT: &str = r#"
    SELECT
        p.product_name,
        COUNT(*)                                         AS total_lines,
        SUM(f.is_returned)                               AS returned,
        ROUND(SUM(f.is_returned) * 100.0 / COUNT(*), 1) AS return_rate_pct
    FROM fact_orders f
    JOIN dim_product p ON f.product_key = p.product_key
    GROUP BY p.product_name
    ORDER BY return_rate_pct DESC, p.product_name
    LIMIT ?
"#;

const MONTH_OVER_MONTH_CHANGE: &str = r#"
    SELECT
        year,
        month,
        month_name,
        ROUND(monthly_rev, 2) AS revenue,
        ROUND(LAG(monthly_rev) OVER (ORDER BY year, month), 2) AS prev_month_rev,
        ROUND(monthly_rev - LAG(monthly_rev) OVER (ORDER BY year, month), 2) AS change
    FROM (
        SELECT d.year, d.month, d.month_name, SUM(f.net_revenue) AS monthly_rev
        FROM fact_orders f
        JOIN dim_date d ON f.date_key = d.date_key
        GROUP BY d.year, d.month, d.month_name
    )
    ORDER BY year, month
"#;

const WAREHOUSE_TOTALS: &str = r#"
    SELECT
        COUNT(*)                         AS fact_rows,
        COUNT(DISTINCT order_id)         AS orders,
        COALESCE(SUM(net_revenue), 0.0)  AS net_revenue,
        COALESCE(SUM(profit), 0.0)       AS profit
    FROM fact_orders
"#;

pub async fn revenue_by_category(pool: &DbPool) -> WarehouseResult<Vec<CategoryRevenue>> {
    sqlx::query_as::<_, CategoryRevenue>(REVENUE_BY_CATEGORY)
        .fetch_all(pool)
        .await
        .map_err(query_error("revenue_by_category"))
}

pub async fn monthly_revenue_trend(pool: &DbPool) -> WarehouseResult<Vec<MonthlyRevenue>> {
    sqlx::query_as::<_, MonthlyRevenue>(MONTHLY_REVENUE_TREND)
        .fetch_all(pool)
        .await
        .map_err(query_error("monthly_revenue_trend"))
}

pub async fn product_revenue_ranking(
    pool: &DbPool,
    limit: i64,
) -> WarehouseResult<Vec<ProductRanking>> {
    sqlx::query_as::<_, ProductRanking>(PRODUCT_REVENUE_RANKING)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(query_error("product_revenue_ranking"))
}

pub async fn cumulative_monthly_revenue(
    pool: &DbPool,
) -> WarehouseResult<Vec<CumulativeRevenue>> {
    sqlx::query_as::<_, CumulativeRevenue>(CUMULATIVE_MONTHLY_REVENUE)
        .fetch_all(pool)
        .await
        .map_err(query_error("cumulative_monthly_revenue"))
}

pub async fn revenue_by_region_and_tier(
    pool: &DbPool,
) -> WarehouseResult<Vec<RegionTierRevenue>> {
    sqlx::query_as::<_, RegionTierRevenue>(REVENUE_BY_REGION_AND_TIER)
        .fetch_all(pool)
        .await
        .map_err(query_error("revenue_by_region_and_tier"))
}

pub async fn return_rate_by_product(
    pool: &DbPool,
    limit: i64,
) -> WarehouseResult<Vec<ReturnRate>> {
    sqlx::query_as::<_, ReturnRate>(RETURN_RATE_BY_PRODUCT)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(query_error("return_rate_by_product"))
}

pub async fn month_over_month_change(pool: &DbPool) -> WarehouseResult<Vec<MonthOverMonth>> {
    sqlx::query_as::<_, MonthOverMonth>(MONTH_OVER_MONTH_CHANGE)
        .fetch_all(pool)
        .await
        .map_err(query_error("month_over_month_change"))
}

pub async fn warehouse_totals(pool: &DbPool) -> WarehouseResult<WarehouseTotals> {
    sqlx::query_as::<_, WarehouseTotals>(WAREHOUSE_TOTALS)
        .fetch_one(pool)
        .await
        .map_err(query_error("warehouse_totals"))
}

/// Every report, in presentation order.
pub async fn run_all_reports(
    state: &Warehouse,
) -> WarehouseResult<Vec<Report<serde_json::Value>>> {
    let pool = &state.pool;
    let reports = vec![
        Report::new("Revenue and Profit by Category", revenue_by_category(pool).await?)
            .into_json()?,
        Report::new("Monthly Revenue Trend", monthly_revenue_trend(pool).await?).into_json()?,
        Report::new(
            "Product Revenue Ranking (Top 10)",
            product_revenue_ranking(pool, 10).await?,
        )
        .into_json()?,
        Report::new(
            "Cumulative Revenue by Month",
            cumulative_monthly_revenue(pool).await?,
        )
        .into_json()?,
        Report::new(
            "Revenue by Region and Loyalty Tier",
            revenue_by_region_and_tier(pool).await?,
        )
        .into_json()?,
        Report::new(
            "Return Rate by Product (Top 8)",
            return_rate_by_product(pool, 8).await?,
        )
        .into_json()?,
        Report::new(
            "Month-over-Month Revenue Change",
            month_over_month_change(pool).await?,
        )
        .into_json()?,
        Report::new("Warehouse Totals", vec![warehouse_totals(pool).await?]).into_json()?,
    ];

    tracing::debug!(reports = reports.len(), "analytics complete");
    Ok(reports)
}

fn query_error(query: &'static str) -> impl FnOnce(sqlx::Error) -> WarehouseError {
    move |source| WarehouseError::Query { query, source }
}
