use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four dimensions a fact row points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Customer,
    Product,
    Date,
    Location,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Customer => "customer",
            Dimension::Product => "product",
            Dimension::Date => "date",
            Dimension::Location => "location",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45+")]
    Over45,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::From18To24 => "18-24",
            AgeGroup::From25To34 => "25-34",
            AgeGroup::From35To44 => "35-44",
            AgeGroup::Over45 => "45+",
        }
    }
}

/// Ordered: `Bronze < Silver < Gold < Platinum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "Bronze",
            LoyaltyTier::Silver => "Silver",
            LoyaltyTier::Gold => "Gold",
            LoyaltyTier::Platinum => "Platinum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSeed {
    pub customer_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub age_group: AgeGroup,
    pub gender: String,
    pub loyalty_tier: LoyaltyTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub sub_category: String,
    pub brand: String,
    pub unit_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSeed {
    pub city: String,
    pub state: String,
    pub region: Region,
    pub postal_code: String,
}

/// One `dim_date` row with every derived calendar attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRow {
    pub date_key: String,
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub month_name: String,
    pub week_of_year: u32,
    pub day_of_month: u32,
    pub day_name: String,
    pub is_weekend: bool,
}

/// A generated order line still carrying natural keys; the loader swaps
/// them for surrogate keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    pub order_date: NaiveDate,
    pub postal_code: String,
    pub quantity: i32,
    pub unit_cost: f64,
    pub unit_price: f64,
    pub discount_pct: f64,
    pub gross_revenue: f64,
    pub net_revenue: f64,
    pub profit: f64,
    pub is_returned: bool,
}
