use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{WarehouseError, WarehouseResult},
    models::{AgeGroup, CustomerSeed, LocationSeed, LoyaltyTier, ProductSeed, Region},
};

/// Seed rows for the customer, product and location dimensions.
///
/// The generator picks from these lists and the loader inserts them, so tests
/// can pass a handful of rows instead of the built-in catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    pub customers: Vec<CustomerSeed>,
    pub products: Vec<ProductSeed>,
    pub locations: Vec<LocationSeed>,
}

impl MasterData {
    pub fn from_json_file(path: impl AsRef<Path>) -> WarehouseResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let data: MasterData = serde_json::from_str(&raw)?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> WarehouseResult<()> {
        if self.customers.is_empty() {
            return Err(WarehouseError::InvalidMasterData("no customers".into()));
        }
        if self.products.is_empty() {
            return Err(WarehouseError::InvalidMasterData("no products".into()));
        }
        if self.locations.is_empty() {
            return Err(WarehouseError::InvalidMasterData("no locations".into()));
        }

        ensure_unique("customer_id", self.customers.iter().map(|c| c.customer_id.as_str()))?;
        ensure_unique("product_id", self.products.iter().map(|p| p.product_id.as_str()))?;
        ensure_unique("postal_code", self.locations.iter().map(|l| l.postal_code.as_str()))?;

        if let Some(product) = self
            .products
            .iter()
            .find(|p| !(p.unit_cost.is_finite() && p.unit_cost > 0.0))
        {
            return Err(WarehouseError::InvalidMasterData(format!(
                "product {} has non-positive unit cost {}",
                product.product_id, product.unit_cost
            )));
        }

        Ok(())
    }
}

fn ensure_unique<'a>(field: &str, keys: impl Iterator<Item = &'a str>) -> WarehouseResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(WarehouseError::InvalidMasterData(format!(
                "duplicate {field} '{key}'"
            )));
        }
    }
    Ok(())
}

impl Default for MasterData {
    fn default() -> Self {
        use AgeGroup::*;
        use LoyaltyTier::*;
        use Region::*;

        let customers = vec![
            ("CUST001", "Aarav Shah", "aarav@email.com", From25To34, "M", Gold),
            ("CUST002", "Priya Mehta", "priya@email.com", From18To24, "F", Silver),
            ("CUST003", "Rohan Gupta", "rohan@email.com", From35To44, "M", Platinum),
            ("CUST004", "Sneha Reddy", "sneha@email.com", From25To34, "F", Bronze),
            ("CUST005", "Vikram Nair", "vikram@email.com", Over45, "M", Gold),
            ("CUST006", "Ananya Iyer", "ananya@email.com", From18To24, "F", Silver),
            ("CUST007", "Karthik Rao", "karthik@email.com", From35To44, "M", Bronze),
            ("CUST008", "Divya Sharma", "divya@email.com", From25To34, "F", Platinum),
            ("CUST009", "Arjun Patel", "arjun@email.com", Over45, "M", Gold),
            ("CUST010", "Meera Krishnan", "meera@email.com", From18To24, "F", Silver),
            ("CUST011", "Suresh Pillai", "suresh@email.com", From35To44, "M", Bronze),
            ("CUST012", "Lakshmi Bose", "lakshmi@email.com", From25To34, "F", Gold),
            ("CUST013", "Nikhil Joshi", "nikhil@email.com", From18To24, "M", Silver),
            ("CUST014", "Pooja Deshpande", "pooja@email.com", Over45, "F", Platinum),
            ("CUST015", "Rahul Singh", "rahul@email.com", From35To44, "M", Gold),
        ]
        .into_iter()
        .map(|(id, name, email, age_group, gender, tier)| CustomerSeed {
            customer_id: id.into(),
            full_name: name.into(),
            email: Some(email.into()),
            age_group,
            gender: gender.into(),
            loyalty_tier: tier,
        })
        .collect();

        let products = vec![
            ("PROD001", "Laptop Pro 15", "Electronics", "Computers", "TechBrand", 42000.0),
            ("PROD002", "Wireless Earbuds", "Electronics", "Audio", "SoundCo", 3200.0),
            ("PROD003", "4K Monitor 27in", "Electronics", "Displays", "ViewTech", 22000.0),
            ("PROD004", "Mechanical Keyboard", "Electronics", "Peripherals", "TypePro", 4500.0),
            ("PROD005", "Gaming Mouse", "Electronics", "Peripherals", "ClickMaster", 1800.0),
            ("PROD006", "Office Chair", "Furniture", "Seating", "ComfortPlus", 12000.0),
            ("PROD007", "Standing Desk", "Furniture", "Desks", "WorkRise", 28000.0),
            ("PROD008", "Notebook 200pg", "Stationery", "Books", "WriteMore", 120.0),
            ("PROD009", "Ballpoint Pens 10pk", "Stationery", "Writing", "InkFlow", 80.0),
            ("PROD010", "Webcam HD 1080p", "Electronics", "Cameras", "VisionCam", 4200.0),
            ("PROD011", "USB-C Hub 7-in-1", "Electronics", "Accessories", "ConnectAll", 2100.0),
            ("PROD012", "Desk Lamp LED", "Furniture", "Lighting", "BrightSpace", 1400.0),
            ("PROD013", "Whiteboard A0", "Stationery", "Boards", "ClearWrite", 3800.0),
            ("PROD014", "Smartphone Stand", "Electronics", "Accessories", "HoldIt", 650.0),
            ("PROD015", "Cable Organiser", "Electronics", "Accessories", "NeatDesk", 350.0),
        ]
        .into_iter()
        .map(|(id, name, category, sub_category, brand, unit_cost)| ProductSeed {
            product_id: id.into(),
            product_name: name.into(),
            category: category.into(),
            sub_category: sub_category.into(),
            brand: brand.into(),
            unit_cost,
        })
        .collect();

        let locations = vec![
            ("Mumbai", "Maharashtra", West, "400001"),
            ("Delhi", "Delhi", North, "110001"),
            ("Bangalore", "Karnataka", South, "560001"),
            ("Chennai", "Tamil Nadu", South, "600001"),
            ("Kolkata", "West Bengal", East, "700001"),
            ("Hyderabad", "Telangana", South, "500001"),
            ("Pune", "Maharashtra", West, "411001"),
            ("Ahmedabad", "Gujarat", West, "380001"),
            ("Jaipur", "Rajasthan", North, "302001"),
            ("Lucknow", "Uttar Pradesh", North, "226001"),
        ]
        .into_iter()
        .map(|(city, state, region, postal_code)| LocationSeed {
            city: city.into(),
            state: state.into(),
            region,
            postal_code: postal_code.into(),
        })
        .collect();

        Self {
            customers,
            products,
            locations,
        }
    }
}
