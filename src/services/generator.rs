use chrono::NaiveDate;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::{WarehouseError, WarehouseResult},
    master_data::MasterData,
    models::OrderLine,
};

/// Ranges the per-line money fields are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    pub markup_min: f64,
    /// Inclusive upper bound of the markup draw.
    pub markup_max: f64,
    /// Drawn uniformly; repeat a value to weight it.
    pub discount_choices: Vec<f64>,
    pub return_probability: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            markup_min: 1.15,
            markup_max: 1.40,
            discount_choices: vec![0.0, 0.0, 0.0, 0.05, 0.10, 0.15, 0.20],
            return_probability: 0.04,
        }
    }
}

impl PricingPolicy {
    pub fn validate(&self) -> WarehouseResult<()> {
        if !(self.markup_min.is_finite() && self.markup_min > 0.0) {
            return Err(invalid(format!("markup_min {} must be positive", self.markup_min)));
        }
        if !(self.markup_max.is_finite() && self.markup_max >= self.markup_min) {
            return Err(invalid(format!(
                "markup range {}..{} is empty",
                self.markup_min, self.markup_max
            )));
        }
        if self.discount_choices.is_empty() {
            return Err(invalid("no discount choices".into()));
        }
        if let Some(d) = self
            .discount_choices
            .iter()
            .find(|d| !(0.0..1.0).contains(*d))
        {
            return Err(invalid(format!("discount {d} outside [0, 1)")));
        }
        if !(0.0..=1.0).contains(&self.return_probability) {
            return Err(invalid(format!(
                "return probability {} outside [0, 1]",
                self.return_probability
            )));
        }
        Ok(())
    }

    /// Whether the cheapest possible sale still covers unit cost.
    ///
    /// Profit is never clamped; this only reports whether the ranges rule a
    /// loss out. The default policy does not (1.15 markup at 20% off sells at
    /// 0.92 of cost).
    pub fn guarantees_non_negative_profit(&self) -> bool {
        let max_discount = self.discount_choices.iter().copied().fold(0.0, f64::max);
        self.markup_min * (1.0 - max_discount) >= 1.0
    }

    /// Rejects products whose cheapest price, once rounded to cents, would
    /// not exceed their unit cost.
    pub fn ensure_margin(&self, master: &MasterData) -> WarehouseResult<()> {
        let no_margin = master
            .products
            .iter()
            .find(|p| round2(p.unit_cost * self.markup_min) <= p.unit_cost);
        if let Some(product) = no_margin {
            return Err(WarehouseError::InvalidMasterData(format!(
                "product {} unit cost {} leaves no margin at markup {}",
                product.product_id, product.unit_cost, self.markup_min
            )));
        }
        Ok(())
    }

    fn price_line<R: Rng>(&self, rng: &mut R, unit_cost: f64, quantity: i32) -> LinePricing {
        let unit_price = round2(unit_cost * rng.gen_range(self.markup_min..=self.markup_max));
        let discount_pct =
            round2(self.discount_choices[rng.gen_range(0..self.discount_choices.len())]);
        let gross_revenue = round2(f64::from(quantity) * unit_price);
        let net_revenue = round2(gross_revenue * (1.0 - discount_pct));
        let profit = round2(net_revenue - f64::from(quantity) * unit_cost);
        let is_returned = rng.gen_bool(self.return_probability);

        LinePricing {
            unit_price,
            discount_pct,
            gross_revenue,
            net_revenue,
            profit,
            is_returned,
        }
    }
}

struct LinePricing {
    unit_price: f64,
    discount_pct: f64,
    gross_revenue: f64,
    net_revenue: f64,
    profit: f64,
    is_returned: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub num_orders: usize,
    pub seed: u64,
    pub max_lines_per_order: u32,
    pub max_quantity: i32,
    pub pricing: PricingPolicy,
}

impl GeneratorSettings {
    pub fn new(num_orders: usize, seed: u64) -> Self {
        Self {
            num_orders,
            seed,
            max_lines_per_order: 6,
            max_quantity: 5,
            pricing: PricingPolicy::default(),
        }
    }

    pub fn validate(&self) -> WarehouseResult<()> {
        if self.max_lines_per_order == 0 {
            return Err(invalid("max_lines_per_order must be at least 1".into()));
        }
        if self.max_quantity < 1 {
            return Err(invalid("max_quantity must be at least 1".into()));
        }
        self.pricing.validate()
    }
}

/// Upper bound on the up-front line allocation.
const MAX_PREALLOCATED_LINES: usize = 1 << 20;

/// Round half away from zero to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Run-scoped order identifier: `ORD000001`, `ORD000002`, ...
pub fn order_id(sequence: usize) -> String {
    format!("ORD{sequence:06}")
}

/// Synthesise `settings.num_orders` orders of 1..=`max_lines_per_order` lines
/// each. Pure and deterministic for a given seed.
pub fn generate_orders(
    master: &MasterData,
    calendar: &[NaiveDate],
    settings: &GeneratorSettings,
) -> WarehouseResult<Vec<OrderLine>> {
    master.validate()?;
    settings.validate()?;
    settings.pricing.ensure_margin(master)?;
    if calendar.is_empty() {
        return Err(invalid("calendar has no dates".into()));
    }

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut lines = Vec::with_capacity(expected_line_count(settings));

    for sequence in 1..=settings.num_orders {
        let order_id = order_id(sequence);
        let customer = pick(&mut rng, &master.customers);
        let order_date = *pick(&mut rng, calendar);
        let location = pick(&mut rng, &master.locations);
        let line_count = rng.gen_range(1..=settings.max_lines_per_order);

        for _ in 0..line_count {
            let product = pick(&mut rng, &master.products);
            let quantity = rng.gen_range(1..=settings.max_quantity);
            let pricing = settings
                .pricing
                .price_line(&mut rng, product.unit_cost, quantity);

            lines.push(OrderLine {
                order_id: order_id.clone(),
                customer_id: customer.customer_id.clone(),
                product_id: product.product_id.clone(),
                order_date,
                postal_code: location.postal_code.clone(),
                quantity,
                unit_cost: product.unit_cost,
                unit_price: pricing.unit_price,
                discount_pct: pricing.discount_pct,
                gross_revenue: pricing.gross_revenue,
                net_revenue: pricing.net_revenue,
                profit: pricing.profit,
                is_returned: pricing.is_returned,
            });
        }
    }

    tracing::debug!(
        orders = settings.num_orders,
        lines = lines.len(),
        seed = settings.seed,
        "orders generated"
    );
    Ok(lines)
}

// Mean lines per order times orders, capped.
fn expected_line_count(settings: &GeneratorSettings) -> usize {
    let mean_x2 = settings.max_lines_per_order as usize + 1;
    (settings.num_orders.saturating_mul(mean_x2) / 2).min(MAX_PREALLOCATED_LINES)
}

// Callers validate that `items` is non-empty.
fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn invalid(message: String) -> WarehouseError {
    WarehouseError::InvalidSettings(message)
}
