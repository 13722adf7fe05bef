use std::collections::{BTreeMap, HashSet};

use ecommerce_warehouse::{
    error::WarehouseError,
    master_data::MasterData,
    services::{
        calendar::enumerate_dates,
        generator::{GeneratorSettings, PricingPolicy, generate_orders, round2},
    },
};

mod common;
use common::{tiny_master, ymd};

const TOLERANCE: f64 = 1e-6;

#[test]
fn derived_fields_hold_for_every_line() -> anyhow::Result<()> {
    let master = MasterData::default();
    let calendar = enumerate_dates(ymd(2023, 1, 1), ymd(2023, 12, 31))?;
    let lines = generate_orders(&master, &calendar, &GeneratorSettings::new(2_000, 11))?;
    let discounts = PricingPolicy::default().discount_choices;

    for line in &lines {
        assert!((1..=5).contains(&line.quantity), "{line:?}");
        assert!(line.unit_price > line.unit_cost, "{line:?}");
        assert!(discounts.contains(&line.discount_pct), "{line:?}");
        assert!(
            (line.gross_revenue - round2(f64::from(line.quantity) * line.unit_price)).abs()
                < TOLERANCE
        );
        assert!(
            (line.net_revenue - round2(line.gross_revenue * (1.0 - line.discount_pct))).abs()
                < TOLERANCE
        );
        assert!(
            (line.profit - round2(line.net_revenue - f64::from(line.quantity) * line.unit_cost))
                .abs()
                < TOLERANCE
        );
        assert!(line.net_revenue <= line.gross_revenue);
        assert!(line.net_revenue >= 0.0);
    }
    Ok(())
}

#[test]
fn orders_have_one_to_six_lines_and_sequential_ids() -> anyhow::Result<()> {
    let calendar = enumerate_dates(ymd(2023, 3, 1), ymd(2023, 3, 10))?;
    let lines = generate_orders(&tiny_master(), &calendar, &GeneratorSettings::new(250, 3))?;

    let mut per_order: BTreeMap<&str, Vec<_>> = BTreeMap::new();
    for line in &lines {
        per_order.entry(line.order_id.as_str()).or_default().push(line);
    }

    assert_eq!(per_order.len(), 250);
    assert_eq!(per_order.keys().next(), Some(&"ORD000001"));
    assert_eq!(per_order.keys().last(), Some(&"ORD000250"));

    for (order_id, order_lines) in &per_order {
        assert!((1..=6).contains(&order_lines.len()), "{order_id}");
        // customer, date and location are chosen once per order
        let first = order_lines[0];
        assert!(order_lines.iter().all(|l| {
            l.customer_id == first.customer_id
                && l.order_date == first.order_date
                && l.postal_code == first.postal_code
        }));
        assert!(calendar.contains(&first.order_date));
    }
    Ok(())
}

#[test]
fn order_net_revenue_matches_independent_sum() -> anyhow::Result<()> {
    let calendar = enumerate_dates(ymd(2023, 1, 1), ymd(2023, 1, 31))?;
    let settings = GeneratorSettings::new(500, 99);
    let lines = generate_orders(&MasterData::default(), &calendar, &settings)?;

    let mut stored: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut independent: BTreeMap<&str, f64> = BTreeMap::new();
    for line in &lines {
        let entry = stored.entry(line.order_id.as_str()).or_default();
        entry.0 += line.net_revenue;
        entry.1 += 1;
        *independent.entry(line.order_id.as_str()).or_default() +=
            f64::from(line.quantity) * line.unit_price * (1.0 - line.discount_pct);
    }

    for (order_id, (sum, line_count)) in &stored {
        let expected = round2(independent[order_id]);
        // each line rounds twice, at most a cent per line
        assert!(
            (round2(*sum) - expected).abs() <= 0.01 * *line_count as f64 + TOLERANCE,
            "{order_id}: {sum} vs {expected}"
        );
    }
    Ok(())
}

#[test]
fn same_seed_same_batch() -> anyhow::Result<()> {
    let master = tiny_master();
    let calendar = enumerate_dates(ymd(2023, 5, 1), ymd(2023, 5, 31))?;

    let a = generate_orders(&master, &calendar, &GeneratorSettings::new(50, 1234))?;
    let b = generate_orders(&master, &calendar, &GeneratorSettings::new(50, 1234))?;
    let c = generate_orders(&master, &calendar, &GeneratorSettings::new(50, 4321))?;

    assert_eq!(a, b);
    assert_ne!(a, c);
    Ok(())
}

#[test]
fn return_rate_is_near_configured_probability() -> anyhow::Result<()> {
    let calendar = enumerate_dates(ymd(2023, 1, 1), ymd(2023, 12, 31))?;
    let settings = GeneratorSettings::new(5_000, 2024);
    let lines = generate_orders(&MasterData::default(), &calendar, &settings)?;
    assert!(lines.len() >= 10_000, "only {} lines", lines.len());

    let returned = lines.iter().filter(|l| l.is_returned).count();
    let rate = returned as f64 / lines.len() as f64;
    assert!(
        (rate - settings.pricing.return_probability).abs() < 0.01,
        "return rate {rate}"
    );
    Ok(())
}

#[test]
fn picks_only_from_master_data() -> anyhow::Result<()> {
    let master = tiny_master();
    let calendar = enumerate_dates(ymd(2023, 3, 1), ymd(2023, 3, 10))?;
    let lines = generate_orders(&master, &calendar, &GeneratorSettings::new(100, 5))?;

    let customers: HashSet<_> = master.customers.iter().map(|c| &c.customer_id).collect();
    let products: HashSet<_> = master.products.iter().map(|p| &p.product_id).collect();
    let postal_codes: HashSet<_> = master.locations.iter().map(|l| &l.postal_code).collect();

    assert!(lines.iter().all(|l| {
        customers.contains(&l.customer_id)
            && products.contains(&l.product_id)
            && postal_codes.contains(&l.postal_code)
    }));
    Ok(())
}

#[test]
fn zero_orders_yield_no_lines() -> anyhow::Result<()> {
    let calendar = enumerate_dates(ymd(2023, 3, 1), ymd(2023, 3, 1))?;
    let lines = generate_orders(&tiny_master(), &calendar, &GeneratorSettings::new(0, 1))?;
    assert!(lines.is_empty());
    Ok(())
}

#[test]
fn empty_inputs_are_rejected() {
    let calendar = vec![ymd(2023, 1, 1)];

    let mut master = tiny_master();
    master.customers.clear();
    let err = generate_orders(&master, &calendar, &GeneratorSettings::new(10, 1)).unwrap_err();
    assert!(matches!(err, WarehouseError::InvalidMasterData(_)));

    let err = generate_orders(&tiny_master(), &[], &GeneratorSettings::new(10, 1)).unwrap_err();
    assert!(matches!(err, WarehouseError::InvalidSettings(_)));
}

#[test]
fn sub_cent_margin_product_is_rejected() {
    let calendar = enumerate_dates(ymd(2023, 1, 1), ymd(2023, 1, 31)).unwrap();
    let mut master = tiny_master();
    master.products[2].unit_cost = 0.01;
    // positive cost passes master validation on its own
    master.validate().unwrap();

    let err = generate_orders(&master, &calendar, &GeneratorSettings::new(200, 1)).unwrap_err();
    assert!(matches!(
        err,
        WarehouseError::InvalidMasterData(msg) if msg.contains("P3")
    ));
}
