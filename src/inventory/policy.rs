//! Order-quantity and stock-level formulas.
//!
//! # References
//!
//! - Harris (1913), "How Many Parts to Make at Once"
//! - Arrow, Harris & Marschak (1951), "Optimal Inventory Policy"
//! - Acklam (2003), "An algorithm for computing the inverse normal
//!   cumulative distribution function"

use super::types::{
    DiscountEoq, DiscountTier, EoqResult, InventoryItem, InventoryMetrics, NewsvendorItem,
    NewsvendorResult,
};
use crate::error::{Error, Result};

/// Relative standard deviation of daily demand assumed by [`economic_order_quantity`].
pub const DEMAND_VARIABILITY: f64 = 0.25;

const DAYS_PER_YEAR: f64 = 365.0;

// Acklam's rational approximation coefficients.
const A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_69e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];
const P_LOW: f64 = 0.024_25;

/// Inverse standard normal CDF: the `z` with `P(Z <= z) = service_level`.
///
/// # Errors
///
/// [`Error::InvalidInput`] unless `0 < service_level < 1`.
pub fn z_score(service_level: f64) -> Result<f64> {
    let p = service_level;
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::InvalidInput(format!(
            "service level must be in (0, 1), got {p}"
        )));
    }
    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };
    let z = if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - P_LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    };
    Ok(z)
}

/// Safety stock `z * sqrt(L) * daily_demand * variability`.
pub fn safety_stock(
    annual_demand: f64,
    lead_time_days: f64,
    service_level: f64,
    variability: f64,
) -> Result<f64> {
    let z = z_score(service_level)?;
    Ok(z * lead_time_days.max(0.0).sqrt() * (annual_demand / DAYS_PER_YEAR) * variability)
}

/// Lead-time demand plus safety stock.
pub fn reorder_point(annual_demand: f64, lead_time_days: f64, safety_stock: f64) -> f64 {
    annual_demand / DAYS_PER_YEAR * lead_time_days + safety_stock
}

/// Times the average inventory is sold through per year.
pub fn inventory_turnover(cost_of_goods_sold: f64, average_inventory: f64) -> Result<f64> {
    if average_inventory.is_nan() || average_inventory <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "average inventory must be positive, got {average_inventory}"
        )));
    }
    Ok(cost_of_goods_sold / average_inventory)
}

/// Annual ordering plus holding cost of ordering `quantity` units at a time.
///
/// Purchase cost is left out: it does not depend on `quantity`.
pub fn relevant_cost(item: &InventoryItem, quantity: f64) -> f64 {
    item.ordering_cost * item.annual_demand / quantity + item.holding_cost() * quantity / 2.0
}

/// Classic EOQ `sqrt(2DS / H)` with safety stock and reorder point.
///
/// Safety stock assumes daily demand varies by [`DEMAND_VARIABILITY`].
///
/// # Errors
///
/// [`Error::InvalidInput`] if the item fails [`InventoryItem::validate`].
pub fn economic_order_quantity(item: &InventoryItem) -> Result<EoqResult> {
    item.validate()?;
    let d = item.annual_demand;
    let s = item.ordering_cost;
    let h = item.holding_cost();

    let eoq = (2.0 * d * s / h).sqrt();
    let orders_per_year = d / eoq;
    let annual_ordering_cost = s * orders_per_year;
    let annual_holding_cost = h * eoq / 2.0;
    let safety = safety_stock(
        d,
        item.lead_time_days,
        item.service_level_pct / 100.0,
        DEMAND_VARIABILITY,
    )?;

    Ok(EoqResult {
        economic_order_quantity: eoq,
        orders_per_year,
        cycle_time_days: DAYS_PER_YEAR / orders_per_year,
        annual_ordering_cost,
        annual_holding_cost,
        total_annual_cost: annual_ordering_cost + annual_holding_cost + d * item.unit_cost,
        safety_stock: safety,
        reorder_point: reorder_point(d, item.lead_time_days, safety),
    })
}

/// EOQ under all-units quantity discounts.
///
/// Each tier orders `max(sqrt(2DS / H_t), min_quantity)` with
/// `H_t = holding_rate * unit_price`; the tier with the lowest total annual
/// cost wins, the earliest on ties. An item without tiers is priced at
/// its `unit_cost`.
///
/// # Errors
///
/// [`Error::InvalidInput`] if the item fails [`InventoryItem::validate`],
/// or a tier has a non-positive price or a negative minimum quantity.
pub fn quantity_discount_eoq(item: &InventoryItem) -> Result<DiscountEoq> {
    item.validate()?;
    let list_price = [DiscountTier::new(0.0, item.unit_cost)];
    let tiers: &[DiscountTier] = if item.discount_tiers.is_empty() {
        &list_price
    } else {
        &item.discount_tiers
    };

    let d = item.annual_demand;
    let s = item.ordering_cost;
    let mut best: Option<DiscountEoq> = None;
    for (i, tier) in tiers.iter().enumerate() {
        if !(tier.unit_price.is_finite() && tier.unit_price > 0.0) {
            return Err(Error::InvalidInput(format!(
                "item {}: tier {i} has invalid price {}",
                item.id, tier.unit_price
            )));
        }
        if !(tier.min_quantity.is_finite() && tier.min_quantity >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "item {}: tier {i} has invalid minimum quantity {}",
                item.id, tier.min_quantity
            )));
        }
        let h = item.holding_rate * tier.unit_price;
        let order_quantity = (2.0 * d * s / h).sqrt().max(tier.min_quantity);
        let orders_per_year = d / order_quantity;
        let annual_ordering_cost = s * orders_per_year;
        let annual_holding_cost = h * order_quantity / 2.0;
        let total_annual_cost = annual_ordering_cost + annual_holding_cost + d * tier.unit_price;
        if best.is_none_or(|b| total_annual_cost < b.total_annual_cost) {
            best = Some(DiscountEoq {
                order_quantity,
                unit_price: tier.unit_price,
                tier: i,
                orders_per_year,
                annual_ordering_cost,
                annual_holding_cost,
                total_annual_cost,
            });
        }
    }
    best.ok_or(Error::EmptyInput("quantity discount needs at least one tier"))
}

/// Newsvendor order quantity under normally distributed demand.
///
/// Orders `max(0, mu + z * sigma)` where `z` is the inverse normal of the
/// critical ratio. Expected profit is
/// `(p - c) * mu - (p - s) * sigma * phi(z)`.
///
/// # Errors
///
/// [`Error::InvalidInput`] unless `price > cost > salvage`, the demand
/// mean and deviation are non-negative, and every field is finite.
pub fn newsvendor(item: &NewsvendorItem) -> Result<NewsvendorResult> {
    let fields = [
        ("selling price", item.selling_price),
        ("unit cost", item.unit_cost),
        ("salvage value", item.salvage_value),
        ("demand mean", item.demand_mean),
        ("demand deviation", item.demand_std_dev),
    ];
    if let Some((what, v)) = fields.iter().find(|(_, v)| !v.is_finite()) {
        return Err(Error::InvalidInput(format!("item {}: invalid {what} {v}", item.id)));
    }
    if item.demand_mean < 0.0 || item.demand_std_dev < 0.0 {
        return Err(Error::InvalidInput(format!(
            "item {}: demand mean and deviation must be non-negative",
            item.id
        )));
    }
    if !(item.selling_price > item.unit_cost && item.unit_cost > item.salvage_value) {
        return Err(Error::InvalidInput(format!(
            "item {}: need price > cost > salvage, got {} / {} / {}",
            item.id, item.selling_price, item.unit_cost, item.salvage_value
        )));
    }

    let underage = item.selling_price - item.unit_cost;
    let spread = item.selling_price - item.salvage_value;
    let critical_ratio = underage / spread;
    let z = z_score(critical_ratio)?;
    let density = (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt();

    Ok(NewsvendorResult {
        critical_ratio,
        order_quantity: (item.demand_mean + z * item.demand_std_dev).max(0.0),
        expected_profit: underage * item.demand_mean - spread * item.demand_std_dev * density,
        service_level_pct: critical_ratio * 100.0,
    })
}

impl InventoryMetrics {
    pub fn for_item(item: &InventoryItem, eoq: &EoqResult) -> Self {
        let holding_cost_pct = if eoq.total_annual_cost > 0.0 {
            eoq.annual_holding_cost / eoq.total_annual_cost * 100.0
        } else {
            0.0
        };
        Self {
            holding_cost_pct,
            stockout_rate: 1.0 - item.service_level_pct / 100.0,
            working_capital: (eoq.economic_order_quantity / 2.0 + eoq.safety_stock)
                * item.unit_cost,
        }
    }
}
