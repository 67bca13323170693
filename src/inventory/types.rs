//! Inventory records and results.

use crate::error::{Error, Result};

/// A stocked item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryItem {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Units per year.
    pub annual_demand: f64,
    /// Fixed cost per order placed.
    pub ordering_cost: f64,
    /// Yearly holding cost as a fraction of unit cost.
    pub holding_rate: f64,
    pub unit_cost: f64,
    pub lead_time_days: f64,
    /// Target cycle service level in percent.
    pub service_level_pct: f64,
    /// Supplier price breaks. Empty means a single price of `unit_cost`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub discount_tiers: Vec<DiscountTier>,
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, annual_demand: f64, unit_cost: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            annual_demand,
            ordering_cost: 100.0,
            holding_rate: 0.25,
            unit_cost,
            lead_time_days: 7.0,
            service_level_pct: 95.0,
            discount_tiers: Vec::new(),
        }
    }

    pub fn with_ordering_cost(mut self, cost: f64) -> Self {
        self.ordering_cost = cost;
        self
    }

    pub fn with_holding_rate(mut self, rate: f64) -> Self {
        self.holding_rate = rate;
        self
    }

    pub fn with_lead_time_days(mut self, days: f64) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_service_level_pct(mut self, pct: f64) -> Self {
        self.service_level_pct = pct;
        self
    }

    pub fn with_discount_tiers(mut self, tiers: Vec<DiscountTier>) -> Self {
        self.discount_tiers = tiers;
        self
    }

    /// Yearly cost of holding one unit.
    pub fn holding_cost(&self) -> f64 {
        self.holding_rate * self.unit_cost
    }

    /// Unit cost times annual demand.
    pub fn annual_value(&self) -> f64 {
        self.unit_cost * self.annual_demand
    }

    pub fn daily_demand(&self) -> f64 {
        self.annual_demand / 365.0
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |what: &str, v: f64| {
            Err(Error::InvalidInput(format!("item {}: invalid {what} {v}", self.id)))
        };
        if !(self.annual_demand.is_finite() && self.annual_demand > 0.0) {
            return bad("annual demand", self.annual_demand);
        }
        if !(self.ordering_cost.is_finite() && self.ordering_cost > 0.0) {
            return bad("ordering cost", self.ordering_cost);
        }
        if !(self.unit_cost.is_finite() && self.unit_cost >= 0.0) {
            return bad("unit cost", self.unit_cost);
        }
        let h = self.holding_cost();
        if !(h.is_finite() && h > 0.0) {
            return bad("holding cost", h);
        }
        if !(self.lead_time_days.is_finite() && self.lead_time_days >= 0.0) {
            return bad("lead time", self.lead_time_days);
        }
        if !(self.service_level_pct > 0.0 && self.service_level_pct < 100.0) {
            return bad("service level", self.service_level_pct);
        }
        Ok(())
    }
}

/// Economic order quantity and the policy numbers derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EoqResult {
    pub economic_order_quantity: f64,
    pub orders_per_year: f64,
    pub cycle_time_days: f64,
    pub annual_ordering_cost: f64,
    pub annual_holding_cost: f64,
    /// Ordering plus holding plus purchase cost.
    pub total_annual_cost: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
}

/// Unit price offered for orders of at least `min_quantity` units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscountTier {
    pub min_quantity: f64,
    pub unit_price: f64,
}

impl DiscountTier {
    pub fn new(min_quantity: f64, unit_price: f64) -> Self {
        Self {
            min_quantity,
            unit_price,
        }
    }
}

/// Cheapest order policy across a set of price breaks.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscountEoq {
    pub order_quantity: f64,
    pub unit_price: f64,
    /// Index of the winning tier in the input.
    pub tier: usize,
    pub orders_per_year: f64,
    pub annual_ordering_cost: f64,
    pub annual_holding_cost: f64,
    /// Ordering plus holding plus purchase cost at the tier price.
    pub total_annual_cost: f64,
}

/// Single-period stocking decision for perishable or seasonal goods.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewsvendorItem {
    pub id: String,
    pub selling_price: f64,
    pub unit_cost: f64,
    /// Recovered per unsold unit.
    pub salvage_value: f64,
    pub demand_mean: f64,
    pub demand_std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewsvendorResult {
    /// `(price - cost) / (price - salvage)`.
    pub critical_ratio: f64,
    pub order_quantity: f64,
    pub expected_profit: f64,
    /// Probability of meeting all demand, in percent.
    pub service_level_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbcClass {
    A,
    B,
    C,
}

/// One item's place in an ABC ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbcEntry {
    pub id: String,
    pub annual_value: f64,
    pub value_pct: f64,
    pub cumulative_pct: f64,
    pub class: AbcClass,
}

/// Share of value and of item count held by one class, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassShare {
    pub value_pct: f64,
    pub item_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbcAnalysis {
    /// All items, highest annual value first.
    pub entries: Vec<AbcEntry>,
    pub class_a: ClassShare,
    pub class_b: ClassShare,
    pub class_c: ClassShare,
    pub total_value: f64,
}

impl AbcAnalysis {
    pub fn class_of(&self, id: &str) -> Option<AbcClass> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.class)
    }

    pub fn members(&self, class: AbcClass) -> impl Iterator<Item = &AbcEntry> {
        self.entries.iter().filter(move |e| e.class == class)
    }
}

/// A stocking point in a multi-echelon network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EchelonFacility {
    pub id: String,
    /// 1 is closest to supply.
    pub echelon: u32,
    pub mean_daily_demand: f64,
    pub demand_std_dev: f64,
    pub lead_time_days: f64,
}

/// Base-stock levels for one facility.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StockLevel {
    pub id: String,
    pub echelon: u32,
    pub safety_stock: f64,
    pub base_stock: f64,
    pub service_level: f64,
}

/// Headline indicators for an item under its EOQ policy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryMetrics {
    /// Holding cost as a share of total annual cost, in percent.
    pub holding_cost_pct: f64,
    /// Expected fraction of cycles that stock out.
    pub stockout_rate: f64,
    /// Capital tied up in cycle and safety stock.
    pub working_capital: f64,
}
