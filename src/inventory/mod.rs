//! Inventory policy calculators.
//!
//! EOQ with safety stock and reorder point, quantity-discount EOQ, the
//! newsvendor model, ABC classification, and multi-echelon base-stock
//! levels.

mod abc;
mod echelon;
mod policy;
mod types;

pub use abc::{abc_analysis, CLASS_A_CUTOFF, CLASS_B_CUTOFF};
pub use echelon::multi_echelon;
pub use policy::{
    economic_order_quantity, inventory_turnover, newsvendor, quantity_discount_eoq,
    relevant_cost, reorder_point, safety_stock, z_score, DEMAND_VARIABILITY,
};
pub use types::{
    AbcAnalysis, AbcClass, AbcEntry, ClassShare, DiscountEoq, DiscountTier, EchelonFacility,
    EoqResult, InventoryItem, InventoryMetrics, NewsvendorItem, NewsvendorResult, StockLevel,
};
