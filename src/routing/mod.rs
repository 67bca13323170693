//! Depot-based delivery routing.
//!
//! [`plan_routes`] builds a single tour through every stop, improves it
//! with simulated annealing, then splits it across the fleet.

mod planner;
mod types;

pub use planner::plan_routes;
pub use types::{Leg, RoutePlan, RouteStats, RoutingConfig, Stop, VehicleRoute, DEFAULT_LEG_VOLUME};
