//! Supply-chain network model.
//!
//! Plain records for locations ([`Node`]) and lanes ([`Route`]), a
//! validating container ([`Network`]), and the aggregate metrics the
//! optimizers score against.

mod graph;
mod metrics;
mod types;

pub use graph::{CostSeed, Network};
pub use metrics::{
    bottlenecks, flow_efficiency, total_cost, total_volume, weighted_score, MetricKind,
    Objective, RouteMetrics,
};
pub use types::{Node, NodeKind, Route, TransportMode};
