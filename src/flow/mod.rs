//! Network flow assignment.
//!
//! - [`greedy_assign`]: fills routes cheapest-first against a volume budget
//! - [`FlowGraph`]: exact min-cost flow over capacitated arcs

mod greedy;
mod mincost;

pub use greedy::{greedy_assign, GreedyFlowConfig};
pub use mincost::{ArcFlow, FlowGraph, FlowSolution, FlowSummary, BOTTLENECK_UTILIZATION};
