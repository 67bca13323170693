//! Route-volume heuristics.
//!
//! Re-balance the volume carried on each route of a network to lower its
//! total cost, or to raise a weighted multi-objective score. Two search
//! strategies share the same move set and scoring:
//!
//! - [`anneal_route_volumes`]: simulated annealing from the current volumes
//! - [`evolve_route_volumes`]: a genetic algorithm seeded around them

mod params;
mod volume;

pub use params::{AnnealingParams, GeneticParams, VolumeCooling};
pub use volume::{anneal_route_volumes, evolve_route_volumes, VolumeOptimization, MIN_ROUTE_VOLUME};
