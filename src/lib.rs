//! Supply-chain network heuristics.
//!
//! Building blocks for siting, flow, routing and stocking decisions on a
//! network of geo-located nodes:
//!
//! - **Center of gravity** ([`cog`]): weighted centroid and Weiszfeld
//!   geometric median over great-circle distance.
//! - **Facility siting** ([`facility`]): greedy p-median over candidate
//!   sites.
//! - **Route-volume heuristics** ([`heuristic`]): re-balance the volume on
//!   each lane with simulated annealing or a genetic algorithm, against
//!   total cost or a weighted multi-objective score.
//! - **Network flow** ([`flow`]): cost-ordered greedy assignment and exact
//!   min-cost flow by successive shortest paths.
//! - **Routing** ([`routing`]): nearest-neighbor tour, 2-opt annealing,
//!   and a route-first split across a vehicle fleet.
//! - **Inventory** ([`inventory`]): EOQ with and without quantity
//!   discounts, newsvendor, safety stock, ABC classification and
//!   multi-echelon base stock.
//!
//! The annealing and genetic engines ([`sa`], [`ga`]) are generic: the
//! volume and routing heuristics are thin problem definitions on top of
//! them.
//!
//! # Features
//!
//! - `serde`: serialization of all records and configs, plus
//!   [`scenario`] files in JSON or TOML
//! - `parallel`: rayon-parallel GA evaluation
//! - `cli`: the `supplynet` binary

pub mod cog;
pub mod error;
pub mod facility;
pub mod flow;
pub mod ga;
pub mod geo;
pub mod heuristic;
pub mod inventory;
pub mod network;
pub mod random;
pub mod routing;
pub mod sa;
#[cfg(feature = "serde")]
pub mod scenario;

pub use error::{Error, Result};
