//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic. Worsening moves are
//! accepted with a probability that shrinks as the temperature falls,
//! letting the search escape local optima early and settle late.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"
//! - Glauber (1963), "Time-Dependent Statistics of the Ising Model"

mod config;
mod runner;
mod types;

pub use config::{Acceptance, CoolingSchedule, SaConfig};
pub use runner::{SaResult, SaRunner};
pub use types::SaProblem;
