//! Genetic Algorithm framework.
//!
//! A generic GA built on two traits. [`GaProblem`] says how to create,
//! evaluate, recombine and mutate candidates; [`Individual`] carries a
//! candidate and its fitness. [`GaRunner`] drives the loop: evaluate,
//! keep elites, select parents, cross over, mutate, repeat.
//!
//! Fitness is minimized.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use types::{Fitness, GaProblem, Individual};
