//! SA execution loop.

use super::config::{CoolingSchedule, SaConfig};
use super::types::SaProblem;
use crate::error::Result;
use crate::random::rng_from;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best cost sampled at regular intervals for history tracking.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// configuration fails validation.
    pub fn run<P: SaProblem>(problem: &P, config: &SaConfig) -> Result<SaResult<P::Solution>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs SA with an optional cancellation token.
    pub fn run_with_cancel<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::Solution>> {
        config.validate()?;

        let mut rng = rng_from(config.seed);

        // Initialize
        let mut current = problem.initial_solution(&mut rng);
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        // For linear cooling: compute step count
        let linear_max_steps = compute_linear_steps(config);

        // Cost history: sample every N iterations
        let history_interval = 100.max(config.iterations_per_temperature);
        let mut cost_history = Vec::new();
        cost_history.push(best_cost);

        let mut step = 0usize; // temperature step counter

        tracing::debug!(
            initial_cost = best_cost,
            temperature,
            cooling = ?config.cooling,
            acceptance = ?config.acceptance,
            "sa run started"
        );

        while temperature > config.min_temperature {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let inner_iters = match config.cooling {
                CoolingSchedule::LundyMees { .. } => 1,
                _ => config.iterations_per_temperature,
            };

            for _ in 0..inner_iters {
                if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                    break;
                }

                let neighbor = problem.neighbor(&current, &mut rng);
                let neighbor_cost = problem.cost(&neighbor);
                let delta = neighbor_cost - current_cost;

                let accept = delta < 0.0
                    || rng.random_range(0.0..1.0)
                        < config.acceptance.probability(delta, temperature);

                if accept {
                    if delta < 0.0 {
                        improving_moves += 1;
                    }
                    current = neighbor;
                    current_cost = neighbor_cost;
                    accepted_moves += 1;

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                    }
                }

                total_iterations += 1;

                // Record history
                if total_iterations.is_multiple_of(history_interval) {
                    cost_history.push(best_cost);
                }
            }

            // Check hard iteration limit
            if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                break;
            }

            // Cool down
            temperature = cool(temperature, config, step, linear_max_steps);
            step += 1;
            tracing::trace!(step, temperature, best_cost, "sa cooling step");
        }

        // Final history entry
        if cost_history
            .last()
            .is_none_or(|&last| (last - best_cost).abs() > 1e-15)
        {
            cost_history.push(best_cost);
        }

        tracing::debug!(
            best_cost,
            iterations = total_iterations,
            accepted_moves,
            cancelled,
            "sa run finished"
        );

        Ok(SaResult {
            best,
            best_cost,
            iterations: total_iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cancelled,
            cost_history,
        })
    }
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(temperature: f64, config: &SaConfig, step: usize, linear_max_steps: usize) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if linear_max_steps == 0 {
                config.min_temperature
            } else {
                let t = config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / linear_max_steps as f64;
                t.max(config.min_temperature)
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),

        CoolingSchedule::Logarithmic => {
            config.initial_temperature / (1.0 + ((step + 1) as f64).ln_1p())
        }
    }
}

/// Estimate the number of temperature steps for linear cooling.
fn compute_linear_steps(config: &SaConfig) -> usize {
    match config.cooling {
        CoolingSchedule::Linear => {
            if config.max_iterations > 0 && config.iterations_per_temperature > 0 {
                config.max_iterations / config.iterations_per_temperature
            } else {
                1000 // reasonable default
            }
        }
        _ => 0,
    }
}
