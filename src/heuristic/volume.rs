//! Route-volume optimization by simulated annealing and genetic search.
//!
//! Both searches work on a plain `Vec<f64>` of volumes, one per route, and
//! score it with [`RouteMetrics::with_volumes`] so candidates never clone
//! the route records. Only the winner is written back into routes.

use super::params::{AnnealingParams, GeneticParams};
use crate::error::{Error, Result};
use crate::ga::{GaProblem, GaRunner, Individual};
use crate::network::{weighted_score, Objective, Route, RouteMetrics};
use crate::sa::{SaProblem, SaRunner};
use rand::Rng;

/// No route is ever pushed below this volume.
pub const MIN_ROUTE_VOLUME: f64 = 10.0;

/// Probability that a picked route is actually adjusted by an SA move.
const MOVE_PROBABILITY: f64 = 0.3;
/// Largest relative adjustment of an SA move.
const MOVE_SPREAD: f64 = 0.3;
/// Largest relative adjustment of a GA mutation.
const MUTATION_SPREAD: f64 = 0.2;

/// Outcome of a volume optimization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeOptimization {
    /// Input routes carrying the best volumes, all flagged optimized.
    pub routes: Vec<Route>,
    /// Relative gain of the best energy over the starting one, in percent.
    pub improvement_pct: f64,
    pub initial_metrics: RouteMetrics,
    pub metrics: RouteMetrics,
    /// Energy of the input volumes: total cost, or the negated weighted score.
    pub initial_energy: f64,
    pub best_energy: f64,
    /// SA iterations or GA generations.
    pub iterations: usize,
    /// Best energy over the run.
    pub history: Vec<f64>,
}

/// Scores volume vectors against a fixed set of routes.
struct VolumeObjective<'a> {
    routes: &'a [Route],
    objectives: &'a [Objective],
}

impl VolumeObjective<'_> {
    fn energy(&self, volumes: &[f64]) -> f64 {
        let metrics = RouteMetrics::with_volumes(self.routes, volumes);
        if self.objectives.is_empty() {
            metrics.cost
        } else {
            -weighted_score(&metrics, self.objectives)
        }
    }

    fn current_volumes(&self) -> Vec<f64> {
        self.routes.iter().map(|r| r.volume).collect()
    }

    fn finish(
        &self,
        best: Vec<f64>,
        best_energy: f64,
        iterations: usize,
        history: Vec<f64>,
    ) -> VolumeOptimization {
        let initial = self.current_volumes();
        let initial_energy = self.energy(&initial);
        let improvement_pct = if initial_energy == 0.0 {
            0.0
        } else {
            (initial_energy - best_energy) / initial_energy.abs() * 100.0
        };
        let routes = self
            .routes
            .iter()
            .zip(&best)
            .map(|(route, &volume)| Route {
                volume,
                is_optimized: true,
                ..route.clone()
            })
            .collect();
        VolumeOptimization {
            routes,
            improvement_pct,
            initial_metrics: RouteMetrics::with_volumes(self.routes, &initial),
            metrics: RouteMetrics::with_volumes(self.routes, &best),
            initial_energy,
            best_energy,
            iterations,
            history,
        }
    }
}

fn floor_volume(v: f64) -> f64 {
    v.round().max(MIN_ROUTE_VOLUME)
}

fn check_routes(routes: &[Route]) -> Result<()> {
    if routes.is_empty() {
        return Err(Error::EmptyInput("volume optimization needs at least one route"));
    }
    routes.iter().try_for_each(Route::validate)
}

// ---- Simulated annealing ----

struct AnnealProblem<'a> {
    scorer: VolumeObjective<'a>,
    picks: usize,
}

impl SaProblem for AnnealProblem<'_> {
    type Solution = Vec<f64>;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Vec<f64> {
        self.scorer.current_volumes()
    }

    fn cost(&self, volumes: &Vec<f64>) -> f64 {
        self.scorer.energy(volumes)
    }

    fn neighbor<R: Rng>(&self, volumes: &Vec<f64>, rng: &mut R) -> Vec<f64> {
        let mut next = volumes.clone();
        for _ in 0..self.picks {
            let i = rng.random_range(0..next.len());
            if rng.random_bool(MOVE_PROBABILITY) {
                let adj = next[i] * rng.random_range(-MOVE_SPREAD..=MOVE_SPREAD);
                next[i] = floor_volume(next[i] + adj);
            }
        }
        next
    }
}

/// Re-balances route volumes with simulated annealing.
///
/// Starts from the current volumes. Without objectives the energy is total
/// cost; otherwise it is the negated [`weighted_score`].
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `routes` is empty
/// - [`Error::InvalidInput`] for a route with a bad volume or cost
/// - [`Error::InvalidConfig`] if `params` fail validation
pub fn anneal_route_volumes(
    routes: &[Route],
    params: &AnnealingParams,
    objectives: &[Objective],
) -> Result<VolumeOptimization> {
    check_routes(routes)?;
    params.validate()?;

    let picks = ((routes.len() as f64 * params.neighborhood_size / 100.0).floor() as usize).max(1);
    let problem = AnnealProblem {
        scorer: VolumeObjective { routes, objectives },
        picks,
    };
    let result = SaRunner::run(&problem, &params.to_sa_config())?;

    let outcome = problem.scorer.finish(
        result.best,
        result.best_cost,
        result.iterations,
        result.cost_history,
    );
    tracing::debug!(
        routes = routes.len(),
        picks,
        accepted = result.accepted_moves,
        improvement_pct = outcome.improvement_pct,
        "annealed route volumes"
    );
    Ok(outcome)
}

// ---- Genetic algorithm ----

/// A volume vector and its energy.
#[derive(Debug, Clone)]
struct VolumeIndividual {
    volumes: Vec<f64>,
    fitness: f64,
}

impl Individual for VolumeIndividual {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

struct EvolveProblem<'a> {
    scorer: VolumeObjective<'a>,
    mutation_rate: f64,
}

impl GaProblem for EvolveProblem<'_> {
    type Individual = VolumeIndividual;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> VolumeIndividual {
        let volumes = self
            .scorer
            .routes
            .iter()
            .map(|r| floor_volume(r.volume * rng.random_range(0.5..1.5)))
            .collect();
        VolumeIndividual {
            volumes,
            fitness: f64::INFINITY,
        }
    }

    fn evaluate(&self, individual: &VolumeIndividual) -> f64 {
        self.scorer.energy(&individual.volumes)
    }

    fn crossover<R: Rng>(
        &self,
        a: &VolumeIndividual,
        b: &VolumeIndividual,
        rng: &mut R,
    ) -> Vec<VolumeIndividual> {
        let (first, second) = a
            .volumes
            .iter()
            .zip(&b.volumes)
            .map(|(&x, &y)| {
                let alpha: f64 = rng.random_range(0.0..1.0);
                (
                    floor_volume(alpha * x + (1.0 - alpha) * y),
                    floor_volume((1.0 - alpha) * x + alpha * y),
                )
            })
            .unzip();
        vec![
            VolumeIndividual {
                volumes: first,
                fitness: f64::INFINITY,
            },
            VolumeIndividual {
                volumes: second,
                fitness: f64::INFINITY,
            },
        ]
    }

    fn mutate<R: Rng>(&self, individual: &mut VolumeIndividual, rng: &mut R) {
        for v in individual.volumes.iter_mut() {
            if rng.random_bool(self.mutation_rate) {
                let adj = *v * rng.random_range(-MUTATION_SPREAD..=MUTATION_SPREAD);
                *v = floor_volume(*v + adj);
            }
        }
    }
}

/// Re-balances route volumes with a genetic algorithm.
///
/// The population is drawn around the current volumes. If no individual
/// beats the input, the input volumes are returned with zero improvement.
///
/// # Errors
///
/// Same as [`anneal_route_volumes`].
pub fn evolve_route_volumes(
    routes: &[Route],
    params: &GeneticParams,
    objectives: &[Objective],
) -> Result<VolumeOptimization> {
    check_routes(routes)?;
    params.validate()?;

    let problem = EvolveProblem {
        scorer: VolumeObjective { routes, objectives },
        mutation_rate: params.mutation_rate,
    };
    let result = GaRunner::run(&problem, &params.to_ga_config())?;

    let initial = problem.scorer.current_volumes();
    let initial_energy = problem.scorer.energy(&initial);
    let (best, best_energy) = if result.best_fitness < initial_energy {
        (result.best.volumes, result.best_fitness)
    } else {
        (initial, initial_energy)
    };

    let outcome = problem.scorer.finish(
        best,
        best_energy,
        result.generations,
        result.fitness_history,
    );
    tracing::debug!(
        routes = routes.len(),
        generations = result.generations,
        improvement_pct = outcome.improvement_pct,
        "evolved route volumes"
    );
    Ok(outcome)
}
