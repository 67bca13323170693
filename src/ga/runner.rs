//! GA evolutionary loop.

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use crate::error::Result;
use crate::random::rng_from;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    pub best_fitness: I::Fitness,

    /// Generations executed.
    pub generations: usize,

    /// Whether the run stopped on the stagnation limit.
    pub stagnated: bool,

    pub cancelled: bool,

    /// Best fitness after initialization and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// configuration fails validation.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult<P::Individual>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token, checked at the
    /// start of every generation.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>> {
        config.validate()?;

        let mut rng = rng_from(config.seed);

        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        evaluate(problem, &mut population, config.parallel);

        let mut best = find_best(&population).clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness().to_f64());

        tracing::debug!(
            population = config.population_size,
            initial_best = best.fitness().to_f64(),
            "ga run started"
        );

        let elite_count = config.elite_count();
        let mut stagnation_counter = 0usize;
        let mut generations = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;

        for gen in 0..config.max_generations {
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            // Best first, so the elites are the head of the population.
            population.sort_by(|a, b| {
                a.fitness()
                    .partial_cmp(&b.fitness())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut next_gen: Vec<P::Individual> = population[..elite_count].to_vec();

            while next_gen.len() < config.population_size {
                let p1 = config.selection.select(&population, &mut rng);
                let p2 = config.selection.select(&population, &mut rng);

                let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    problem.crossover(&population[p1], &population[p2], &mut rng)
                } else {
                    vec![population[p1].clone()]
                };

                for mut child in children {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    if rng.random_range(0.0..1.0) < config.mutation_rate {
                        problem.mutate(&mut child, &mut rng);
                    }
                    next_gen.push(child);
                }
            }

            // Elites keep their fitness.
            evaluate(problem, &mut next_gen[elite_count..], config.parallel);
            population = next_gen;
            generations = gen + 1;

            let gen_best = find_best(&population);
            if gen_best.fitness() < best.fitness() {
                best = gen_best.clone();
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            fitness_history.push(best.fitness().to_f64());
            tracing::trace!(generation = generations, best = best.fitness().to_f64(), "ga generation");

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        tracing::debug!(
            generations,
            best = best.fitness().to_f64(),
            stagnated,
            cancelled,
            "ga run finished"
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            stagnated,
            cancelled,
            fitness_history,
        })
    }
}

#[cfg(feature = "parallel")]
fn evaluate<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], parallel: bool) {
    use rayon::prelude::*;

    if parallel {
        individuals.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        evaluate_serial(problem, individuals);
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], _parallel: bool) {
    evaluate_serial(problem, individuals);
}

fn evaluate_serial<P: GaProblem>(problem: &P, individuals: &mut [P::Individual]) {
    for ind in individuals.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Returns the individual with the lowest fitness.
///
/// The population is never empty: `validate` guarantees at least two.
fn find_best<I: Individual>(population: &[I]) -> &I {
    let mut best = &population[0];
    for ind in &population[1..] {
        if ind.fitness() < best.fitness() {
            best = ind;
        }
    }
    best
}
