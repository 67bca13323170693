//! Parent selection strategies.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use super::types::{Fitness, Individual};
use rand::Rng;

/// Selection strategy for choosing parents. Assumes minimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Selection {
    /// Pick `k` individuals at random (with replacement), keep the best.
    Tournament(usize),

    /// Fitness-proportionate selection on inverted fitness
    /// `max - f + 1`, so the cheapest solution gets the largest slice.
    Roulette,

    /// Linear ranking: the best of `n` gets weight `n`, the worst 1.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Roulette => roulette(population, rng),
            Selection::Rank => rank(population, rng),
        }
    }
}

fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

fn roulette<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let fitnesses: Vec<f64> = population.iter().map(|i| i.fitness().to_f64()).collect();
    let max_fitness = fitnesses.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max_fitness.is_finite() {
        return rng.random_range(0..n);
    }

    let weights: Vec<f64> = fitnesses.iter().map(|&f| max_fitness - f + 1.0).collect();
    let total: f64 = weights.iter().sum();

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    n - 1 // floating-point fallback
}

fn rank<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        population[a]
            .fitness()
            .partial_cmp(&population[b].fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (position, &idx) in order.iter().enumerate() {
        cumulative += (n - position) as f64;
        if cumulative > threshold {
            return idx;
        }
    }
    order[n - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[derive(Clone)]
    struct Plan {
        cost: f64,
    }

    impl Individual for Plan {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.cost
        }
        fn set_fitness(&mut self, f: f64) {
            self.cost = f;
        }
    }

    fn plans(costs: &[f64]) -> Vec<Plan> {
        costs.iter().map(|&cost| Plan { cost }).collect()
    }

    fn counts(sel: Selection, pop: &[Plan]) -> Vec<u32> {
        let mut rng = create_rng(42);
        let mut counts = vec![0u32; pop.len()];
        for _ in 0..10_000 {
            counts[sel.select(pop, &mut rng)] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_cheapest() {
        let c = counts(Selection::Tournament(4), &plans(&[10.0, 5.0, 1.0, 8.0]));
        assert!(c[2] > 6000, "got {c:?}");
    }

    #[test]
    fn test_tournament_size_1_is_uniform() {
        let c = counts(Selection::Tournament(1), &plans(&[10.0, 5.0, 1.0, 8.0]));
        assert!(c.iter().all(|&n| n > 1500), "got {c:?}");
    }

    #[test]
    fn test_roulette_favors_cheapest() {
        let c = counts(Selection::Roulette, &plans(&[100.0, 50.0, 1.0, 80.0]));
        assert!(c[2] > c[0], "got {c:?}");
    }

    #[test]
    fn test_rank_favors_cheapest() {
        let c = counts(Selection::Rank, &plans(&[100.0, 50.0, 1.0, 80.0]));
        assert!(c[2] > c[0], "got {c:?}");
    }

    #[test]
    fn test_single_individual() {
        let pop = plans(&[5.0]);
        let mut rng = create_rng(1);
        assert_eq!(Selection::Tournament(3).select(&pop, &mut rng), 0);
        assert_eq!(Selection::Roulette.select(&pop, &mut rng), 0);
        assert_eq!(Selection::Rank.select(&pop, &mut rng), 0);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<Plan> = vec![];
        let mut rng = create_rng(1);
        Selection::Tournament(3).select(&pop, &mut rng);
    }
}
