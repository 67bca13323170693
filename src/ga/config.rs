//! GA configuration.

use super::selection::Selection;
use crate::error::{Error, Result};

/// Configuration for the Genetic Algorithm.
///
/// ```
/// use u_supplynet::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_selection(Selection::Rank)
///     .with_elite_count(2)
///     .with_mutation_rate(0.2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    pub selection: Selection,

    /// Fraction of the population copied unchanged into the next generation.
    pub elite_ratio: f64,

    /// Probability of applying crossover to a pair of parents.
    ///
    /// When crossover is not applied, a clone of the first parent is used.
    pub crossover_rate: f64,

    /// Probability of handing an offspring to [`GaProblem::mutate`](super::GaProblem::mutate).
    pub mutation_rate: f64,

    /// Generations without improvement before stopping. 0 disables.
    pub stagnation_limit: usize,

    /// Evaluate in parallel with rayon. Ignored without the `parallel` feature.
    pub parallel: bool,

    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            selection: Selection::default(),
            elite_ratio: 0.1,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            stagnation_limit: 50,
            parallel: cfg!(feature = "parallel"),
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite ratio from an absolute count against the current
    /// population size. Call after [`with_population_size`](Self::with_population_size).
    pub fn with_elite_count(self, count: usize) -> Self {
        let ratio = count as f64 / self.population_size.max(1) as f64;
        self.with_elite_ratio(ratio)
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of elites carried over each generation.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_ratio).round() as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(Error::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        if self.elite_count() >= self.population_size {
            return Err(Error::InvalidConfig(
                "elite_ratio too high: elites fill entire population".into(),
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err(Error::InvalidConfig("tournament size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert_eq!(config.elite_count(), 10);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_elite_count_builder() {
        let config = GaConfig::default()
            .with_population_size(50)
            .with_elite_count(2);
        assert_eq!(config.elite_count(), 2);
    }

    #[test]
    fn test_validate() {
        assert!(GaConfig::default().validate().is_ok());
        assert!(GaConfig::default().with_population_size(1).validate().is_err());
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
        assert!(GaConfig::default()
            .with_population_size(10)
            .with_elite_ratio(1.0)
            .validate()
            .is_err());
        assert!(GaConfig::default()
            .with_selection(Selection::Tournament(0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_elite_ratio(1.5)
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);

        assert!((config.elite_ratio - 1.0).abs() < 1e-10);
        assert!(config.crossover_rate.abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }
}
