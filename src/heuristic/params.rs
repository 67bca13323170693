//! Parameters for the route-volume heuristics.

use crate::error::{Error, Result};
use crate::ga::{GaConfig, Selection};
use crate::sa::{Acceptance, CoolingSchedule, SaConfig};

/// Temperature floor handed to the SA runner.
///
/// The volume heuristics run for a fixed number of iterations; the floor
/// only stops a run whose geometric cooling has underflowed.
const TEMPERATURE_FLOOR: f64 = 1e-300;

/// How the temperature falls from one iteration to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VolumeCooling {
    /// `T *= cooling_rate` every iteration.
    #[default]
    Exponential,
    /// `T = T0 * (1 - k / iterations)`.
    Linear,
    /// `T = T0 / (1 + ln(1 + k))`.
    Logarithmic,
}

/// Simulated annealing over route volumes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnealingParams {
    pub initial_temperature: f64,
    /// Geometric factor for [`VolumeCooling::Exponential`].
    pub cooling_rate: f64,
    pub iterations: usize,
    pub schedule: VolumeCooling,
    pub acceptance: Acceptance,
    /// Percentage of routes touched per move, in `(0, 100]`.
    pub neighborhood_size: f64,
    pub seed: Option<u64>,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.95,
            iterations: 1000,
            schedule: VolumeCooling::default(),
            acceptance: Acceptance::default(),
            neighborhood_size: 10.0,
            seed: None,
        }
    }
}

impl AnnealingParams {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_schedule(mut self, schedule: VolumeCooling) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_neighborhood_size(mut self, percent: f64) -> Self {
        self.neighborhood_size = percent;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be at least 1".into()));
        }
        if !(self.neighborhood_size > 0.0 && self.neighborhood_size <= 100.0) {
            return Err(Error::InvalidConfig(format!(
                "neighborhood_size must be in (0, 100], got {}",
                self.neighborhood_size
            )));
        }
        self.to_sa_config().validate()
    }

    /// One SA iteration per temperature step, bounded by `iterations`.
    pub fn to_sa_config(&self) -> SaConfig {
        let cooling = match self.schedule {
            VolumeCooling::Exponential => CoolingSchedule::Geometric {
                alpha: self.cooling_rate,
            },
            VolumeCooling::Linear => CoolingSchedule::Linear,
            VolumeCooling::Logarithmic => CoolingSchedule::Logarithmic,
        };
        let config = SaConfig::default()
            .with_initial_temperature(self.initial_temperature)
            .with_min_temperature(TEMPERATURE_FLOOR)
            .with_cooling(cooling)
            .with_acceptance(self.acceptance)
            .with_iterations_per_temperature(1)
            .with_max_iterations(self.iterations);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

/// Genetic algorithm over route volumes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneticParams {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    /// Per-route probability of a ±20 % volume adjustment.
    pub mutation_rate: f64,
    pub elitism_count: usize,
    pub selection: Selection,
    pub seed: Option<u64>,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            elitism_count: 2,
            selection: Selection::Tournament(3),
            seed: None,
        }
    }
}

impl GeneticParams {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(Error::InvalidConfig(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        self.to_ga_config().validate()
    }

    /// Every non-elite child goes through `mutate`; the per-route
    /// `mutation_rate` is applied inside the problem.
    pub fn to_ga_config(&self) -> GaConfig {
        let config = GaConfig::default()
            .with_population_size(self.population_size)
            .with_max_generations(self.generations)
            .with_selection(self.selection)
            .with_elite_count(self.elitism_count)
            .with_crossover_rate(self.crossover_rate)
            .with_mutation_rate(1.0)
            .with_stagnation_limit(0);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}
