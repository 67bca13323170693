//! SA configuration, cooling schedules and acceptance rules.

use crate::error::{Error, Result};

/// Cooling schedule for temperature reduction.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
/// - Logarithmic: Geman & Geman (1984)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    ///
    /// Most widely used. Typical `alpha`: 0.95–0.99.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling: `T_k = T_0 - k * (T_0 - T_min) / max_steps`.
    ///
    /// Fixed total duration. Temperature decreases uniformly.
    Linear,

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// One iteration per temperature step.
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (max_iter * T_0 * T_min)`.
        beta: f64,
    },

    /// Logarithmic cooling: `T_k = T_0 / (1 + ln(1 + k))`.
    ///
    /// Very slow; in practice the run is bounded by `max_iterations`.
    Logarithmic,
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

/// Rule for accepting a non-improving move of size `delta >= 0` at temperature `T`.
///
/// Strict improvements are accepted under every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Acceptance {
    /// `P = exp(-delta / T)`.
    #[default]
    Metropolis,
    /// `P = 1 / (1 + exp(delta / T))`. Equal-cost moves pass half the time.
    Glauber,
}

impl Acceptance {
    /// Probability of moving to a neighbor whose cost differs by `delta`.
    pub fn probability(self, delta: f64, temperature: f64) -> f64 {
        if delta < 0.0 {
            return 1.0;
        }
        match self {
            Acceptance::Metropolis => (-delta / temperature).exp(),
            Acceptance::Glauber => 1.0 / (1.0 + (delta / temperature).exp()),
        }
    }
}

/// Configuration for the Simulated Annealing algorithm.
///
/// # Examples
///
/// ```
/// use u_supplynet::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_min_temperature(0.001)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
///     .with_iterations_per_temperature(200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Minimum temperature. The algorithm stops when T drops below this.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Rule for accepting worsening moves.
    pub acceptance: Acceptance,

    /// Number of iterations at each temperature level.
    ///
    /// For `LundyMees`, this is ignored (1 iteration per temperature).
    pub iterations_per_temperature: usize,

    /// Maximum total iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            acceptance: Acceptance::default(),
            iterations_per_temperature: 100,
            max_iterations: 0,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));
        if self.initial_temperature.is_nan() || self.initial_temperature <= 0.0 {
            return invalid("initial_temperature must be positive".into());
        }
        if self.min_temperature.is_nan() || self.min_temperature <= 0.0 {
            return invalid("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return invalid("min_temperature must be less than initial_temperature".into());
        }
        if self.iterations_per_temperature == 0 {
            return invalid("iterations_per_temperature must be at least 1".into());
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return invalid(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 {
                    return invalid(format!("lundy-mees beta must be positive, got {beta}"));
                }
            }
            CoolingSchedule::Logarithmic => {
                if self.max_iterations == 0 {
                    return invalid("logarithmic cooling requires max_iterations".into());
                }
            }
            CoolingSchedule::Linear => {}
        }
        Ok(())
    }
}
