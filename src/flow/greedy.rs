//! Cost-ordered greedy flow assignment.

use crate::error::{Error, Result};
use crate::network::Route;
use crate::random::rng_from;
use rand::Rng;
use std::collections::HashSet;

/// Settings for [`greedy_assign`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreedyFlowConfig {
    /// Volume scale: a route costing `c` may draw up to `budget / c` units.
    pub budget: f64,
    /// Volume every route receives regardless of cost.
    pub floor: f64,
    /// Upper bound on any single route's volume.
    pub cap: f64,
    /// Draw a uniform share of the allowance instead of all of it.
    pub jitter: bool,
    pub seed: Option<u64>,
}

impl Default for GreedyFlowConfig {
    fn default() -> Self {
        Self {
            budget: 10_000.0,
            floor: 50.0,
            cap: 1000.0,
            jitter: false,
            seed: None,
        }
    }
}

impl GreedyFlowConfig {
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_jitter(mut self, seed: Option<u64>) -> Self {
        self.jitter = true;
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("budget", self.budget), ("floor", self.floor), ("cap", self.cap)] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        if self.floor > self.cap {
            return Err(Error::InvalidConfig(format!(
                "floor {} exceeds cap {}",
                self.floor, self.cap
            )));
        }
        Ok(())
    }
}

/// Assigns volume to routes cheapest first.
///
/// Routes are returned sorted by ascending cost (ties keep input order),
/// each flagged optimized with volume `min(floor + draw, cap)`. The draw
/// is the full allowance `round(budget / max(cost, 1))`, or a uniform
/// integer below it when `jitter` is set.
///
/// Routes spanning fewer than two distinct nodes are returned unchanged.
pub fn greedy_assign(routes: &[Route], config: &GreedyFlowConfig) -> Result<Vec<Route>> {
    config.validate()?;
    routes.iter().try_for_each(Route::validate)?;

    let endpoints: HashSet<&str> = routes
        .iter()
        .flat_map(|r| [r.from.as_str(), r.to.as_str()])
        .collect();
    if endpoints.len() < 2 {
        tracing::debug!(routes = routes.len(), "greedy flow skipped: fewer than two nodes");
        return Ok(routes.to_vec());
    }

    let mut rng = config.jitter.then(|| rng_from(config.seed));
    let mut assigned = routes.to_vec();
    assigned.sort_by(|a, b| a.cost.total_cmp(&b.cost));

    for route in assigned.iter_mut() {
        let allowance = (config.budget / route.cost.max(1.0)).round();
        let draw = match rng.as_mut() {
            Some(rng) if allowance >= 1.0 => rng.random_range(0..allowance as u64) as f64,
            Some(_) => 0.0,
            None => allowance,
        };
        route.volume = (config.floor + draw).min(config.cap);
        route.is_optimized = true;
    }

    tracing::debug!(
        routes = assigned.len(),
        jitter = config.jitter,
        "greedy flow assigned"
    );
    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Vec<Route> {
        vec![
            Route::new("far", "a", "c", 0.0, 400.0),
            Route::new("near", "a", "b", 0.0, 20.0),
            Route::new("mid", "b", "c", 0.0, 100.0),
            Route::new("free", "c", "a", 0.0, 0.0),
        ]
    }

    #[test]
    fn test_sorted_by_cost_and_flagged() {
        let out = greedy_assign(&routes(), &GreedyFlowConfig::default()).unwrap();
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["free", "near", "mid", "far"]);
        assert!(out.iter().all(|r| r.is_optimized));
    }

    #[test]
    fn test_proportional_volumes() {
        let out = greedy_assign(&routes(), &GreedyFlowConfig::default()).unwrap();
        // free: 50 + 10000 capped; near: 50 + 500; mid: 50 + 100; far: 50 + 25
        let volumes: Vec<f64> = out.iter().map(|r| r.volume).collect();
        assert_eq!(volumes, [1000.0, 550.0, 150.0, 75.0]);
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let config = GreedyFlowConfig::default().with_jitter(Some(9));
        let out = greedy_assign(&routes(), &config).unwrap();
        for r in &out {
            assert!(r.volume >= config.floor && r.volume <= config.cap, "{}", r.volume);
        }
        let again = greedy_assign(&routes(), &config).unwrap();
        assert_eq!(out, again);
    }

    #[test]
    fn test_single_node_unchanged() {
        let loops = vec![Route::new("loop", "a", "a", 7.0, 3.0)];
        let out = greedy_assign(&loops, &GreedyFlowConfig::default()).unwrap();
        assert_eq!(out, loops);
        assert!(greedy_assign(&[], &GreedyFlowConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_floor_above_cap_rejected() {
        let config = GreedyFlowConfig::default().with_floor(2000.0);
        assert!(matches!(
            greedy_assign(&routes(), &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
