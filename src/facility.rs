//! Multi-facility siting.
//!
//! Greedy add heuristic for the p-median problem: open candidates one at
//! a time, each round taking the site that most reduces the
//! demand-weighted great-circle distance to the nearest open facility.
//! Stops early once no remaining candidate helps.
//!
//! # References
//!
//! - Kuehn & Hamburger (1963), "A Heuristic Program for Locating
//!   Warehouses"
//! - Hakimi (1964), "Optimum Locations of Switching Centers and the
//!   Absolute Centers and Medians of a Graph"

use crate::error::{Error, Result};
use crate::geo::{haversine_km, GeoPoint};
use crate::network::Node;

/// Configuration for [`p_median`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PMedianConfig {
    /// Facilities to open. Capped at the number of candidates.
    pub facilities: usize,
    /// Transport cost per unit of demand per kilometre.
    pub cost_per_unit_km: f64,
}

impl Default for PMedianConfig {
    fn default() -> Self {
        Self {
            facilities: 3,
            cost_per_unit_km: 10.0,
        }
    }
}

impl PMedianConfig {
    pub fn with_facilities(mut self, p: usize) -> Self {
        self.facilities = p;
        self
    }

    pub fn with_cost_per_unit_km(mut self, cost: f64) -> Self {
        self.cost_per_unit_km = cost;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.facilities == 0 {
            return Err(Error::InvalidConfig(
                "p-median needs at least one facility".into(),
            ));
        }
        if !(self.cost_per_unit_km.is_finite() && self.cost_per_unit_km >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "cost_per_unit_km must be finite and non-negative, got {}",
                self.cost_per_unit_km
            )));
        }
        Ok(())
    }
}

/// A demand point served by its nearest open facility.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilityAssignment {
    pub demand_id: String,
    pub facility_id: String,
    pub distance_km: f64,
    pub cost: f64,
}

/// An opened facility and the demand it serves.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilityLoad {
    pub id: String,
    pub location: GeoPoint,
    pub assigned_demand: f64,
    /// Assigned demand over capacity, in percent. `None` without a
    /// positive capacity.
    pub utilization_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PMedianResult {
    /// Opened facilities, in the order they were chosen.
    pub facilities: Vec<FacilityLoad>,
    /// One entry per demand point, in input order.
    pub assignments: Vec<FacilityAssignment>,
    /// Sum of distance times demand.
    pub total_weighted_distance_km: f64,
    pub total_cost: f64,
}

/// Demand a node places on the network. Missing demand counts as 1.
fn demand_of(node: &Node) -> f64 {
    node.demand.unwrap_or(1.0)
}

/// Opens up to `config.facilities` of `candidates` to serve `demands`.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if either slice is empty
/// - [`Error::InvalidConfig`] if `config` fails validation
/// - [`Error::InvalidInput`] for invalid coordinates or a negative or
///   non-finite demand
pub fn p_median(
    candidates: &[Node],
    demands: &[Node],
    config: &PMedianConfig,
) -> Result<PMedianResult> {
    if candidates.is_empty() {
        return Err(Error::EmptyInput("p-median needs at least one candidate"));
    }
    if demands.is_empty() {
        return Err(Error::EmptyInput("p-median needs at least one demand point"));
    }
    config.validate()?;
    for node in candidates.iter().chain(demands) {
        node.validate()?;
    }
    let weights: Vec<f64> = demands.iter().map(demand_of).collect();
    if let Some((node, w)) = demands
        .iter()
        .zip(&weights)
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(Error::InvalidInput(format!(
            "demand point {} has invalid demand {w}",
            node.id
        )));
    }

    let dist: Vec<Vec<f64>> = candidates
        .iter()
        .map(|c| {
            demands
                .iter()
                .map(|d| haversine_km(c.location, d.location))
                .collect()
        })
        .collect();

    // Distance from each demand point to its nearest open facility.
    let mut nearest = vec![f64::INFINITY; demands.len()];
    let mut current_total = f64::INFINITY;
    let mut open: Vec<usize> = Vec::new();

    while open.len() < config.facilities.min(candidates.len()) {
        let mut best: Option<(usize, f64)> = None;
        for (f, row) in dist.iter().enumerate() {
            if open.contains(&f) {
                continue;
            }
            let total: f64 = row
                .iter()
                .zip(&nearest)
                .zip(&weights)
                .map(|((&d, &n), &w)| d.min(n) * w)
                .sum();
            if best.is_none_or(|(_, t)| total < t) {
                best = Some((f, total));
            }
        }
        let Some((f, total)) = best else { break };
        if total >= current_total {
            tracing::debug!(opened = open.len(), "no remaining candidate reduces distance");
            break;
        }
        for (n, &d) in nearest.iter_mut().zip(&dist[f]) {
            *n = n.min(d);
        }
        current_total = total;
        open.push(f);
        tracing::trace!(candidate = %candidates[f].id, total, "facility opened");
    }

    let mut assigned = vec![0.0; open.len()];
    let mut assignments = Vec::with_capacity(demands.len());
    let mut total_weighted_distance_km = 0.0;
    for (j, (node, &w)) in demands.iter().zip(&weights).enumerate() {
        let mut slot = 0;
        for (k, &f) in open.iter().enumerate() {
            if dist[f][j] < dist[open[slot]][j] {
                slot = k;
            }
        }
        let distance_km = dist[open[slot]][j];
        assigned[slot] += w;
        total_weighted_distance_km += distance_km * w;
        assignments.push(FacilityAssignment {
            demand_id: node.id.clone(),
            facility_id: candidates[open[slot]].id.clone(),
            distance_km,
            cost: distance_km * w * config.cost_per_unit_km,
        });
    }

    let facilities = open
        .iter()
        .zip(assigned)
        .map(|(&f, assigned_demand)| {
            let site = &candidates[f];
            FacilityLoad {
                id: site.id.clone(),
                location: site.location,
                assigned_demand,
                utilization_pct: site
                    .capacity
                    .filter(|&c| c > 0.0)
                    .map(|c| assigned_demand / c * 100.0),
            }
        })
        .collect();

    tracing::debug!(
        opened = open.len(),
        total_weighted_distance_km,
        "p-median solved"
    );
    Ok(PMedianResult {
        facilities,
        assignments,
        total_weighted_distance_km,
        total_cost: total_weighted_distance_km * config.cost_per_unit_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: &str, lng: f64) -> Node {
        Node::new(id, GeoPoint::new(0.0, lng))
    }

    fn customer(id: &str, lng: f64, demand: f64) -> Node {
        site(id, lng).with_demand(demand)
    }

    /// Three sites on the equator; the eastern customers carry twice the demand.
    fn corridor() -> (Vec<Node>, Vec<Node>) {
        let candidates = vec![
            site("west", 0.0),
            site("middle", 5.0),
            site("east", 10.0).with_capacity(100.0),
        ];
        let demands = vec![
            customer("w1", -0.1, 10.0),
            customer("w2", 0.1, 10.0),
            customer("e1", 9.9, 20.0),
            customer("e2", 10.1, 20.0),
        ];
        (candidates, demands)
    }

    fn opened(r: &PMedianResult) -> Vec<&str> {
        r.facilities.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_single_facility_goes_to_heavier_side() {
        let (candidates, demands) = corridor();
        let r = p_median(&candidates, &demands, &PMedianConfig::default().with_facilities(1))
            .unwrap();
        assert_eq!(opened(&r), ["east"]);
        assert!(r.assignments.iter().all(|a| a.facility_id == "east"));
    }

    #[test]
    fn test_second_facility_serves_other_cluster() {
        let (candidates, demands) = corridor();
        let r = p_median(&candidates, &demands, &PMedianConfig::default().with_facilities(2))
            .unwrap();
        assert_eq!(opened(&r), ["east", "west"]);
        let served: Vec<&str> = r.assignments.iter().map(|a| a.facility_id.as_str()).collect();
        assert_eq!(served, ["west", "west", "east", "east"]);

        let east = r.facilities[0].utilization_pct.unwrap();
        assert!((east - 40.0).abs() < 1e-9, "utilization {east}");
        assert_eq!(r.facilities[1].utilization_pct, None);
        assert!((r.facilities[1].assigned_demand - 20.0).abs() < 1e-12);
        assert!((r.total_cost - r.total_weighted_distance_km * 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_stops_when_no_candidate_helps() {
        let (candidates, demands) = corridor();
        let r = p_median(&candidates, &demands, &PMedianConfig::default().with_facilities(3))
            .unwrap();
        assert_eq!(opened(&r), ["east", "west"]);
    }

    #[test]
    fn test_facility_count_capped_by_candidates() {
        let candidates = vec![site("only", 1.0)];
        let demands = vec![customer("a", 0.0, 5.0), customer("b", 2.0, 5.0)];
        let r = p_median(&candidates, &demands, &PMedianConfig::default()).unwrap();
        assert_eq!(opened(&r), ["only"]);
        assert_eq!(r.assignments.len(), 2);
    }

    #[test]
    fn test_missing_demand_counts_as_one() {
        let candidates = vec![site("hub", 0.0)];
        let demands = vec![site("a", 1.0)];
        let r = p_median(&candidates, &demands, &PMedianConfig::default()).unwrap();
        assert!((r.facilities[0].assigned_demand - 1.0).abs() < 1e-12);
        assert!((r.total_weighted_distance_km - r.assignments[0].distance_km).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        let (candidates, demands) = corridor();
        assert!(matches!(
            p_median(&[], &demands, &PMedianConfig::default()),
            Err(Error::EmptyInput(_))
        ));
        assert!(matches!(
            p_median(&candidates, &[], &PMedianConfig::default()),
            Err(Error::EmptyInput(_))
        ));
        assert!(matches!(
            p_median(&candidates, &demands, &PMedianConfig::default().with_facilities(0)),
            Err(Error::InvalidConfig(_))
        ));
        let bad = vec![customer("neg", 1.0, -3.0)];
        assert!(matches!(
            p_median(&candidates, &bad, &PMedianConfig::default()),
            Err(Error::InvalidInput(_))
        ));
    }
}
