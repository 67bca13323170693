//! Center-of-gravity facility siting.
//!
//! Finds a single location that minimizes weighted distance to a set of
//! nodes. Two estimators are offered:
//!
//! - **Weighted centroid**: the weighted mean of coordinates. Closed form,
//!   the classic COG answer.
//! - **Geometric median**: minimizes the weighted sum of great-circle
//!   distances via Weiszfeld's fixed-point iteration, seeded at the
//!   centroid. An iterate landing on a node keeps it only if the node
//!   passes the Vardi-Zhang optimality test, and steps off otherwise.
//!
//! # References
//!
//! - Weiszfeld (1937), "Sur le point pour lequel la somme des distances
//!   de n points donnés est minimum"
//! - Vardi & Zhang (2000), "The multivariate L1-median and associated
//!   data depth"

use crate::error::{Error, Result};
use crate::geo::{haversine_km, GeoPoint, KM_PER_DEGREE};
use crate::network::Node;

/// Estimator used by [`center_of_gravity`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CogMethod {
    WeightedCentroid,
    GeometricMedian {
        max_iterations: usize,
        /// Convergence threshold on the step length, in kilometres.
        tolerance: f64,
    },
}

impl Default for CogMethod {
    fn default() -> Self {
        CogMethod::WeightedCentroid
    }
}

impl CogMethod {
    pub fn geometric_median() -> Self {
        CogMethod::GeometricMedian {
            max_iterations: 1000,
            tolerance: 1e-6,
        }
    }
}

/// Result of a center-of-gravity calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CogResult {
    pub center: GeoPoint,
    /// Unweighted sum of distances from each node to the center.
    pub total_distance_km: f64,
    /// Sum of distance times effective weight.
    pub total_weighted_cost: f64,
    /// Weiszfeld iterations performed (0 for the centroid).
    pub iterations: usize,
}

/// Computes the center of gravity of `nodes`.
///
/// Missing or zero weights count as 1.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `nodes` is empty
/// - [`Error::InvalidInput`] for a negative or non-finite weight, or
///   invalid coordinates
pub fn center_of_gravity(nodes: &[Node], method: CogMethod) -> Result<CogResult> {
    if nodes.is_empty() {
        return Err(Error::EmptyInput("center of gravity needs at least one node"));
    }
    for node in nodes {
        node.validate()?;
    }

    let centroid = weighted_centroid(nodes);
    let (center, iterations) = match method {
        CogMethod::WeightedCentroid => (centroid, 0),
        CogMethod::GeometricMedian {
            max_iterations,
            tolerance,
        } => {
            if tolerance <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "geometric median tolerance must be positive, got {tolerance}"
                )));
            }
            weiszfeld(nodes, centroid, max_iterations, tolerance)
        }
    };

    let result = CogResult {
        center,
        total_distance_km: total_distance_km(nodes, center),
        total_weighted_cost: total_weighted_cost(nodes, center),
        iterations,
    };
    tracing::debug!(
        lat = center.lat,
        lng = center.lng,
        iterations,
        "center of gravity computed"
    );
    Ok(result)
}

fn weighted_centroid(nodes: &[Node]) -> GeoPoint {
    let mut total = 0.0;
    let mut lat = 0.0;
    let mut lng = 0.0;
    for node in nodes {
        let w = node.effective_weight();
        total += w;
        lat += node.location.lat * w;
        lng += node.location.lng * w;
    }
    GeoPoint::new(lat / total, lng / total)
}

fn weiszfeld(
    nodes: &[Node],
    start: GeoPoint,
    max_iterations: usize,
    tolerance: f64,
) -> (GeoPoint, usize) {
    let mut current = start;
    for iter in 1..=max_iterations {
        let mut num_lat = 0.0;
        let mut num_lng = 0.0;
        let mut denom = 0.0;
        // Weight of the node the iterate sits on, if any.
        let mut resident = None;

        for node in nodes {
            let d = haversine_km(current, node.location);
            if d < 1e-12 {
                *resident.get_or_insert(0.0) += node.effective_weight();
                continue;
            }
            let w = node.effective_weight() / d;
            num_lat += node.location.lat * w;
            num_lng += node.location.lng * w;
            denom += w;
        }
        if denom == 0.0 {
            return (current, iter);
        }

        let target = GeoPoint::new(num_lat / denom, num_lng / denom);
        let next = match resident {
            None => target,
            Some(weight) => {
                // A node is the median iff the pull of the others does
                // not exceed its own weight.
                let pull = resultant_pull(nodes, current);
                if pull <= weight {
                    return (current, iter);
                }
                let eta = weight / pull;
                GeoPoint::new(
                    (1.0 - eta) * target.lat + eta * current.lat,
                    (1.0 - eta) * target.lng + eta * current.lng,
                )
            }
        };

        let step = haversine_km(current, next);
        current = next;
        tracing::trace!(iter, step, "weiszfeld step");
        if step < tolerance {
            return (current, iter);
        }
    }
    (current, max_iterations)
}

/// Length of the weighted sum of unit vectors from `at` toward every
/// other node, in a local east/north plane.
fn resultant_pull(nodes: &[Node], at: GeoPoint) -> f64 {
    let east_scale = KM_PER_DEGREE * at.lat.to_radians().cos();
    let (mut east, mut north) = (0.0, 0.0);
    for node in nodes {
        let dx = (node.location.lng - at.lng) * east_scale;
        let dy = (node.location.lat - at.lat) * KM_PER_DEGREE;
        let len = dx.hypot(dy);
        if len < 1e-12 {
            continue;
        }
        east += node.effective_weight() * dx / len;
        north += node.effective_weight() * dy / len;
    }
    east.hypot(north)
}

/// Sum of great-circle distances from every node to `center`.
pub fn total_distance_km(nodes: &[Node], center: GeoPoint) -> f64 {
    nodes
        .iter()
        .map(|n| haversine_km(n.location, center))
        .sum()
}

/// Sum of great-circle distance times effective weight.
pub fn total_weighted_cost(nodes: &[Node], center: GeoPoint) -> f64 {
    nodes
        .iter()
        .map(|n| haversine_km(n.location, center) * n.effective_weight())
        .sum()
}
