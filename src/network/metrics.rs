//! Cost, balance and multi-objective scoring over route sets.

use super::graph::Network;
use super::types::Route;

/// Sum of `volume * cost` over all routes.
pub fn total_cost(routes: &[Route]) -> f64 {
    routes.iter().map(Route::total_cost).sum()
}

pub fn total_volume(routes: &[Route]) -> f64 {
    routes.iter().map(|r| r.volume).sum()
}

/// Mean and population standard deviation of route volumes.
fn volume_moments(routes: &[Route]) -> (f64, f64) {
    let n = routes.len().max(1) as f64;
    let mean = total_volume(routes) / n;
    let variance = routes
        .iter()
        .map(|r| {
            let d = r.volume - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// How evenly flow is spread across routes, in `[0, 100]`.
///
/// `100 * (1 - sigma / max(mean, 1))`, clamped.
pub fn flow_efficiency(routes: &[Route]) -> f64 {
    if routes.is_empty() {
        return 0.0;
    }
    let (mean, std_dev) = volume_moments(routes);
    (100.0 * (1.0 - std_dev / mean.max(1.0))).clamp(0.0, 100.0)
}

/// Metric a weighted objective can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetricKind {
    Cost,
    Volume,
    TransitTime,
    MaxVolume,
    FlowBalance,
}

/// Aggregate measurements of a route set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteMetrics {
    pub cost: f64,
    pub volume: f64,
    /// Transit time weighted by volume.
    pub transit_time: f64,
    pub max_volume: f64,
    /// `100 / (1 + sigma / max(mean, 1))`.
    pub flow_balance: f64,
}

impl RouteMetrics {
    pub fn compute(routes: &[Route]) -> Self {
        let volumes: Vec<f64> = routes.iter().map(|r| r.volume).collect();
        Self::with_volumes(routes, &volumes)
    }

    /// Measures `routes` as if route `i` carried `volumes[i]`.
    ///
    /// Lets optimizers score candidate volume vectors without cloning
    /// the routes.
    pub fn with_volumes(routes: &[Route], volumes: &[f64]) -> Self {
        debug_assert_eq!(routes.len(), volumes.len());
        let n = volumes.len().max(1) as f64;
        let volume: f64 = volumes.iter().sum();
        let mean = volume / n;
        let variance = volumes.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            cost: routes.iter().zip(volumes).map(|(r, v)| r.cost * v).sum(),
            volume,
            transit_time: routes
                .iter()
                .zip(volumes)
                .map(|(r, v)| r.transit_time.unwrap_or(0.0) * v)
                .sum(),
            max_volume: volumes.iter().copied().fold(0.0, f64::max),
            flow_balance: 100.0 / (1.0 + variance.sqrt() / mean.max(1.0)),
        }
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Cost => self.cost,
            MetricKind::Volume => self.volume,
            MetricKind::TransitTime => self.transit_time,
            MetricKind::MaxVolume => self.max_volume,
            MetricKind::FlowBalance => self.flow_balance,
        }
    }
}

/// One term of a weighted multi-objective score.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    pub metric: MetricKind,
    pub weight: f64,
    pub minimize: bool,
}

impl Objective {
    pub fn minimize(metric: MetricKind, weight: f64) -> Self {
        Self {
            metric,
            weight,
            minimize: true,
        }
    }

    pub fn maximize(metric: MetricKind, weight: f64) -> Self {
        Self {
            metric,
            weight,
            minimize: false,
        }
    }
}

/// Weighted sum of normalized metrics. Higher is better.
///
/// Minimized metrics are mapped through `100000 / (1 + v)`.
pub fn weighted_score(metrics: &RouteMetrics, objectives: &[Objective]) -> f64 {
    objectives
        .iter()
        .map(|obj| {
            let v = metrics.get(obj.metric);
            let normalized = if obj.minimize { 100_000.0 / (1.0 + v) } else { v };
            normalized * obj.weight
        })
        .sum()
}

/// Nodes whose inbound volume exceeds `threshold` of their capacity.
///
/// Nodes without a positive capacity are never bottlenecks.
pub fn bottlenecks(network: &Network, threshold: f64) -> Vec<String> {
    let inbound = network.inbound_volume();
    network
        .nodes()
        .iter()
        .filter_map(|node| {
            let capacity = node.capacity.filter(|&c| c > 0.0)?;
            let load = inbound.get(node.id.as_str()).copied().unwrap_or(0.0);
            (load / capacity > threshold).then(|| node.id.clone())
        })
        .collect()
}
