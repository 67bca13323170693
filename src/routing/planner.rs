//! Depot tour construction and vehicle assignment.
//!
//! 1. Nearest-neighbor tour from the depot over haversine distances.
//! 2. Simulated annealing with 2-opt segment reversal; the depot stays at
//!    position 0.
//! 3. The improved giant tour is cut into consecutive vehicle segments.
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"
//! - Beasley (1983), "Route first, cluster second methods for vehicle routing"

use super::types::{Leg, RoutePlan, RouteStats, RoutingConfig, Stop, VehicleRoute};
use crate::error::{Error, Result};
use crate::geo::{distance_matrix, GeoPoint, Metric};
use crate::sa::{SaProblem, SaRunner};
use rand::Rng;
use std::collections::HashSet;
use std::time::Instant;

/// Distance-minimizing tour over a fixed matrix. Index 0 of every solution
/// is the depot.
struct TourProblem<'a> {
    dist: &'a [Vec<f64>],
    start: Vec<usize>,
    closed: bool,
}

impl TourProblem<'_> {
    fn length(&self, tour: &[usize]) -> f64 {
        tour_length(self.dist, tour, self.closed)
    }
}

impl SaProblem for TourProblem<'_> {
    type Solution = Vec<usize>;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Vec<usize> {
        self.start.clone()
    }

    fn cost(&self, tour: &Vec<usize>) -> f64 {
        self.length(tour)
    }

    fn neighbor<R: Rng>(&self, tour: &Vec<usize>, rng: &mut R) -> Vec<usize> {
        let mut next = tour.clone();
        let n = next.len();
        let i = rng.random_range(1..n);
        let j = rng.random_range(1..n);
        let (lo, hi) = (i.min(j), i.max(j));
        next[lo..=hi].reverse();
        next
    }
}

fn tour_length(dist: &[Vec<f64>], tour: &[usize], closed: bool) -> f64 {
    let open: f64 = tour.windows(2).map(|w| dist[w[0]][w[1]]).sum();
    match (closed, tour.first(), tour.last()) {
        (true, Some(&first), Some(&last)) => open + dist[last][first],
        _ => open,
    }
}

/// Greedy tour: always drive to the closest unvisited stop.
fn nearest_neighbor(dist: &[Vec<f64>], depot: usize) -> Vec<usize> {
    let n = dist.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);
    let mut current = depot;
    visited[depot] = true;
    tour.push(depot);

    while tour.len() < n {
        let next = (0..n)
            .filter(|&j| !visited[j])
            .min_by(|&a, &b| dist[current][a].total_cmp(&dist[current][b]));
        let Some(next) = next else { break };
        visited[next] = true;
        tour.push(next);
        current = next;
    }
    tour
}

/// Length of a depot-anchored segment over `customers`.
fn segment_length(dist: &[Vec<f64>], depot: usize, customers: &[usize], closed: bool) -> f64 {
    let Some((&first, _)) = customers.split_first() else {
        return 0.0;
    };
    let inner: f64 = customers.windows(2).map(|w| dist[w[0]][w[1]]).sum();
    let back = match customers.last() {
        Some(&last) if closed => dist[last][depot],
        _ => 0.0,
    };
    dist[depot][first] + inner + back
}

/// Cuts the customer sequence into consecutive segments.
///
/// With a distance cap, a segment grows while it stays within the cap; a
/// stop that breaks the cap on its own still gets a segment. Without one,
/// customers are spread evenly over the fleet.
fn split_tour(
    dist: &[Vec<f64>],
    depot: usize,
    customers: &[usize],
    config: &RoutingConfig,
) -> Vec<Vec<usize>> {
    if customers.is_empty() {
        return Vec::new();
    }
    match config.max_distance_km {
        Some(cap) => {
            let mut segments = Vec::new();
            let mut current: Vec<usize> = Vec::new();
            for &c in customers {
                current.push(c);
                if current.len() > 1
                    && segment_length(dist, depot, &current, config.return_to_depot) > cap
                {
                    current.pop();
                    segments.push(std::mem::replace(&mut current, vec![c]));
                }
            }
            segments.push(current);
            segments
        }
        None => {
            let k = config.vehicles.min(customers.len());
            let base = customers.len() / k;
            let extra = customers.len() % k;
            let mut segments = Vec::with_capacity(k);
            let mut start = 0;
            for v in 0..k {
                let len = base + usize::from(v < extra);
                segments.push(customers[start..start + len].to_vec());
                start += len;
            }
            segments
        }
    }
}

/// Plans delivery routes from `depot_id` to every other stop.
///
/// An unknown depot id falls back to the first stop.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `stops` is empty
/// - [`Error::InvalidInput`] for a stop with invalid coordinates
/// - [`Error::DuplicateId`] if two stops share an id
/// - [`Error::InvalidConfig`] if `config` fails validation
/// - [`Error::Infeasible`] if the distance cap needs more vehicles than
///   the fleet has
pub fn plan_routes(stops: &[Stop], depot_id: &str, config: &RoutingConfig) -> Result<RoutePlan> {
    let started = Instant::now();
    if stops.is_empty() {
        return Err(Error::EmptyInput("routing needs at least one stop"));
    }
    config.validate()?;
    let mut seen = HashSet::new();
    for stop in stops {
        if !stop.location.is_valid() {
            return Err(Error::InvalidInput(format!(
                "stop {} has invalid coordinates",
                stop.id
            )));
        }
        if !seen.insert(stop.id.as_str()) {
            return Err(Error::DuplicateId(stop.id.clone()));
        }
    }

    let depot = match stops.iter().position(|s| s.id == depot_id) {
        Some(i) => i,
        None => {
            tracing::warn!(depot = depot_id, fallback = %stops[0].id, "unknown depot, using first stop");
            0
        }
    };

    let points: Vec<GeoPoint> = stops.iter().map(|s| s.location).collect();
    let dist = distance_matrix(&points, Metric::Haversine);
    let closed = config.return_to_depot;

    let start = nearest_neighbor(&dist, depot);
    let initial_tour_km = tour_length(&dist, &start, closed);

    let tour = if start.len() >= 3 {
        let problem = TourProblem {
            dist: &dist,
            start,
            closed,
        };
        let result = SaRunner::run(&problem, &config.sa)?;
        result.best
    } else {
        start
    };
    let improved_tour_km = tour_length(&dist, &tour, closed);

    let segments = split_tour(&dist, depot, &tour[1..], config);
    if segments.len() > config.vehicles {
        return Err(Error::Infeasible(format!(
            "{} vehicles needed under a {:?} km cap, {} available",
            segments.len(),
            config.max_distance_km,
            config.vehicles
        )));
    }

    let vehicles: Vec<VehicleRoute> = segments
        .iter()
        .enumerate()
        .map(|(v, customers)| build_vehicle_route(v + 1, stops, &dist, depot, customers, closed))
        .collect();

    let total_distance_km: f64 = vehicles.iter().map(|v| v.distance_km).sum();
    let stats = RouteStats {
        total_distance_km,
        max_route_distance_km: vehicles.iter().map(|v| v.distance_km).fold(0.0, f64::max),
        vehicles_used: vehicles.len(),
        total_cost: total_distance_km * config.cost_per_km,
        total_time_h: total_distance_km / config.avg_speed_kmh,
        initial_tour_km,
        improved_tour_km,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };

    tracing::debug!(
        stops = stops.len(),
        vehicles = stats.vehicles_used,
        initial_tour_km,
        improved_tour_km,
        total_distance_km,
        "routes planned"
    );

    Ok(RoutePlan {
        depot: stops[depot].id.clone(),
        vehicles,
        stats,
    })
}

fn build_vehicle_route(
    vehicle_id: usize,
    stops: &[Stop],
    dist: &[Vec<f64>],
    depot: usize,
    customers: &[usize],
    closed: bool,
) -> VehicleRoute {
    let mut path = Vec::with_capacity(customers.len() + 2);
    path.push(depot);
    path.extend_from_slice(customers);
    if closed {
        path.push(depot);
    }

    let legs: Vec<Leg> = path
        .windows(2)
        .map(|w| Leg {
            from: stops[w[0]].id.clone(),
            to: stops[w[1]].id.clone(),
            distance_km: dist[w[0]][w[1]],
            demand: stops[w[1]].demand,
        })
        .collect();

    VehicleRoute {
        vehicle_id,
        stops: path.iter().map(|&i| stops[i].id.clone()).collect(),
        distance_km: legs.iter().map(|l| l.distance_km).sum(),
        legs,
    }
}
