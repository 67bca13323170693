//! Routing inputs and results.

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::network::{Node, Route};
use crate::sa::{CoolingSchedule, SaConfig};

/// Volume assumed for a leg whose destination has no demand.
pub const DEFAULT_LEG_VOLUME: f64 = 50.0;

/// A location a vehicle visits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub location: GeoPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub demand: Option<f64>,
}

impl Stop {
    pub fn new(id: impl Into<String>, location: GeoPoint) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            location,
            demand: None,
        }
    }

    pub fn with_demand(mut self, demand: f64) -> Self {
        self.demand = Some(demand);
        self
    }
}

impl From<&Node> for Stop {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            location: node.location,
            demand: node.demand,
        }
    }
}

/// Fleet and search settings for [`plan_routes`](super::plan_routes).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Vehicles available. The plan may use fewer.
    pub vehicles: usize,
    /// Longest distance one vehicle may drive, depot return included.
    pub max_distance_km: Option<f64>,
    pub return_to_depot: bool,
    pub cost_per_km: f64,
    pub avg_speed_kmh: f64,
    /// Annealing schedule for the 2-opt tour improvement.
    pub sa: SaConfig,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            vehicles: 1,
            max_distance_km: None,
            return_to_depot: true,
            cost_per_km: 2.5,
            avg_speed_kmh: 50.0,
            sa: SaConfig::default()
                .with_initial_temperature(100.0)
                .with_min_temperature(0.01)
                .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
                .with_iterations_per_temperature(100),
        }
    }
}

impl RoutingConfig {
    pub fn with_vehicles(mut self, n: usize) -> Self {
        self.vehicles = n;
        self
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn with_return_to_depot(mut self, yes: bool) -> Self {
        self.return_to_depot = yes;
        self
    }

    pub fn with_cost_per_km(mut self, cost: f64) -> Self {
        self.cost_per_km = cost;
        self
    }

    pub fn with_avg_speed_kmh(mut self, speed: f64) -> Self {
        self.avg_speed_kmh = speed;
        self
    }

    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = sa;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sa.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.vehicles == 0 {
            return Err(Error::InvalidConfig("vehicles must be at least 1".into()));
        }
        if let Some(km) = self.max_distance_km {
            if km.is_nan() || km <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "max_distance_km must be positive, got {km}"
                )));
            }
        }
        if !self.cost_per_km.is_finite() || self.cost_per_km < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "cost_per_km must be non-negative, got {}",
                self.cost_per_km
            )));
        }
        if self.avg_speed_kmh.is_nan() || self.avg_speed_kmh <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "avg_speed_kmh must be positive, got {}",
                self.avg_speed_kmh
            )));
        }
        self.sa.validate()
    }
}

/// One driven leg.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    /// Demand of the destination stop.
    pub demand: Option<f64>,
}

/// The stops one vehicle visits, depot first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleRoute {
    pub vehicle_id: usize,
    /// Stop ids in visiting order, starting (and, for closed routes,
    /// ending) at the depot.
    pub stops: Vec<String>,
    pub legs: Vec<Leg>,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStats {
    pub total_distance_km: f64,
    pub max_route_distance_km: f64,
    pub vehicles_used: usize,
    pub total_cost: f64,
    pub total_time_h: f64,
    /// Length of the single-vehicle tour before 2-opt improvement.
    pub initial_tour_km: f64,
    /// Length of the single-vehicle tour after 2-opt improvement.
    pub improved_tour_km: f64,
    pub elapsed_ms: u64,
}

/// A multi-vehicle delivery plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePlan {
    pub depot: String,
    pub vehicles: Vec<VehicleRoute>,
    pub stats: RouteStats,
}

impl RoutePlan {
    /// Turns every leg into a network route.
    ///
    /// Cost is `distance * cost_per_km`, transit time `distance / speed`,
    /// and volume the destination's demand (or [`DEFAULT_LEG_VOLUME`]).
    /// Route ids are `v{vehicle}-{leg}`.
    pub fn to_routes(&self, config: &RoutingConfig) -> Vec<Route> {
        self.vehicles
            .iter()
            .flat_map(|vehicle| {
                vehicle.legs.iter().enumerate().map(move |(i, leg)| {
                    let mut route = Route::new(
                        format!("v{}-{}", vehicle.vehicle_id, i),
                        leg.from.clone(),
                        leg.to.clone(),
                        leg.demand.unwrap_or(DEFAULT_LEG_VOLUME),
                        leg.distance_km * config.cost_per_km,
                    )
                    .with_transit_time(leg.distance_km / config.avg_speed_kmh);
                    route.is_optimized = true;
                    route
                })
            })
            .collect()
    }
}
