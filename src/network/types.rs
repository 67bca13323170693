//! Node and route records.

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

/// Role a location plays in the supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    Supplier,
    Factory,
    #[default]
    Warehouse,
    DistributionCenter,
    Retailer,
    Customer,
    Depot,
}

/// A location in the network.
///
/// `weight` drives center-of-gravity siting, `capacity` bounds inbound
/// volume, `demand` is the quantity a customer or retailer consumes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: NodeKind,
    pub location: GeoPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub capacity: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub demand: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<String>, location: GeoPoint) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind: NodeKind::default(),
            location,
            weight: None,
            capacity: None,
            demand: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_demand(mut self, demand: f64) -> Self {
        self.demand = Some(demand);
        self
    }

    /// Weight used for siting. Missing or zero weights count as 1.
    pub fn effective_weight(&self) -> f64 {
        match self.weight {
            Some(w) if w != 0.0 => w,
            _ => 1.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidInput("node id must not be empty".into()));
        }
        if !self.location.is_valid() {
            return Err(Error::InvalidInput(format!(
                "node {} has invalid coordinates ({}, {})",
                self.id, self.location.lat, self.location.lng
            )));
        }
        if let Some(w) = self.weight {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "node {} has invalid weight {w}",
                    self.id
                )));
            }
        }
        if let Some(c) = self.capacity {
            if !c.is_finite() || c < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "node {} has invalid capacity {c}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Transport mode of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransportMode {
    #[default]
    Road,
    Rail,
    Air,
    Sea,
}

/// A directed lane between two nodes carrying `volume` units at `cost` per unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub id: String,
    pub from: String,
    pub to: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub volume: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub transit_time: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: TransportMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_optimized: bool,
}

impl Route {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        volume: f64,
        cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            volume,
            cost,
            transit_time: None,
            mode: TransportMode::default(),
            is_optimized: false,
        }
    }

    pub fn with_transit_time(mut self, hours: f64) -> Self {
        self.transit_time = Some(hours);
        self
    }

    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Contribution of this route to the network cost.
    #[inline]
    pub fn total_cost(&self) -> f64 {
        self.volume * self.cost
    }

    pub fn validate(&self) -> Result<()> {
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(Error::InvalidInput(format!(
                "route {} has invalid volume {}",
                self.id, self.volume
            )));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(Error::InvalidInput(format!(
                "route {} has invalid cost {}",
                self.id, self.cost
            )));
        }
        Ok(())
    }
}
