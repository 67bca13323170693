//! Scenario files.
//!
//! A scenario bundles a network, inventory data and per-algorithm settings
//! in one JSON or TOML document. Every section is optional; missing
//! sections take their defaults.
//!
//! ```toml
//! depot = "nairobi"
//!
//! [[nodes]]
//! id = "nairobi"
//! location = { lat = -1.2921, lng = 36.8219 }
//! weight = 10.0
//!
//! [annealing]
//! iterations = 2000
//! seed = 7
//! ```

use crate::error::{Error, Result};
use crate::facility::PMedianConfig;
use crate::flow::GreedyFlowConfig;
use crate::heuristic::{AnnealingParams, GeneticParams};
use crate::inventory::{EchelonFacility, InventoryItem, NewsvendorItem};
use crate::network::{Network, Node, Objective, Route};
use crate::routing::{RoutingConfig, Stop};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything one optimization session needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub nodes: Vec<Node>,
    pub routes: Vec<Route>,
    /// Depot for routing. Defaults to the first node.
    pub depot: Option<String>,
    /// Weighted objectives for the volume heuristics. Empty means total cost.
    pub objectives: Vec<Objective>,
    pub inventory: Vec<InventoryItem>,
    /// Single-period items for the newsvendor model.
    pub newsvendor: Vec<NewsvendorItem>,
    pub facilities: Vec<EchelonFacility>,
    /// Service level for multi-echelon stock, in `(0, 1)`.
    pub service_level: Option<f64>,
    pub annealing: AnnealingParams,
    pub genetic: GeneticParams,
    pub greedy: GreedyFlowConfig,
    pub routing: RoutingConfig,
    pub p_median: PMedianConfig,
}

impl Scenario {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Loads a scenario, picking the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let scenario = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            other => {
                return Err(Error::Parse(format!(
                    "unsupported scenario extension {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                )))
            }
        };
        tracing::debug!(
            path = %path.display(),
            nodes = scenario.nodes.len(),
            routes = scenario.routes.len(),
            items = scenario.inventory.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks records and every algorithm section.
    pub fn validate(&self) -> Result<()> {
        self.network()?;
        self.annealing.validate()?;
        self.genetic.validate()?;
        self.greedy.validate()?;
        self.routing.validate()?;
        self.p_median.validate()?;
        if let Some(level) = self.service_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "service_level must be in (0, 1), got {level}"
                )));
            }
        }
        Ok(())
    }

    /// Builds the validated network of nodes and routes.
    pub fn network(&self) -> Result<Network> {
        Network::from_parts(self.nodes.clone(), self.routes.clone())
    }

    pub fn stops(&self) -> Vec<Stop> {
        self.nodes.iter().map(Stop::from).collect()
    }

    /// The configured depot, or the first node's id.
    pub fn depot_id(&self) -> Option<&str> {
        self.depot
            .as_deref()
            .or_else(|| self.nodes.first().map(|n| n.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOML: &str = r#"
depot = "nairobi"

[[nodes]]
id = "nairobi"
kind = "distribution_center"
location = { lat = -1.2921, lng = 36.8219 }
weight = 10.0

[[nodes]]
id = "mombasa"
location = { lat = -4.0435, lng = 39.6682 }
demand = 120.0

[[routes]]
id = "nbo-mba"
from = "nairobi"
to = "mombasa"
volume = 80.0
cost = 12.0
mode = "rail"

[[inventory]]
id = "maize"
annual_demand = 5000.0
ordering_cost = 200.0
holding_rate = 0.2
unit_cost = 35.0
lead_time_days = 10.0
service_level_pct = 95.0

[[inventory.discount_tiers]]
min_quantity = 0.0
unit_price = 35.0

[[inventory.discount_tiers]]
min_quantity = 1000.0
unit_price = 33.0

[[newsvendor]]
id = "bread"
selling_price = 60.0
unit_cost = 35.0
salvage_value = 10.0
demand_mean = 400.0
demand_std_dev = 80.0

[p_median]
facilities = 1

[annealing]
iterations = 500
schedule = "linear"
seed = 7

[routing]
vehicles = 2
"#;

    #[test]
    fn test_toml_scenario() {
        let s = Scenario::from_toml_str(TOML).unwrap();
        assert_eq!(s.nodes.len(), 2);
        assert_eq!(s.routes[0].volume, 80.0);
        assert_eq!(s.annealing.iterations, 500);
        assert_eq!(s.annealing.seed, Some(7));
        // Unset fields keep their defaults.
        assert_eq!(s.annealing.cooling_rate, 0.95);
        assert_eq!(s.routing.vehicles, 2);
        assert_eq!(s.routing.cost_per_km, 2.5);
        assert_eq!(s.depot_id(), Some("nairobi"));
        assert_eq!(s.stops()[1].demand, Some(120.0));
        assert_eq!(s.inventory[0].discount_tiers.len(), 2);
        assert_eq!(s.inventory[0].discount_tiers[1].unit_price, 33.0);
        assert_eq!(s.newsvendor[0].id, "bread");
        assert_eq!(s.p_median.facilities, 1);
        assert_eq!(s.p_median.cost_per_unit_km, 10.0);
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let s = Scenario::from_toml_str(TOML).unwrap();
        let json = s.to_json_string().unwrap();

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let loaded = Scenario::from_path(file.path()).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_unknown_route_endpoint_rejected() {
        let bad = r#"{
            "nodes": [{ "id": "a", "location": { "lat": 0.0, "lng": 0.0 } }],
            "routes": [{ "id": "r", "from": "a", "to": "b" }]
        }"#;
        assert!(matches!(
            Scenario::from_json_str(bad),
            Err(Error::UnknownNode(ref id)) if id == "b"
        ));
    }

    #[test]
    fn test_bad_section_rejected() {
        let bad = r#"{ "annealing": { "iterations": 0 } }"#;
        assert!(matches!(
            Scenario::from_json_str(bad),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Scenario::from_json_str("{ not json"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_bad_p_median_rejected() {
        let bad = r#"{ "p_median": { "facilities": 0 } }"#;
        assert!(matches!(
            Scenario::from_json_str(bad),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(Scenario::from_path(file.path()), Err(Error::Parse(_))));
    }
}
