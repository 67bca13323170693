//! Network container.

use super::types::{Node, Route};
use crate::error::{Error, Result};
use crate::geo::{planar_distance, KM_PER_DEGREE};
use crate::random::create_rng;
use rand::Rng;
use std::collections::HashMap;

/// How [`Network::fully_connected`] seeds route costs and volumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostSeed {
    /// Cost `round(planar * 111 * 10)`, initial volume in `[50, 150)`.
    ///
    /// Starting point for the volume heuristics.
    Heuristic { seed: u64 },
    /// Cost `round(planar * 100)`, zero volume.
    ///
    /// Starting point for greedy flow assignment.
    Flow,
}

/// Nodes plus the routes between them.
///
/// Node ids and route ids are unique. Every route endpoint refers to a
/// registered node.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: Vec<Node>,
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from parts, validating every record.
    pub fn from_parts(nodes: Vec<Node>, routes: Vec<Route>) -> Result<Self> {
        let mut network = Self::new();
        for node in nodes {
            network.add_node(node)?;
        }
        for route in routes {
            network.add_route(route)?;
        }
        Ok(network)
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        node.validate()?;
        if self.index.contains_key(&node.id) {
            return Err(Error::DuplicateId(node.id));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn add_route(&mut self, route: Route) -> Result<()> {
        route.validate()?;
        for end in [&route.from, &route.to] {
            if !self.index.contains_key(end) {
                return Err(Error::UnknownNode(end.clone()));
            }
        }
        if self.routes.iter().any(|r| r.id == route.id) {
            return Err(Error::DuplicateId(route.id));
        }
        self.routes.push(route);
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut [Route] {
        &mut self.routes
    }

    /// Replaces the routes wholesale, e.g. with an optimizer's output.
    pub fn set_routes(&mut self, routes: Vec<Route>) -> Result<()> {
        let previous = std::mem::take(&mut self.routes);
        for route in routes {
            if let Err(e) = self.add_route(route) {
                self.routes = previous;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Creates one route per unordered node pair `i < j`.
    pub fn fully_connected(nodes: Vec<Node>, seed: CostSeed) -> Result<Self> {
        let mut network = Self::from_parts(nodes, Vec::new())?;
        let mut rng = match seed {
            CostSeed::Heuristic { seed } => Some(create_rng(seed)),
            CostSeed::Flow => None,
        };

        let n = network.nodes.len();
        let mut routes = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let a = &network.nodes[i];
                let b = &network.nodes[j];
                let planar = planar_distance(a.location, b.location);
                let (cost, volume) = match rng.as_mut() {
                    Some(rng) => (
                        (planar * KM_PER_DEGREE * 10.0).round(),
                        f64::from(rng.random_range(50u32..150)),
                    ),
                    None => ((planar * 100.0).round(), 0.0),
                };
                routes.push(Route::new(
                    format!("{}-{}", a.id, b.id),
                    a.id.clone(),
                    b.id.clone(),
                    volume,
                    cost,
                ));
            }
        }
        network.routes = routes;
        tracing::debug!(nodes = n, routes = network.routes.len(), "built fully connected network");
        Ok(network)
    }

    /// Sum of volume entering each node, keyed by node id.
    pub fn inbound_volume(&self) -> HashMap<&str, f64> {
        let mut inbound: HashMap<&str, f64> = HashMap::new();
        for route in &self.routes {
            *inbound.entry(route.to.as_str()).or_default() += route.volume;
        }
        inbound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    fn kenya_nodes() -> Vec<Node> {
        vec![
            Node::new("nairobi", GeoPoint::new(-1.2921, 36.8219)),
            Node::new("mombasa", GeoPoint::new(-4.0435, 39.6682)),
            Node::new("kisumu", GeoPoint::new(-0.0917, 34.7680)),
            Node::new("nakuru", GeoPoint::new(-0.3031, 36.0800)),
        ]
    }

    #[test]
    fn test_fully_connected_pair_count() {
        let net = Network::fully_connected(kenya_nodes(), CostSeed::Flow).unwrap();
        assert_eq!(net.routes().len(), 6);
        assert!(net.routes().iter().all(|r| r.volume == 0.0));
        assert!(net.routes().iter().all(|r| r.cost > 0.0));
    }

    #[test]
    fn test_fully_connected_heuristic_volumes() {
        let net =
            Network::fully_connected(kenya_nodes(), CostSeed::Heuristic { seed: 42 }).unwrap();
        for r in net.routes() {
            assert!((50.0..150.0).contains(&r.volume), "volume {}", r.volume);
        }
    }

    #[test]
    fn test_fully_connected_is_reproducible() {
        let a = Network::fully_connected(kenya_nodes(), CostSeed::Heuristic { seed: 3 }).unwrap();
        let b = Network::fully_connected(kenya_nodes(), CostSeed::Heuristic { seed: 3 }).unwrap();
        assert_eq!(a.routes(), b.routes());
    }

    #[test]
    fn test_add_route_unknown_endpoint() {
        let mut net = Network::from_parts(kenya_nodes(), vec![]).unwrap();
        let err = net
            .add_route(Route::new("x", "nairobi", "eldoret", 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownNode(ref id) if id == "eldoret"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut net = Network::from_parts(kenya_nodes(), vec![]).unwrap();
        let dup = Node::new("nairobi", GeoPoint::new(0.0, 0.0));
        assert!(matches!(net.add_node(dup), Err(Error::DuplicateId(_))));

        net.add_route(Route::new("r1", "nairobi", "mombasa", 1.0, 1.0))
            .unwrap();
        let again = Route::new("r1", "nakuru", "kisumu", 1.0, 1.0);
        assert!(matches!(net.add_route(again), Err(Error::DuplicateId(_))));
    }

    #[test]
    fn test_set_routes_rolls_back_on_error() {
        let mut net = Network::fully_connected(kenya_nodes(), CostSeed::Flow).unwrap();
        let before = net.routes().to_vec();
        let bad = vec![Route::new("z", "nairobi", "nowhere", 1.0, 1.0)];
        assert!(net.set_routes(bad).is_err());
        assert_eq!(net.routes(), before.as_slice());
    }

    #[test]
    fn test_inbound_volume() {
        let net = Network::from_parts(
            kenya_nodes(),
            vec![
                Route::new("a", "nairobi", "mombasa", 10.0, 1.0),
                Route::new("b", "nakuru", "mombasa", 5.0, 1.0),
            ],
        )
        .unwrap();
        let inbound = net.inbound_volume();
        assert_eq!(inbound["mombasa"], 15.0);
        assert!(!inbound.contains_key("nairobi"));
    }
}
