//! Min-cost flow by successive shortest augmenting paths.
//!
//! Each augmentation finds the cheapest source-to-sink path in the residual
//! graph with Bellman-Ford (reverse arcs carry negative cost) and pushes
//! the path's bottleneck capacity along it.
//!
//! # References
//!
//! - Ahuja, Magnanti & Orlin (1993), "Network Flows", ch. 9
//! - Busacker & Gowen (1960), successive shortest path algorithm

use crate::error::{Error, Result};
use crate::network::{Network, Route};
use std::collections::HashMap;

const EPS: f64 = 1e-9;

/// Utilization at or above which an arc counts as a bottleneck.
pub const BOTTLENECK_UTILIZATION: f64 = 0.9;

/// A residual edge. Edge `2k` is arc `k`, edge `2k + 1` its reverse.
#[derive(Debug, Clone)]
struct Edge {
    to: usize,
    residual: f64,
    cost: f64,
}

/// A directed arc as registered by the caller.
#[derive(Debug, Clone)]
struct ArcSpec {
    id: String,
    from: usize,
    to: usize,
    capacity: f64,
    cost: f64,
}

/// Directed graph of capacitated, unit-costed arcs between named nodes.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    arcs: Vec<ArcSpec>,
}

/// Flow carried by one arc.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcFlow {
    pub id: String,
    pub from: String,
    pub to: String,
    pub flow: f64,
    pub capacity: f64,
    pub cost: f64,
}

impl ArcFlow {
    /// `flow / capacity`, or 0 for arcs without finite positive capacity.
    pub fn utilization(&self) -> f64 {
        if self.capacity.is_finite() && self.capacity > 0.0 {
            self.flow / self.capacity
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowSolution {
    pub flow_value: f64,
    pub total_cost: f64,
    /// One entry per arc, in insertion order.
    pub arc_flows: Vec<ArcFlow>,
}

impl FlowSolution {
    /// Writes arc flows onto routes with matching ids and flags them optimized.
    ///
    /// Returns the number of routes updated.
    pub fn apply(&self, routes: &mut [Route]) -> usize {
        let flows: HashMap<&str, f64> = self
            .arc_flows
            .iter()
            .map(|a| (a.id.as_str(), a.flow))
            .collect();
        let mut updated = 0;
        for route in routes.iter_mut() {
            if let Some(&flow) = flows.get(route.id.as_str()) {
                route.volume = flow;
                route.is_optimized = true;
                updated += 1;
            }
        }
        updated
    }
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node, returning its index. Re-adding an id is a no-op.
    pub fn add_node(&mut self, id: impl Into<String>) -> usize {
        let id = id.into();
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(id.clone(), i);
        self.nodes.push(id);
        i
    }

    fn lookup(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }

    /// Adds a directed arc between two registered nodes.
    ///
    /// `capacity` may be `f64::INFINITY`; `cost` must be finite and
    /// non-negative.
    pub fn add_arc(
        &mut self,
        id: impl Into<String>,
        from: &str,
        to: &str,
        capacity: f64,
        cost: f64,
    ) -> Result<()> {
        let id = id.into();
        let from = self.lookup(from)?;
        let to = self.lookup(to)?;
        if capacity.is_nan() || capacity < 0.0 {
            return Err(Error::InvalidInput(format!(
                "arc {id} has invalid capacity {capacity}"
            )));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(Error::InvalidInput(format!("arc {id} has invalid cost {cost}")));
        }
        if self.arcs.iter().any(|a| a.id == id) {
            return Err(Error::DuplicateId(id));
        }
        self.arcs.push(ArcSpec {
            id,
            from,
            to,
            capacity,
            cost,
        });
        Ok(())
    }

    /// One arc per route.
    ///
    /// Arc capacity is the destination node's capacity when it has one,
    /// otherwise the route's current volume. Arc cost is the route's unit
    /// cost.
    pub fn from_network(network: &Network) -> Result<Self> {
        let mut graph = Self::new();
        for node in network.nodes() {
            graph.add_node(node.id.clone());
        }
        for route in network.routes() {
            let capacity = network
                .node(&route.to)
                .and_then(|n| n.capacity)
                .unwrap_or(route.volume);
            graph.add_arc(route.id.clone(), &route.from, &route.to, capacity, route.cost)?;
        }
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Sends exactly `demand` units from `source` to `sink` at minimum cost.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownNode`] if either endpoint is not registered
    /// - [`Error::Infeasible`] if the network cannot carry `demand`
    pub fn min_cost_flow(&self, source: &str, sink: &str, demand: f64) -> Result<FlowSolution> {
        if !demand.is_finite() || demand < 0.0 {
            return Err(Error::InvalidInput(format!("invalid demand {demand}")));
        }
        let solution = self.solve(source, sink, demand)?;
        if solution.flow_value + EPS < demand {
            return Err(Error::Infeasible(format!(
                "demand {demand} exceeds max flow {} from {source} to {sink}",
                solution.flow_value
            )));
        }
        Ok(solution)
    }

    /// Sends as much flow as possible, choosing the cheapest among maximum flows.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownNode`] if either endpoint is not registered
    /// - [`Error::Infeasible`] if a path of unbounded capacity exists
    pub fn max_flow_min_cost(&self, source: &str, sink: &str) -> Result<FlowSolution> {
        self.solve(source, sink, f64::INFINITY)
    }

    fn solve(&self, source: &str, sink: &str, limit: f64) -> Result<FlowSolution> {
        let s = self.lookup(source)?;
        let t = self.lookup(sink)?;

        let mut edges = Vec::with_capacity(self.arcs.len() * 2);
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for arc in &self.arcs {
            adjacency[arc.from].push(edges.len());
            edges.push(Edge {
                to: arc.to,
                residual: arc.capacity,
                cost: arc.cost,
            });
            adjacency[arc.to].push(edges.len());
            edges.push(Edge {
                to: arc.from,
                residual: 0.0,
                cost: -arc.cost,
            });
        }

        let mut flow_value = 0.0;
        let mut total_cost = 0.0;
        let mut augmentations = 0usize;

        while s != t && flow_value + EPS < limit {
            let Some(path) = shortest_path(&edges, &adjacency, s, t) else {
                break;
            };
            let bottleneck = path
                .iter()
                .map(|&e| edges[e].residual)
                .fold(limit - flow_value, f64::min);
            if bottleneck.is_infinite() {
                return Err(Error::Infeasible(format!(
                    "unbounded flow from {source} to {sink}"
                )));
            }
            for &e in &path {
                edges[e].residual -= bottleneck;
                edges[e ^ 1].residual += bottleneck;
                total_cost += bottleneck * edges[e].cost;
            }
            flow_value += bottleneck;
            augmentations += 1;
            tracing::trace!(augmentations, bottleneck, flow_value, "augmented");
        }

        let arc_flows = self
            .arcs
            .iter()
            .enumerate()
            .map(|(k, arc)| ArcFlow {
                id: arc.id.clone(),
                from: self.nodes[arc.from].clone(),
                to: self.nodes[arc.to].clone(),
                flow: edges[2 * k + 1].residual,
                capacity: arc.capacity,
                cost: arc.cost,
            })
            .collect();

        tracing::debug!(
            source,
            sink,
            flow_value,
            total_cost,
            augmentations,
            "min-cost flow solved"
        );
        Ok(FlowSolution {
            flow_value,
            total_cost,
            arc_flows,
        })
    }
}

/// Cheapest `s -> t` path over edges with residual capacity, as edge indices.
fn shortest_path(edges: &[Edge], adjacency: &[Vec<usize>], s: usize, t: usize) -> Option<Vec<usize>> {
    let n = adjacency.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut via: Vec<Option<usize>> = vec![None; n];
    dist[s] = 0.0;

    for _ in 1..n.max(2) {
        let mut changed = false;
        for u in 0..n {
            if dist[u].is_infinite() {
                continue;
            }
            for &e in &adjacency[u] {
                let edge = &edges[e];
                if edge.residual > EPS && dist[u] + edge.cost + EPS < dist[edge.to] {
                    dist[edge.to] = dist[u] + edge.cost;
                    via[edge.to] = Some(e);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    if dist[t].is_infinite() {
        return None;
    }
    let mut path = Vec::new();
    let mut v = t;
    while v != s {
        let e = via[v]?;
        path.push(e);
        v = edges[e ^ 1].to;
    }
    path.reverse();
    Some(path)
}

/// Headline numbers of a flow solution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowSummary {
    pub throughput: f64,
    pub total_cost: f64,
    /// Arcs at or above [`BOTTLENECK_UTILIZATION`].
    pub bottleneck_arcs: usize,
    /// Mean utilization over arcs carrying flow.
    pub mean_utilization: f64,
}

impl FlowSummary {
    pub fn from_solution(solution: &FlowSolution) -> Self {
        let used: Vec<f64> = solution
            .arc_flows
            .iter()
            .filter(|a| a.flow > EPS)
            .map(ArcFlow::utilization)
            .collect();
        let mean_utilization = if used.is_empty() {
            0.0
        } else {
            used.iter().sum::<f64>() / used.len() as f64
        };
        Self {
            throughput: solution.flow_value,
            total_cost: solution.total_cost,
            bottleneck_arcs: solution
                .arc_flows
                .iter()
                .filter(|a| a.utilization() >= BOTTLENECK_UTILIZATION)
                .count(),
            mean_utilization,
        }
    }
}
