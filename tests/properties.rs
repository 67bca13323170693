use proptest::prelude::*;
use proptest::test_runner::Config;
use std::collections::HashMap;
use u_supplynet::cog::{center_of_gravity, CogMethod};
use u_supplynet::facility::{p_median, PMedianConfig};
use u_supplynet::flow::{greedy_assign, FlowGraph, GreedyFlowConfig};
use u_supplynet::geo::GeoPoint;
use u_supplynet::heuristic::{anneal_route_volumes, AnnealingParams, MIN_ROUTE_VOLUME};
use u_supplynet::inventory::{economic_order_quantity, relevant_cost, z_score, InventoryItem};
use u_supplynet::network::{Node, Route};
use u_supplynet::routing::{plan_routes, RoutingConfig, Stop};

fn weighted_points() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((-4.5..4.5f64, 34.0..41.5f64, 0.5..50.0f64), 1..30)
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn centroid_is_weighted_mean(points in weighted_points()) {
        let nodes: Vec<Node> = points
            .iter()
            .enumerate()
            .map(|(i, &(lat, lng, w))| Node::new(format!("n{i}"), GeoPoint::new(lat, lng)).with_weight(w))
            .collect();
        let total: f64 = points.iter().map(|p| p.2).sum();
        let lat = points.iter().map(|p| p.0 * p.2).sum::<f64>() / total;
        let lng = points.iter().map(|p| p.1 * p.2).sum::<f64>() / total;

        let r = center_of_gravity(&nodes, CogMethod::WeightedCentroid).expect("valid nodes");
        prop_assert!((r.center.lat - lat).abs() < 1e-9);
        prop_assert!((r.center.lng - lng).abs() < 1e-9);
    }

    #[test]
    fn p_median_never_worse_with_more_sites(points in weighted_points(), p in 1usize..5) {
        let nodes: Vec<Node> = points
            .iter()
            .enumerate()
            .map(|(i, &(lat, lng, d))| Node::new(format!("n{i}"), GeoPoint::new(lat, lng)).with_demand(d))
            .collect();
        let fewer = p_median(&nodes, &nodes, &PMedianConfig::default().with_facilities(p))
            .expect("valid nodes");
        let more = p_median(&nodes, &nodes, &PMedianConfig::default().with_facilities(p + 1))
            .expect("valid nodes");

        prop_assert!(fewer.facilities.len() <= p);
        prop_assert!(more.total_weighted_distance_km <= fewer.total_weighted_distance_km);
        for (a, b) in fewer.facilities.iter().zip(&more.facilities) {
            prop_assert_eq!(&a.id, &b.id);
        }
    }

    #[test]
    fn greedy_volumes_within_bounds(
        costs in prop::collection::vec(0.0..5000.0f64, 1..40),
        jitter_seed in prop::option::of(any::<u64>()),
    ) {
        let routes: Vec<Route> = costs
            .iter()
            .enumerate()
            .map(|(i, &c)| Route::new(format!("r{i}"), format!("a{i}"), format!("b{i}"), 0.0, c))
            .collect();
        let mut config = GreedyFlowConfig::default();
        if let Some(seed) = jitter_seed {
            config = config.with_jitter(Some(seed));
        }
        let out = greedy_assign(&routes, &config).expect("valid routes");

        prop_assert_eq!(out.len(), routes.len());
        for r in &out {
            prop_assert!(r.volume >= config.floor && r.volume <= config.cap);
            prop_assert!(r.is_optimized);
        }
        prop_assert!(out.windows(2).all(|w| w[0].cost <= w[1].cost));
    }

    #[test]
    fn eoq_minimizes_relevant_cost(
        demand in 1.0..1e6f64,
        ordering in 1.0..1e4f64,
        rate in 0.01..0.9f64,
        unit in 0.1..1e4f64,
        factor in 0.05..20.0f64,
    ) {
        let item = InventoryItem::new("sku", demand, unit)
            .with_ordering_cost(ordering)
            .with_holding_rate(rate);
        let q = economic_order_quantity(&item).expect("valid item").economic_order_quantity;
        let best = relevant_cost(&item, q);
        prop_assert!(relevant_cost(&item, q * factor) >= best * (1.0 - 1e-12));
    }

    #[test]
    fn z_score_is_antisymmetric(p in 0.001..0.999f64) {
        let lo = z_score(p).expect("in range");
        let hi = z_score(1.0 - p).expect("in range");
        prop_assert!((lo + hi).abs() < 1e-6);
        prop_assert_eq!(lo < 0.0, p < 0.5);
    }
}

proptest! {
    #![proptest_config(Config::with_cases(24))]

    #[test]
    fn annealing_respects_volume_floor(
        lanes in prop::collection::vec((10.0..500.0f64, 0.5..40.0f64), 1..25),
        seed in any::<u64>(),
    ) {
        let routes: Vec<Route> = lanes
            .iter()
            .enumerate()
            .map(|(i, &(v, c))| Route::new(format!("r{i}"), "dc", format!("s{i}"), v.round(), c))
            .collect();
        let params = AnnealingParams::default().with_iterations(200).with_seed(seed);
        let out = anneal_route_volumes(&routes, &params, &[]).expect("valid routes");

        prop_assert!(out.routes.iter().all(|r| r.volume >= MIN_ROUTE_VOLUME));
        prop_assert!(out.best_energy <= out.initial_energy + 1e-9);
        prop_assert!(out.improvement_pct >= -1e-9);
    }

    #[test]
    fn min_cost_flow_conserves_and_respects_capacity(
        width in 1usize..5,
        arcs in prop::collection::vec((1.0..30.0f64, 0.0..10.0f64), 2 * 4 + 4 * 4),
    ) {
        let mut g = FlowGraph::new();
        g.add_node("s");
        g.add_node("t");
        for i in 0..width {
            g.add_node(format!("a{i}"));
            g.add_node(format!("b{i}"));
        }
        let mut next = arcs.iter().cycle();
        let mut id = 0usize;
        let mut edges: Vec<(String, String)> = Vec::new();
        for i in 0..width {
            edges.push(("s".into(), format!("a{i}")));
            edges.push((format!("b{i}"), "t".into()));
            for j in 0..width {
                edges.push((format!("a{i}"), format!("b{j}")));
            }
        }
        for (from, to) in &edges {
            let &(cap, cost) = next.next().expect("cycled");
            g.add_arc(format!("e{id}"), from, to, cap, cost).expect("known nodes");
            id += 1;
        }

        let sol = g.max_flow_min_cost("s", "t").expect("bounded");
        let mut balance: HashMap<&str, f64> = HashMap::new();
        let mut cost = 0.0;
        for a in &sol.arc_flows {
            prop_assert!(a.flow >= -1e-9 && a.flow <= a.capacity + 1e-9);
            *balance.entry(a.from.as_str()).or_default() -= a.flow;
            *balance.entry(a.to.as_str()).or_default() += a.flow;
            cost += a.flow * a.cost;
        }
        for (node, b) in &balance {
            match *node {
                "s" => prop_assert!((b + sol.flow_value).abs() < 1e-6),
                "t" => prop_assert!((b - sol.flow_value).abs() < 1e-6),
                _ => prop_assert!(b.abs() < 1e-6, "node {} unbalanced by {}", node, b),
            }
        }
        prop_assert!((cost - sol.total_cost).abs() < 1e-6);
    }

    #[test]
    fn routing_visits_every_stop_once(
        points in weighted_points(),
        vehicles in 1usize..4,
        seed in any::<u64>(),
    ) {
        let stops: Vec<Stop> = points
            .iter()
            .enumerate()
            .map(|(i, &(lat, lng, d))| Stop::new(format!("s{i}"), GeoPoint::new(lat, lng)).with_demand(d))
            .collect();
        let config = RoutingConfig::default()
            .with_vehicles(vehicles)
            .with_sa(
                u_supplynet::sa::SaConfig::default()
                    .with_initial_temperature(50.0)
                    .with_min_temperature(0.1)
                    .with_iterations_per_temperature(20)
                    .with_seed(seed),
            );
        let plan = plan_routes(&stops, "s0", &config).expect("feasible");

        let mut seen: Vec<&str> = plan
            .vehicles
            .iter()
            .flat_map(|v| v.stops[1..v.stops.len() - 1].iter().map(String::as_str))
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<String> = stops[1..].iter().map(|s| s.id.clone()).collect();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert!(plan.vehicles.len() <= vehicles);
    }
}
