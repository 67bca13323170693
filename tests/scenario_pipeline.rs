//! End-to-end runs over the bundled Kenya scenario.
#![cfg(feature = "serde")]

use std::path::PathBuf;
use u_supplynet::cog::{center_of_gravity, CogMethod};
use u_supplynet::facility::p_median;
use u_supplynet::flow::{greedy_assign, FlowGraph, FlowSummary};
use u_supplynet::heuristic::{anneal_route_volumes, evolve_route_volumes};
use u_supplynet::inventory::{
    abc_analysis, economic_order_quantity, multi_echelon, newsvendor, quantity_discount_eoq,
    AbcClass,
};
use u_supplynet::network::{bottlenecks, flow_efficiency};
use u_supplynet::routing::plan_routes;
use u_supplynet::scenario::Scenario;

fn kenya() -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/kenya.toml");
    Scenario::from_path(path).expect("bundled scenario loads")
}

#[test]
fn cog_lands_inside_kenya() {
    let s = kenya();
    for method in [CogMethod::WeightedCentroid, CogMethod::geometric_median()] {
        let r = center_of_gravity(&s.nodes, method).unwrap();
        assert!((-4.7..5.0).contains(&r.center.lat), "lat {}", r.center.lat);
        assert!((33.9..41.9).contains(&r.center.lng), "lng {}", r.center.lng);
    }
}

#[test]
fn p_median_opens_hubs_among_towns() {
    let s = kenya();
    let three = p_median(&s.nodes, &s.nodes, &s.p_median).unwrap();
    assert!(!three.facilities.is_empty() && three.facilities.len() <= 3);
    assert_eq!(three.assignments.len(), s.nodes.len());
    for site in &three.facilities {
        let own = three
            .assignments
            .iter()
            .find(|a| a.demand_id == site.id)
            .unwrap();
        assert_eq!(own.facility_id, site.id);
        assert_eq!(own.distance_km, 0.0);
    }

    let one = p_median(&s.nodes, &s.nodes, &s.p_median.clone().with_facilities(1)).unwrap();
    assert!(three.total_weighted_distance_km < one.total_weighted_distance_km);
}

#[test]
fn volume_heuristics_do_not_regress() {
    let s = kenya();
    let net = s.network().unwrap();

    let annealed = anneal_route_volumes(net.routes(), &s.annealing, &s.objectives).unwrap();
    assert!(annealed.improvement_pct >= 0.0);
    assert_eq!(annealed.routes.len(), net.routes().len());

    let evolved = evolve_route_volumes(net.routes(), &s.genetic, &[]).unwrap();
    assert!(evolved.metrics.cost <= evolved.initial_metrics.cost);
}

#[test]
fn greedy_and_exact_flow() {
    let s = kenya();
    let mut net = s.network().unwrap();
    let assigned = greedy_assign(net.routes(), &s.greedy).unwrap();
    net.set_routes(assigned).unwrap();
    assert!((0.0..=100.0).contains(&flow_efficiency(net.routes())));
    assert!(bottlenecks(&net, 0.9).len() <= net.nodes().len());

    // Kitale is reached only through Nakuru and Eldoret; its own capacity binds.
    let graph = FlowGraph::from_network(&s.network().unwrap()).unwrap();
    let sol = graph.max_flow_min_cost("mombasa", "kitale").unwrap();
    assert!((sol.flow_value - 2000.0).abs() < 1e-6);
    let sgr = sol
        .arc_flows
        .iter()
        .find(|a| a.id == "mombasa-nairobi-sgr")
        .unwrap();
    assert!((sgr.flow - 2000.0).abs() < 1e-6, "rail is the cheaper lane");
    assert!(FlowSummary::from_solution(&sol).bottleneck_arcs >= 1);
}

#[test]
fn routing_covers_every_town() {
    let s = kenya();
    let plan = plan_routes(&s.stops(), s.depot_id().unwrap(), &s.routing).unwrap();
    assert!(plan.vehicles.len() <= s.routing.vehicles);
    let visited: usize = plan.vehicles.iter().map(|v| v.stops.len() - 2).sum();
    assert_eq!(visited, s.nodes.len() - 1);
    assert_eq!(plan.to_routes(&s.routing).len(), visited + plan.vehicles.len());
}

#[test]
fn inventory_section() {
    let s = kenya();
    for item in &s.inventory {
        let r = economic_order_quantity(item).unwrap();
        assert!(r.economic_order_quantity > 0.0);
        assert!(r.reorder_point >= r.safety_stock);
    }
    let abc = abc_analysis(&s.inventory).unwrap();
    assert_eq!(abc.class_of("maize"), Some(AbcClass::A));

    let maize = s.inventory.iter().find(|i| i.id == "maize").unwrap();
    let plain = economic_order_quantity(maize).unwrap();
    let discounted = quantity_discount_eoq(maize).unwrap();
    assert_eq!(discounted.tier, 2);
    assert!(discounted.total_annual_cost < plain.total_annual_cost);

    for item in &s.newsvendor {
        let r = newsvendor(item).unwrap();
        assert!(r.critical_ratio < 0.5, "{}", item.id);
        assert!(r.order_quantity < item.demand_mean);
    }

    let levels = multi_echelon(&s.facilities, s.service_level.unwrap()).unwrap();
    assert_eq!(levels[0].id, "nairobi");
}
