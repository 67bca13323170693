//! Criterion benchmarks for the supply-chain heuristics.
//!
//! Networks are synthetic: nodes scattered uniformly over a box roughly
//! the size of Kenya, from a fixed seed.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_supplynet::cog::{center_of_gravity, CogMethod};
use u_supplynet::facility::{p_median, PMedianConfig};
use u_supplynet::flow::FlowGraph;
use u_supplynet::geo::GeoPoint;
use u_supplynet::heuristic::{anneal_route_volumes, AnnealingParams};
use u_supplynet::network::{CostSeed, Network, Node};
use u_supplynet::random::create_rng;
use u_supplynet::routing::{plan_routes, RoutingConfig, Stop};

fn scattered_nodes(n: usize) -> Vec<Node> {
    let mut rng = create_rng(42);
    (0..n)
        .map(|i| {
            let location = GeoPoint::new(rng.random_range(-4.5..4.5), rng.random_range(34.0..41.5));
            Node::new(format!("n{i}"), location).with_weight(rng.random_range(1.0..20.0))
        })
        .collect()
}

fn bench_cog(c: &mut Criterion) {
    let mut group = c.benchmark_group("cog_geometric_median");
    group.sample_size(20);

    for &n in &[10usize, 100, 1000] {
        let nodes = scattered_nodes(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &nodes, |b, nodes| {
            b.iter(|| black_box(center_of_gravity(black_box(nodes), CogMethod::geometric_median())))
        });
    }
    group.finish();
}

fn bench_p_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("p_median");
    group.sample_size(20);

    for &n in &[50usize, 200] {
        let nodes = scattered_nodes(n);
        let config = PMedianConfig::default().with_facilities(5);
        group.bench_with_input(BenchmarkId::from_parameter(n), &nodes, |b, nodes| {
            b.iter(|| black_box(p_median(black_box(nodes), nodes, &config)))
        });
    }
    group.finish();
}

fn bench_anneal_volumes(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_route_volumes");
    group.sample_size(10);

    for &n in &[10usize, 30, 60] {
        let network = Network::fully_connected(scattered_nodes(n), CostSeed::Heuristic { seed: 7 })
            .expect("valid bench network");
        let params = AnnealingParams::default().with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("routes{}", network.routes().len()), n),
            &(network, params),
            |b, (net, params)| {
                b.iter(|| black_box(anneal_route_volumes(black_box(net.routes()), params, &[])))
            },
        );
    }
    group.finish();
}

/// Layered graph: source -> `width` x `depth` grid -> sink.
fn layered_graph(width: usize, depth: usize) -> FlowGraph {
    let mut rng = create_rng(3);
    let mut g = FlowGraph::new();
    g.add_node("s");
    g.add_node("t");
    for layer in 0..depth {
        for i in 0..width {
            g.add_node(format!("{layer}:{i}"));
        }
    }
    let mut arc = 0usize;
    let mut add = |g: &mut FlowGraph, from: &str, to: &str, rng: &mut rand::rngs::StdRng| {
        arc += 1;
        g.add_arc(
            format!("a{arc}"),
            from,
            to,
            rng.random_range(5.0..50.0),
            rng.random_range(1.0..10.0),
        )
        .expect("valid bench arc");
    };
    for i in 0..width {
        add(&mut g, "s", &format!("0:{i}"), &mut rng);
        add(&mut g, &format!("{}:{i}", depth - 1), "t", &mut rng);
    }
    for layer in 0..depth - 1 {
        for i in 0..width {
            for j in 0..width {
                add(&mut g, &format!("{layer}:{i}"), &format!("{}:{j}", layer + 1), &mut rng);
            }
        }
    }
    g
}

fn bench_min_cost_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_flow_min_cost");
    group.sample_size(10);

    for &(width, depth) in &[(5usize, 3usize), (10, 4), (20, 4)] {
        let graph = layered_graph(width, depth);
        group.bench_with_input(
            BenchmarkId::new(format!("w{width}_d{depth}"), graph.arc_count()),
            &graph,
            |b, g| b.iter(|| black_box(g.max_flow_min_cost("s", "t"))),
        );
    }
    group.finish();
}

fn bench_plan_routes(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_routes");
    group.sample_size(10);

    for &n in &[10usize, 30, 60] {
        let stops: Vec<Stop> = scattered_nodes(n).iter().map(Stop::from).collect();
        let config = RoutingConfig::default().with_vehicles(3).with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(stops, config), |b, (s, c)| {
            b.iter(|| black_box(plan_routes(black_box(s), "n0", c)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_cog,
    bench_p_median,
    bench_anneal_volumes,
    bench_min_cost_flow,
    bench_plan_routes
);
criterion_main!(benches);
