//! Command-line front end: runs one algorithm against a scenario file and
//! prints the result as JSON.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use u_supplynet::cog::{center_of_gravity, CogMethod};
use u_supplynet::facility::p_median;
use u_supplynet::flow::{greedy_assign, FlowGraph, FlowSummary};
use u_supplynet::heuristic::{anneal_route_volumes, evolve_route_volumes};
use u_supplynet::inventory::{
    abc_analysis, economic_order_quantity, multi_echelon, newsvendor, quantity_discount_eoq,
    InventoryMetrics,
};
use u_supplynet::network::{bottlenecks, flow_efficiency, CostSeed, Network};
use u_supplynet::routing::plan_routes;
use u_supplynet::scenario::Scenario;

#[derive(Parser)]
#[command(name = "supplynet")]
#[command(version, about = "Supply-chain network heuristics", long_about = None)]
struct Cli {
    /// Scenario file (.json or .toml)
    #[arg(global = true, short = 's', long = "scenario", value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Override every seed in the scenario
    #[arg(global = true, long)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Single-line JSON output
    #[arg(global = true, long)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum CogArg {
    Centroid,
    Median,
}

#[derive(Clone, Copy, ValueEnum)]
enum FlowArg {
    Greedy,
    MinCost,
}

#[derive(Subcommand)]
enum Commands {
    /// Site a facility at the nodes' center of gravity
    Cog {
        #[arg(long, value_enum, default_value = "centroid")]
        method: CogArg,
    },

    /// Open facilities among the nodes with a greedy p-median
    Facility {
        /// Facilities to open; overrides the scenario
        #[arg(short = 'p', long)]
        facilities: Option<usize>,
    },

    /// Re-balance route volumes with simulated annealing
    Anneal,

    /// Re-balance route volumes with a genetic algorithm
    Evolve,

    /// Assign network flow
    Flow {
        #[arg(long, value_enum, default_value = "greedy")]
        method: FlowArg,
        /// Source node for min-cost flow
        #[arg(long)]
        source: Option<String>,
        /// Sink node for min-cost flow
        #[arg(long)]
        sink: Option<String>,
        /// Units to send; omitted means maximum flow
        #[arg(long)]
        demand: Option<f64>,
    },

    /// Plan depot routes through every node
    Route,

    /// EOQ, price breaks, ABC classes, newsvendor and multi-echelon stock
    Eoq,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "u_supplynet=debug" } else { "u_supplynet=warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .context("failed to create log filter")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
    Ok(())
}

fn load(cli: &Cli) -> Result<Scenario> {
    let Some(path) = cli.scenario.as_ref() else {
        bail!("a scenario file is required (--scenario PATH)");
    };
    let mut scenario = Scenario::from_path(path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    if let Some(seed) = cli.seed {
        scenario.annealing.seed = Some(seed);
        scenario.genetic.seed = Some(seed);
        scenario.greedy.seed = Some(seed);
        scenario.routing.sa.seed = Some(seed);
    }
    Ok(scenario)
}

/// The scenario's network, or a fully connected one over its nodes when
/// it lists no routes.
fn network(scenario: &Scenario, seed: CostSeed) -> Result<Network> {
    let network = if scenario.routes.is_empty() {
        Network::fully_connected(scenario.nodes.clone(), seed)?
    } else {
        scenario.network()?
    };
    Ok(network)
}

fn run(cli: &Cli) -> Result<serde_json::Value> {
    let scenario = load(cli)?;
    let heuristic_seed = CostSeed::Heuristic {
        seed: scenario.annealing.seed.unwrap_or(0),
    };

    let output = match &cli.command {
        Commands::Cog { method } => {
            let method = match method {
                CogArg::Centroid => CogMethod::WeightedCentroid,
                CogArg::Median => CogMethod::geometric_median(),
            };
            json!(center_of_gravity(&scenario.nodes, method)?)
        }
        Commands::Facility { facilities } => {
            let mut config = scenario.p_median.clone();
            if let Some(p) = facilities {
                config = config.with_facilities(*p);
            }
            // Every node is a candidate site; nodes without demand count as 1.
            json!(p_median(&scenario.nodes, &scenario.nodes, &config)?)
        }
        Commands::Anneal => {
            let net = network(&scenario, heuristic_seed)?;
            json!(anneal_route_volumes(
                net.routes(),
                &scenario.annealing,
                &scenario.objectives
            )?)
        }
        Commands::Evolve => {
            let net = network(&scenario, heuristic_seed)?;
            json!(evolve_route_volumes(
                net.routes(),
                &scenario.genetic,
                &scenario.objectives
            )?)
        }
        Commands::Flow {
            method: FlowArg::Greedy,
            ..
        } => {
            let mut net = network(&scenario, CostSeed::Flow)?;
            let routes = greedy_assign(net.routes(), &scenario.greedy)?;
            net.set_routes(routes)?;
            json!({
                "routes": net.routes(),
                "efficiency": flow_efficiency(net.routes()),
                "bottlenecks": bottlenecks(&net, 0.9),
            })
        }
        Commands::Flow {
            method: FlowArg::MinCost,
            source,
            sink,
            demand,
        } => {
            let (Some(source), Some(sink)) = (source, sink) else {
                bail!("min-cost flow needs --source and --sink");
            };
            let graph = FlowGraph::from_network(&scenario.network()?)?;
            let solution = match demand {
                Some(d) => graph.min_cost_flow(source, sink, *d)?,
                None => graph.max_flow_min_cost(source, sink)?,
            };
            json!({
                "summary": FlowSummary::from_solution(&solution),
                "solution": solution,
            })
        }
        Commands::Route => {
            let Some(depot) = scenario.depot_id() else {
                bail!("routing needs at least one node");
            };
            let plan = plan_routes(&scenario.stops(), depot, &scenario.routing)?;
            json!({
                "routes": plan.to_routes(&scenario.routing),
                "plan": plan,
            })
        }
        Commands::Eoq => {
            let items = scenario
                .inventory
                .iter()
                .map(|item| {
                    let eoq = economic_order_quantity(item)?;
                    let discount = if item.discount_tiers.is_empty() {
                        None
                    } else {
                        Some(quantity_discount_eoq(item)?)
                    };
                    Ok(json!({
                        "id": item.id,
                        "eoq": eoq,
                        "discount": discount,
                        "metrics": InventoryMetrics::for_item(item, &eoq),
                    }))
                })
                .collect::<u_supplynet::Result<Vec<_>>>()?;
            let abc = if scenario.inventory.is_empty() {
                None
            } else {
                Some(abc_analysis(&scenario.inventory)?)
            };
            let echelons =
                multi_echelon(&scenario.facilities, scenario.service_level.unwrap_or(0.95))?;
            let perishables = scenario
                .newsvendor
                .iter()
                .map(|item| Ok(json!({ "id": item.id, "result": newsvendor(item)? })))
                .collect::<u_supplynet::Result<Vec<_>>>()?;
            json!({
                "items": items,
                "abc": abc,
                "newsvendor": perishables,
                "echelons": echelons,
            })
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let output = run(&cli)?;
    let text = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{text}");
    Ok(())
}
