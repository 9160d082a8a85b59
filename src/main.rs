use std::sync::Arc;

use arbloop::algo::cost::{EqualCostFunction, TimeCostFunction};
use arbloop::algo::dijkstra::DijkstraShortestPath;
use arbloop::algo::johnson::{CycleFinder, JohnsonNodeCycleFinder};
use arbloop::algo::NamedAlgorithm;
use arbloop::arb::execution::{PathExecutor, SimplePathExecutor};
use arbloop::arb::fitness::{FitnessFunction, ProfitFitness, ProfitPerSecondFitness};
use arbloop::arb::search::{ArbitrageSearch, SimpleArbitrageSearch};
use arbloop::config::Config;
use arbloop::graph::{Edge, Vertex};
use arbloop::market::factory::{OrderBookRateSource, RateSource};
use arbloop::market::model::{FinancialModel, FinancialModelConfig};
use arbloop::market::order_book::OrderBookCache;
use arbloop::market::trade::{AmountLimitTradeAuthorizer, HumanInputTradeAuthorizer};
use arbloop::market::{Bps, CurrencyVertex, FinancialGraph};
use arbloop::utils::logger::setup_logger;
use clap::{Parser, Subcommand, ValueEnum};
use eyre::{eyre, Error, Result};
use itertools::Itertools;
use log::{info, warn};
use tokio::sync::RwLock;

/// Cycle arbitrage search over a currency model
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every arbitrage cycle in the model
    Search {
        /// Show at most this many cycles
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// How cycles are ranked
        #[arg(long, value_enum, default_value_t = FitnessArg::Profit)]
        fitness: FitnessArg,
    },
    /// Show the best arbitrage cycle
    Best {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the cycles through one vertex
    Cycles {
        /// Vertex id, e.g. GDAXUSD
        vertex: String,
    },
    /// Find the shortest path between two vertices
    Path {
        /// Source vertex id
        from: String,
        /// Target vertex id
        to: String,
        /// Weigh edges instead of counting hops
        #[arg(long, value_enum)]
        weighted: Option<WeightArg>,
    },
    /// Trade along the best cycle
    Execute {
        /// Approve trades up to this size without asking
        #[arg(long)]
        max_trade_bps: Option<Bps>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FitnessArg {
    /// Raw profit
    Profit,
    /// Profit per second of expected latency
    ProfitPerSecond,
}

impl FitnessArg {
    fn function(self) -> Arc<dyn FitnessFunction> {
        match self {
            Self::Profit => Arc::new(ProfitFitness),
            Self::ProfitPerSecond => Arc::new(ProfitPerSecondFitness),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum WeightArg {
    /// Expected latency
    Time,
}

/// Loads the model, fills its order book caches and prices every edge once.
async fn load_graph(config: &Config) -> Result<FinancialGraph, Error> {
    let model_config = FinancialModelConfig::from_path(&config.model_path)?;

    let mut source = OrderBookRateSource::new();
    for (exchange, books) in &model_config.order_books {
        let mut cache = OrderBookCache::new(exchange.clone(), books.keys().cloned().collect());
        cache.set_connected(true);
        for (product, book) in books {
            cache.apply_snapshot(product, book.clone())?;
        }
        source = source.with_exchange(exchange.clone(), Arc::new(RwLock::new(cache)));
    }
    let source: Arc<dyn RateSource> = Arc::new(source);

    let model = FinancialModel::build(&model_config, &source)?;
    info!(
        "Loaded {} with {} vertices and {} edges",
        config.model_path.display(),
        model.vertices().len(),
        model.edge_count()
    );

    let mut loader = model.into_loader();
    loader.refresh().await?;
    for edge in loader.offline_edges() {
        warn!("Edge {} has no rate", edge.id());
    }
    Ok(loader.graph().clone())
}

/// Looks a vertex up by id.
fn find_vertex<'a>(graph: &'a FinancialGraph, id: &str) -> Result<&'a CurrencyVertex, Error> {
    graph
        .vertex_index(id)
        .map(|index| &graph.vertices()[index])
        .ok_or_else(|| eyre!("no vertex with id {id}"))
}

/// Vertex labels joined by `->`.
fn path_name(path: &FinancialGraph) -> String {
    path.vertices().iter().map(Vertex::label).join("->")
}

fn run_search(
    graph: &FinancialGraph,
    limit: Option<usize>,
    json: bool,
    fitness: FitnessArg,
) -> Result<(), Error> {
    let search = SimpleArbitrageSearch::with_fitness(fitness.function());
    info!("Running {} ({})", search.name(), search.complexity_order());
    let paths = search.find_paths(graph)?;
    let shown = &paths[..limit.unwrap_or(paths.len()).min(paths.len())];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
    } else {
        println!("Found {} cycles", paths.len());
        for (rank, path) in shown.iter().enumerate() {
            println!("{:>4}. {path}", rank + 1);
        }
    }
    Ok(())
}

fn run_best(graph: &FinancialGraph, json: bool) -> Result<(), Error> {
    match SimpleArbitrageSearch::default().find_best_path(graph)? {
        Some(best) if json => println!("{}", serde_json::to_string_pretty(&best)?),
        Some(best) => println!("{best}"),
        None => println!("No cycles found"),
    }
    Ok(())
}

fn run_cycles(graph: &FinancialGraph, vertex: &str) -> Result<(), Error> {
    let start = find_vertex(graph, vertex)?;
    let cycles = JohnsonNodeCycleFinder::new(start).find_cycles(graph)?;
    println!("Found {} cycles through {}", cycles.len(), start.label());
    for cycle in &cycles {
        println!("  {}->{}", path_name(cycle), start.label());
    }
    Ok(())
}

fn run_path(
    graph: &FinancialGraph,
    from: &str,
    to: &str,
    weighted: Option<WeightArg>,
) -> Result<(), Error> {
    let from = find_vertex(graph, from)?;
    let to = find_vertex(graph, to)?;
    let path = match weighted {
        None => DijkstraShortestPath::new(EqualCostFunction).find_path(graph, to, from)?,
        Some(WeightArg::Time) => {
            DijkstraShortestPath::weighted(TimeCostFunction).find_path(graph, to, from)?
        }
    };

    if path.is_empty() {
        println!("No path from {} to {}", from.label(), to.label());
    } else {
        println!("{}", path_name(&path));
        for edge in path.edges() {
            println!("  {edge}");
        }
    }
    Ok(())
}

async fn run_execute(graph: &FinancialGraph, max_trade_bps: Option<Bps>) -> Result<(), Error> {
    let Some(best) = SimpleArbitrageSearch::default().find_best_path(graph)? else {
        println!("No cycles found");
        return Ok(());
    };
    println!("Executing {best}");

    let start = best.start_vertex();
    let amount = start.start_amount_bps();
    let executed = match max_trade_bps {
        Some(max) => {
            SimplePathExecutor::new(AmountLimitTradeAuthorizer::new(max))
                .execute(best.path(), start, amount)
                .await?
        }
        None => {
            SimplePathExecutor::new(HumanInputTradeAuthorizer::stdin())
                .execute(best.path(), start, amount)
                .await?
        }
    };
    println!("{}", serde_json::to_string_pretty(&executed)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_logger()?;

    let config = Config::from_env()?;
    let cli = Cli::parse();
    let graph = load_graph(&config).await?;

    match cli.command {
        Some(Commands::Search {
            limit,
            json,
            fitness,
        }) => run_search(&graph, limit, json, fitness)?,
        Some(Commands::Best { json }) => run_best(&graph, json)?,
        Some(Commands::Cycles { vertex }) => run_cycles(&graph, &vertex)?,
        Some(Commands::Path { from, to, weighted }) => run_path(&graph, &from, &to, weighted)?,
        Some(Commands::Execute { max_trade_bps }) => {
            run_execute(&graph, max_trade_bps.or(config.max_trade_bps)).await?;
        }
        None => run_search(&graph, None, false, FitnessArg::Profit)?,
    }

    Ok(())
}
