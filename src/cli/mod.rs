//! CLI definition and handler

mod input;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use laplacian_centrality::{
    laplacian_centrality, CentralityConfig, CentralityOptions, EnergyBackend, NodeSubset,
    UnnormalizedScore, WalkType,
};
use tracing::info;

use input::LoadedGraph;

/// Parse and validate thread count (1-256)
fn parse_threads(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("threads must be at least 1".to_string())
    } else if n > 256 {
        Err("threads cannot exceed 256".to_string())
    } else {
        Ok(n)
    }
}

/// Laplacian centrality - node importance as the relative drop in Laplacian energy
#[derive(Parser, Debug)]
#[command(name = "laplacian-centrality")]
#[command(
    version,
    about = "Compute Laplacian centrality for every node of a weighted or directed graph",
    after_help = "\
Examples:
  laplacian-centrality graph.json                     Normalized scores for all nodes
  laplacian-centrality graph.json --top 10            Ten most central nodes
  laplacian-centrality graph.json --nodes a,b         Only score nodes a and b
  laplacian-centrality graph.json --raw               Deflated energy instead of a ratio
  laplacian-centrality web.json --walk-type pagerank --alpha 0.85
  laplacian-centrality graph.json --format json       JSON output for scripting

Graph file format:
  {\"directed\": false, \"nodes\": [\"x\"], \"edges\": [{\"source\": \"a\", \"target\": \"b\", \"weight\": 2.0}]}"
)]
pub struct Cli {
    /// JSON graph file
    pub graph: PathBuf,

    /// Report unnormalized scores (energy left after deleting each node)
    #[arg(long)]
    pub raw: bool,

    /// Report the unnormalized energy drop instead of the deflated energy (implies --raw)
    #[arg(long)]
    pub energy_drop: bool,

    /// Only score these nodes (comma-separated labels)
    #[arg(long, value_delimiter = ',')]
    pub nodes: Vec<String>,

    /// Random walk for directed graphs (default: chosen from graph structure)
    #[arg(long, value_parser = ["random", "lazy", "pagerank"])]
    pub walk_type: Option<String>,

    /// Teleport-free probability of the pagerank walk, in (0, 1)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Energy backend: dense (eigen-decomposition) or trace (closed form)
    #[arg(long, value_parser = ["dense", "trace"])]
    pub backend: Option<String>,

    /// Worker threads for per-node work (1-256)
    #[arg(long, value_parser = parse_threads)]
    pub threads: Option<usize>,

    /// Score nodes one at a time on the calling thread
    #[arg(long)]
    pub sequential: bool,

    /// Config file (default: ./laplacian-centrality.toml if present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Only show the N highest scores, sorted descending
    #[arg(long)]
    pub top: Option<usize>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

impl Cli {
    /// Fold CLI flags over the loaded configuration (flags win)
    fn options(&self, config: &mut CentralityConfig) -> Result<CentralityOptions> {
        if self.raw || self.energy_drop {
            config.centrality.normalized = false;
        }
        if self.energy_drop {
            config.centrality.unnormalized_score = UnnormalizedScore::EnergyDrop;
        }
        if let Some(walk_type) = &self.walk_type {
            config.directed.walk_type = Some(walk_type.parse::<WalkType>()?);
        }
        if let Some(alpha) = self.alpha {
            config.directed.alpha = alpha;
        }
        if let Some(backend) = &self.backend {
            config.centrality.energy_backend = match backend.as_str() {
                "trace" => EnergyBackend::Trace,
                _ => EnergyBackend::Dense,
            };
        }
        if let Some(threads) = self.threads {
            config.centrality.threads = Some(threads);
        }
        if self.sequential {
            config.centrality.parallel = false;
        }
        Ok(config.to_options()?)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = CentralityConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let options = cli.options(&mut config)?;

    let graph = input::load_graph(&cli.graph)?;
    info!(
        "Loaded {}: {} nodes, {} edges",
        cli.graph.display(),
        graph.node_count(),
        graph.edge_count()
    );

    let subset = if cli.nodes.is_empty() {
        NodeSubset::All
    } else {
        NodeSubset::Many(cli.nodes.clone())
    };

    let scores = match &graph {
        LoadedGraph::Undirected(g) => laplacian_centrality(g, &options, &subset),
        LoadedGraph::Directed(g) => laplacian_centrality(g, &options, &subset),
    }
    .with_context(|| format!("Failed to compute Laplacian centrality for {}", cli.graph.display()))?;

    let rendered = output::render(&scores, &cli.format, cli.top)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}
