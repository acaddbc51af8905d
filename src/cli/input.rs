//! JSON graph input
//!
//! ```json
//! {
//!   "directed": false,
//!   "nodes": ["isolated"],
//!   "edges": [
//!     { "source": "a", "target": "b", "weight": 4.0 },
//!     { "source": "b", "target": "c" }
//!   ]
//! }
//! ```
//!
//! Node order is the `nodes` list followed by first appearance in `edges`.
//! A missing weight means 1.

use std::path::Path;

use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, Graph, NodeIndex, UnGraph};
use petgraph::EdgeType;
use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphFile {
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// A loaded graph; petgraph fixes directedness in the type.
pub enum LoadedGraph {
    Undirected(UnGraph<String, f64>),
    Directed(DiGraph<String, f64>),
}

impl LoadedGraph {
    pub fn node_count(&self) -> usize {
        match self {
            LoadedGraph::Undirected(g) => g.node_count(),
            LoadedGraph::Directed(g) => g.node_count(),
        }
    }

    pub fn edge_count(&self) -> usize {
        match self {
            LoadedGraph::Undirected(g) => g.edge_count(),
            LoadedGraph::Directed(g) => g.edge_count(),
        }
    }
}

/// Read and build a graph from a JSON file
pub fn load_graph(path: &Path) -> Result<LoadedGraph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph file {}", path.display()))?;
    parse_graph(&content).with_context(|| format!("Invalid graph file {}", path.display()))
}

pub fn parse_graph(content: &str) -> Result<LoadedGraph> {
    let file: GraphFile = serde_json::from_str(content)?;
    Ok(if file.directed {
        LoadedGraph::Directed(build(&file))
    } else {
        LoadedGraph::Undirected(build(&file))
    })
}

fn build<Ty: EdgeType>(file: &GraphFile) -> Graph<String, f64, Ty> {
    let mut graph = Graph::with_capacity(file.nodes.len(), file.edges.len());
    let mut index: FxHashMap<&str, NodeIndex> = FxHashMap::default();

    let labels = file.nodes.iter().map(String::as_str).chain(
        file.edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()]),
    );
    for label in labels {
        index
            .entry(label)
            .or_insert_with(|| graph.add_node(label.to_string()));
    }

    for edge in &file.edges {
        let src = index[edge.source.as_str()];
        let dst = index[edge.target.as_str()];
        graph.add_edge(src, dst, edge.weight);
    }
    graph
}
