//! Laplacian centrality for weighted and directed graphs
//!
//! The Laplacian centrality of a node is the relative drop in the graph's
//! Laplacian energy (sum of squared Laplacian eigenvalues) when that node and
//! its edges are deleted:
//!
//! ```text
//! C(i) = (E(G) - E(G - i)) / E(G)
//! ```
//!
//! Qi, X., Fuller, E., Wu, Q., Wu, Y., and Zhang, C.-Q. (2012). Laplacian
//! centrality: A new centrality measure for weighted networks. Information
//! Sciences, 194:240-253.
//!
//! # Example
//!
//! ```
//! use laplacian_centrality::{laplacian_centrality, CentralityOptions, NodeSubset};
//! use petgraph::graph::UnGraph;
//!
//! let mut graph = UnGraph::<&str, f64>::new_undirected();
//! let a = graph.add_node("a");
//! let b = graph.add_node("b");
//! let c = graph.add_node("c");
//! graph.add_edge(a, b, 1.0);
//! graph.add_edge(b, c, 1.0);
//!
//! let scores = laplacian_centrality(&graph, &CentralityOptions::default(), &NodeSubset::All).unwrap();
//! assert!((scores["b"] - 1.0).abs() < 1e-9);
//! assert!((scores["a"] - 0.6).abs() < 1e-9);
//! ```

pub mod centrality;
pub mod config;
pub mod directed;
pub mod energy;
mod errors;
pub mod graph;
pub mod laplacian;
pub mod reduction;

#[cfg(test)]
pub(crate) mod test_support;

pub use centrality::{
    laplacian_centrality, CentralityOptions, CentralityScores, NodeSubset, UnnormalizedScore,
};
pub use config::{CentralityConfig, ConfigError};
pub use directed::{DirectedLaplacianConfig, WalkType};
pub use energy::{DenseEigenSolver, EnergyBackend, SpectralEnergy, TraceEnergy};
pub use errors::{CentralityError, CentralityResult, NodeTarget};
pub use graph::EdgeWeight;
