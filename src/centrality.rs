// Laplacian centrality
//
// What is it?
// How much of the graph's "Laplacian energy" disappears when a node is
// deleted. Nodes holding heavily weighted, well connected parts of the graph
// together lose the most energy.
//
// The Formula:
//   C(i) = (E(G) - E(G - i)) / E(G) = 1 - E(G - i) / E(G)
//   E(G) = Σ λ²  over the eigenvalues λ of G's Laplacian
//
// Algorithm:
// 1. Map node identities to dense indices and build the Laplacian L once
// 2. If the score needs it, compute the baseline energy E(G) once
// 3. For every requested node (in parallel): deflate L, compute E(G - i)
// 4. Combine into the score and translate indices back to identities
//
// Time complexity: O(k * n³) for k requested nodes (one dense
// eigen-decomposition per node)

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;
use nalgebra::DMatrix;
use petgraph::graph::{Graph, IndexType};
use petgraph::EdgeType;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::directed::DirectedLaplacianConfig;
use crate::energy::{EnergyBackend, SpectralEnergy};
use crate::errors::{CentralityError, CentralityResult, NodeTarget};
use crate::graph::{EdgeWeight, IndexedGraph};
use crate::laplacian::build_laplacian;
use crate::reduction::deflate;

/// Scores keyed by node identity, in visit order.
pub type CentralityScores<N> = IndexMap<N, f64>;

/// Which nodes receive a score. Normalization always uses the full graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeSubset<N> {
    #[default]
    All,
    Single(N),
    Many(Vec<N>),
}

impl<N> From<Vec<N>> for NodeSubset<N> {
    fn from(nodes: Vec<N>) -> Self {
        NodeSubset::Many(nodes)
    }
}

/// What an unnormalized score reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnnormalizedScore {
    /// E(G - i), the energy left after deleting the node
    #[default]
    DeflatedEnergy,
    /// E(G) - E(G - i), the energy lost by deleting the node
    EnergyDrop,
}

/// Options for a centrality computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityOptions {
    /// Divide the energy drop by the full-graph energy
    pub normalized: bool,
    /// Score reported when `normalized` is false
    pub unnormalized_score: UnnormalizedScore,
    /// Directed Laplacian parameters; required for directed graphs
    pub directed: Option<DirectedLaplacianConfig>,
    pub energy_backend: EnergyBackend,
    /// Iteration cap for the dense eigen-solver (0 = unbounded)
    pub max_eigen_iterations: Option<usize>,
    /// Fan per-node work out over rayon
    pub parallel: bool,
    /// Dedicated pool size; `None` uses the global rayon pool
    pub threads: Option<usize>,
}

impl Default for CentralityOptions {
    fn default() -> Self {
        Self {
            normalized: true,
            unnormalized_score: UnnormalizedScore::default(),
            directed: None,
            energy_backend: EnergyBackend::default(),
            max_eigen_iterations: None,
            parallel: true,
            threads: None,
        }
    }
}

impl CentralityOptions {
    /// Unnormalized scores (deflated energy per node)
    pub fn unnormalized() -> Self {
        Self {
            normalized: false,
            ..Self::default()
        }
    }

    /// Default options with a directed Laplacian configuration
    pub fn directed(config: DirectedLaplacianConfig) -> Self {
        Self {
            directed: Some(config),
            ..Self::default()
        }
    }

    /// # Errors
    /// - `InvalidConfiguration` for a zero thread count or a bad directed config
    pub fn validate(&self) -> CentralityResult<()> {
        if self.threads == Some(0) {
            return Err(CentralityError::InvalidConfiguration(
                "threads must be at least 1".to_string(),
            ));
        }
        if let Some(directed) = &self.directed {
            directed.validate()?;
        }
        Ok(())
    }

    fn score_policy(&self) -> ScorePolicy {
        match (self.normalized, self.unnormalized_score) {
            (true, _) => ScorePolicy::Normalized,
            (false, UnnormalizedScore::DeflatedEnergy) => ScorePolicy::DeflatedEnergy,
            (false, UnnormalizedScore::EnergyDrop) => ScorePolicy::EnergyDrop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScorePolicy {
    Normalized,
    DeflatedEnergy,
    EnergyDrop,
}

impl ScorePolicy {
    fn needs_full_energy(self) -> bool {
        self != ScorePolicy::DeflatedEnergy
    }

    /// Combine baseline and per-node energy into the reported score.
    fn aggregate(self, full_energy: Option<f64>, node_energy: f64) -> f64 {
        let full = full_energy.unwrap_or(0.0);
        match self {
            ScorePolicy::Normalized => 1.0 - node_energy / full,
            ScorePolicy::DeflatedEnergy => node_energy,
            ScorePolicy::EnergyDrop => full - node_energy,
        }
    }
}

/// Per-call state shared read-only by every per-node computation.
struct CentralityContext {
    laplacian: DMatrix<f64>,
    full_energy: Option<f64>,
    solver: Box<dyn SpectralEnergy>,
    policy: ScorePolicy,
}

impl CentralityContext {
    fn score(&self, index: usize, label: impl FnOnce() -> String) -> CentralityResult<f64> {
        let deflated = deflate(&self.laplacian, index)?;
        let energy = self
            .solver
            .energy(&deflated)
            .map_err(|e| e.for_target(NodeTarget::Node(label())))?;
        Ok(self.policy.aggregate(self.full_energy, energy))
    }
}

/// Compute Laplacian centrality for the nodes of `graph`.
///
/// # Arguments
/// * `graph` - Directed or undirected petgraph graph; node weights are the
///   node identities, edge weights convert through `EdgeWeight`
/// * `options` - Normalization, directed Laplacian parameters, backend
/// * `nodes` - Which nodes to score; unknown nodes in a list are skipped
///
/// # Returns
/// Map from node identity to score, in the order nodes were requested
///
/// # Errors
/// - `EmptyGraph` if the graph has no nodes
/// - `UnsupportedGraphKind` if the graph has parallel edges
/// - `InvalidConfiguration` if a directed graph has no directed config, or a
///   `Single` node is not in the graph
/// - `NumericComputation` on solver failure, non-finite weights, or zero
///   baseline energy under normalization
pub fn laplacian_centrality<N, E, Ty, Ix>(
    graph: &Graph<N, E, Ty, Ix>,
    options: &CentralityOptions,
    nodes: &NodeSubset<N>,
) -> CentralityResult<CentralityScores<N>>
where
    N: Clone + Eq + Hash + Debug + Send + Sync,
    E: EdgeWeight,
    Ty: EdgeType,
    Ix: IndexType,
{
    let indexed = IndexedGraph::from_petgraph(graph)?;
    options.validate()?;

    let laplacian = build_laplacian(&indexed, options.directed.as_ref())?;
    let solver = options.energy_backend.solver(options.max_eigen_iterations);
    let policy = options.score_policy();
    debug!("Energy backend: {}, policy: {:?}", solver.name(), policy);

    let full_energy = if policy.needs_full_energy() {
        let energy = solver.energy(&laplacian)?;
        if policy == ScorePolicy::Normalized && energy == 0.0 {
            return Err(CentralityError::numeric(
                NodeTarget::FullGraph,
                "zero Laplacian energy, cannot normalize",
            ));
        }
        Some(energy)
    } else {
        None
    };

    let visit = visit_order(&indexed, nodes)?;
    let context = CentralityContext {
        laplacian,
        full_energy,
        solver,
        policy,
    };

    let score_one = |&index: &usize| {
        context.score(index, || format!("{:?}", indexed.table.id_at(index)))
    };

    let scores: Vec<f64> = if !options.parallel {
        visit.iter().map(score_one).collect::<CentralityResult<_>>()?
    } else if let Some(threads) = options.threads {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| CentralityError::InvalidConfiguration(format!("thread pool: {}", e)))?;
        pool.install(|| visit.par_iter().map(score_one).collect::<CentralityResult<_>>())?
    } else {
        visit.par_iter().map(score_one).collect::<CentralityResult<_>>()?
    };

    info!(
        "Laplacian centrality: scored {} of {} nodes",
        scores.len(),
        indexed.node_count()
    );

    Ok(visit
        .into_iter()
        .zip(scores)
        .map(|(index, score)| (indexed.table.id_at(index).clone(), score))
        .collect())
}

/// Dense indices to score, in request order, unknown nodes and repeats dropped.
///
/// A `Single` node must be in the graph; unknown nodes in `Many` are skipped.
fn visit_order<N>(graph: &IndexedGraph<N>, nodes: &NodeSubset<N>) -> CentralityResult<Vec<usize>>
where
    N: Clone + Eq + Hash + Debug,
{
    let requested: &[N] = match nodes {
        NodeSubset::All => return Ok((0..graph.node_count()).collect()),
        NodeSubset::Single(node) => {
            return match graph.table.index_of(node) {
                Some(index) => Ok(vec![index]),
                None => Err(CentralityError::InvalidConfiguration(format!(
                    "node {:?} is not in the graph",
                    node
                ))),
            }
        }
        NodeSubset::Many(nodes) => nodes,
    };

    let mut seen = FxHashSet::default();
    let mut order = Vec::with_capacity(requested.len());
    for node in requested {
        match graph.table.index_of(node) {
            Some(index) => {
                if seen.insert(index) {
                    order.push(index);
                }
            }
            None => warn!("Skipping {:?}: not a node of the graph", node),
        }
    }
    Ok(order)
}
