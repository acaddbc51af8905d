// Directed graph Laplacian (Chung's construction)
//
// What is it?
// A symmetric Laplacian for a directed graph, built from a random walk on the
// graph instead of raw degrees:
//
//   L = I - (Φ^{1/2} P Φ^{-1/2} + Φ^{-1/2} Pᵀ Φ^{1/2}) / 2
//
// Where:
//   P = transition matrix of the walk
//   Φ = diag(p), p = stationary distribution of P (Perron vector of Pᵀ)
//
// Walk types:
//   random   - P = D⁻¹A                    (needs strongly connected + aperiodic)
//   lazy     - P = (I + D⁻¹A) / 2          (needs strongly connected)
//   pagerank - P = α D⁻¹A + (1 - α) / n    (always irreducible + aperiodic)
//
// When no walk type is given it is picked from the graph's structure, in the
// order above.
//
// Time complexity: O(n³) for the stationary distribution (dense LU solve)

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CentralityError, CentralityResult, NodeTarget};

/// Random walk used to build the directed Laplacian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkType {
    Random,
    Lazy,
    #[serde(rename = "pagerank")]
    PageRank,
}

impl fmt::Display for WalkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WalkType::Random => "random",
            WalkType::Lazy => "lazy",
            WalkType::PageRank => "pagerank",
        };
        f.write_str(name)
    }
}

impl FromStr for WalkType {
    type Err = CentralityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(WalkType::Random),
            "lazy" => Ok(WalkType::Lazy),
            "pagerank" => Ok(WalkType::PageRank),
            other => Err(CentralityError::InvalidConfiguration(format!(
                "walk type must be one of random, lazy, pagerank; got '{}'",
                other
            ))),
        }
    }
}

/// Parameters of the directed Laplacian. Required for directed graphs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectedLaplacianConfig {
    /// `None` selects the walk from the graph structure
    pub walk_type: Option<WalkType>,
    /// Teleport-free probability for the pagerank walk, in (0, 1)
    pub alpha: f64,
}

pub const DEFAULT_ALPHA: f64 = 0.95;

impl Default for DirectedLaplacianConfig {
    fn default() -> Self {
        Self {
            walk_type: None,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl DirectedLaplacianConfig {
    pub fn with_walk_type(walk_type: WalkType) -> Self {
        Self {
            walk_type: Some(walk_type),
            ..Self::default()
        }
    }

    pub fn pagerank(alpha: f64) -> Self {
        Self {
            walk_type: Some(WalkType::PageRank),
            alpha,
        }
    }

    /// # Errors
    /// - `InvalidConfiguration` if alpha is outside (0, 1) for a pagerank walk
    pub fn validate(&self) -> CentralityResult<()> {
        if self.walk_type == Some(WalkType::PageRank) && !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(CentralityError::InvalidConfiguration(format!(
                "alpha must be in (0, 1) for the pagerank walk, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Build the directed Laplacian of an n-node graph given as dense-index edges.
///
/// # Errors
/// - `EmptyGraph` if `num_nodes` is 0
/// - `InvalidConfiguration` for a bad alpha, or a random/lazy walk on a graph
///   with a node that has no outgoing weight
/// - `NumericComputation` if the stationary distribution cannot be found
pub fn directed_laplacian(
    num_nodes: usize,
    edges: &[(usize, usize, f64)],
    config: &DirectedLaplacianConfig,
) -> CentralityResult<DMatrix<f64>> {
    if num_nodes == 0 {
        return Err(CentralityError::EmptyGraph);
    }
    config.validate()?;

    let n = num_nodes;
    let mut adjacency = DMatrix::<f64>::zeros(n, n);
    for &(src, dst, weight) in edges {
        adjacency[(src, dst)] += weight;
    }

    let walk_type = match config.walk_type {
        Some(walk_type) => walk_type,
        None => {
            let selected = select_walk_type(n, edges);
            debug!("Directed Laplacian: selected {} walk", selected);
            selected
        }
    };
    if walk_type == WalkType::PageRank {
        // An auto-selected pagerank walk still needs a usable alpha
        DirectedLaplacianConfig::pagerank(config.alpha).validate()?;
    }

    let transition = transition_matrix(adjacency, walk_type, config.alpha)?;
    let stationary = stationary_distribution(&transition)?;

    let sqrt_p: Vec<f64> = stationary.iter().map(|p| p.abs().sqrt()).collect();
    if sqrt_p.iter().any(|&s| s == 0.0) {
        return Err(CentralityError::numeric(
            NodeTarget::FullGraph,
            "stationary distribution has a zero entry",
        ));
    }

    // Q = Φ^{1/2} P Φ^{-1/2}
    let q = DMatrix::from_fn(n, n, |r, c| sqrt_p[r] * transition[(r, c)] / sqrt_p[c]);
    let symmetric = (&q + q.transpose()) * 0.5;
    Ok(DMatrix::identity(n, n) - symmetric)
}

/// Pick the walk type for a graph: random if strongly connected and
/// aperiodic, lazy if only strongly connected, pagerank otherwise.
pub fn select_walk_type(num_nodes: usize, edges: &[(usize, usize, f64)]) -> WalkType {
    let mut has_out_edge = vec![false; num_nodes];
    for &(src, _, _) in edges {
        has_out_edge[src] = true;
    }

    // A lone node is trivially strongly connected but has nowhere to walk
    if has_out_edge.contains(&false) || !is_strongly_connected(num_nodes, edges) {
        WalkType::PageRank
    } else if is_aperiodic(num_nodes, edges) {
        WalkType::Random
    } else {
        WalkType::Lazy
    }
}

fn transition_matrix(
    mut adjacency: DMatrix<f64>,
    walk_type: WalkType,
    alpha: f64,
) -> CentralityResult<DMatrix<f64>> {
    let n = adjacency.nrows();

    match walk_type {
        WalkType::Random | WalkType::Lazy => {
            let mut transition = adjacency;
            for r in 0..n {
                let row_sum = transition.row(r).sum();
                if row_sum <= 0.0 {
                    return Err(CentralityError::InvalidConfiguration(format!(
                        "{} walk needs outgoing weight on every node; node index {} has none",
                        walk_type, r
                    )));
                }
                transition.row_mut(r).unscale_mut(row_sum);
            }
            if walk_type == WalkType::Lazy {
                transition = (DMatrix::identity(n, n) + transition) * 0.5;
            }
            Ok(transition)
        }
        WalkType::PageRank => {
            let uniform = 1.0 / n as f64;
            for r in 0..n {
                if adjacency.row(r).sum() == 0.0 {
                    // Dangling node: jump anywhere
                    adjacency.row_mut(r).fill(uniform);
                }
            }
            let mut transition = adjacency;
            for r in 0..n {
                let row_sum = transition.row(r).sum();
                transition.row_mut(r).unscale_mut(row_sum);
            }
            Ok(transition.map(|p| alpha * p + (1.0 - alpha) * uniform))
        }
    }
}

/// Stationary distribution p of a row-stochastic matrix: pᵀP = pᵀ, Σp = 1.
///
/// Solved directly as (Pᵀ - I) p = 0 with one equation replaced by the
/// normalization constraint.
fn stationary_distribution(transition: &DMatrix<f64>) -> CentralityResult<DVector<f64>> {
    let n = transition.nrows();
    if n == 1 {
        return Ok(DVector::from_element(1, 1.0));
    }

    let mut system = transition.transpose() - DMatrix::identity(n, n);
    system.row_mut(n - 1).fill(1.0);
    let mut rhs = DVector::zeros(n);
    rhs[n - 1] = 1.0;

    let solution = system.lu().solve(&rhs).ok_or_else(|| {
        CentralityError::numeric(
            NodeTarget::FullGraph,
            "random walk has no unique stationary distribution",
        )
    })?;

    if solution.iter().any(|p| !p.is_finite()) {
        return Err(CentralityError::numeric(
            NodeTarget::FullGraph,
            "stationary distribution is not finite",
        ));
    }
    Ok(solution)
}

fn is_strongly_connected(num_nodes: usize, edges: &[(usize, usize, f64)]) -> bool {
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(num_nodes, edges.len());
    let nodes: Vec<_> = (0..num_nodes).map(|_| graph.add_node(())).collect();
    for &(src, dst, _) in edges {
        graph.add_edge(nodes[src], nodes[dst], ());
    }
    tarjan_scc(&graph).len() == 1
}

/// A strongly connected graph is aperiodic when the gcd of its cycle lengths
/// is 1. Cycle lengths are read off BFS levels: every edge (u, v) closes a
/// cycle-length offset of level[u] + 1 - level[v].
fn is_aperiodic(num_nodes: usize, edges: &[(usize, usize, f64)]) -> bool {
    let mut adjacency: Vec<Vec<usize>> = vec![vec![]; num_nodes];
    for &(src, dst, _) in edges {
        adjacency[src].push(dst);
    }

    let mut level: Vec<Option<i64>> = vec![None; num_nodes];
    level[0] = Some(0);
    let mut frontier = vec![0usize];
    let mut period: i64 = 0;
    let mut depth: i64 = 1;

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &u in &frontier {
            let level_u = level[u].unwrap_or(0);
            for &v in &adjacency[u] {
                match level[v] {
                    Some(level_v) => period = gcd(period, level_u - level_v + 1),
                    None => {
                        level[v] = Some(depth);
                        next.push(v);
                    }
                }
            }
        }
        frontier = next;
        depth += 1;
    }

    period == 1
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
