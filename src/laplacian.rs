// Full graph Laplacian
//
//   L = D - W
//
// Where:
//   W[i,j] = weight of edge (i, j), 0 when absent
//   D      = diag(weighted degree)
//
// For undirected graphs L is symmetric and every row sums to 0. Self-loops
// add the same weight to D[i,i] and W[i,i], so they cancel. Directed graphs
// are handed to the directed Laplacian construction unchanged.

use std::fmt::Debug;
use std::hash::Hash;

use nalgebra::DMatrix;
use tracing::debug;

use crate::directed::{directed_laplacian, DirectedLaplacianConfig};
use crate::errors::{CentralityError, CentralityResult, NodeTarget};
use crate::graph::IndexedGraph;

/// Build the Laplacian of an indexed graph.
///
/// # Errors
/// - `InvalidConfiguration` if the graph is directed and `directed` is `None`
/// - `NumericComputation` if an edge weight is not finite
pub fn build_laplacian<N>(
    graph: &IndexedGraph<N>,
    directed: Option<&DirectedLaplacianConfig>,
) -> CentralityResult<DMatrix<f64>>
where
    N: Clone + Eq + Hash + Debug,
{
    let config = match (graph.directed, directed) {
        (true, None) => {
            return Err(CentralityError::InvalidConfiguration(
                "directed graphs require a directed Laplacian configuration".to_string(),
            ))
        }
        (true, Some(config)) => Some(config),
        (false, _) => None,
    };

    if let Some(&(src, dst, weight)) = graph.edges.iter().find(|(_, _, w)| !w.is_finite()) {
        return Err(CentralityError::numeric(
            NodeTarget::FullGraph,
            format!(
                "edge {:?} -> {:?} has non-finite weight {}",
                graph.table.id_at(src),
                graph.table.id_at(dst),
                weight
            ),
        ));
    }

    let n = graph.node_count();
    debug!(
        "Building {} Laplacian: {} nodes, {} edges",
        if graph.directed { "directed" } else { "undirected" },
        n,
        graph.edges.len()
    );

    match config {
        Some(config) => directed_laplacian(n, &graph.edges, config),
        None => Ok(undirected_laplacian(n, &graph.edges)),
    }
}

/// D - W for an undirected edge list.
pub fn undirected_laplacian(num_nodes: usize, edges: &[(usize, usize, f64)]) -> DMatrix<f64> {
    let mut lap = DMatrix::<f64>::zeros(num_nodes, num_nodes);
    for &(src, dst, weight) in edges {
        if src == dst {
            continue;
        }
        lap[(src, dst)] -= weight;
        lap[(dst, src)] -= weight;
        lap[(src, src)] += weight;
        lap[(dst, dst)] += weight;
    }
    lap
}
