// Node removal without rebuilding the Laplacian
//
// Deleting node i from the graph does two things to the Laplacian:
//   1. Row i and column i disappear
//   2. Every neighbour j loses the edge (i, j), so its weighted degree
//      L[j,j] drops by that edge's weight, which is |L[j,i]|
//
// Everything else (edges between surviving nodes) is untouched. So the
// deflated matrix is the (n-1)x(n-1) submatrix of L with a corrected
// diagonal:
//
//   L'[j,j] = L[j,j] - |L[j,i]|        for j != i
//   L'[j,k] = L[j,k]                   for j != k, both != i
//
// For a simple-graph Laplacian this is exactly the Laplacian of G - i, in
// O(n²) instead of rebuilding adjacency (or re-running the directed walk
// construction) from a pruned graph.

use nalgebra::DMatrix;

use crate::errors::{CentralityError, CentralityResult};

/// Derive the Laplacian of the graph with node `index` deleted.
///
/// # Errors
/// - `InvalidConfiguration` if `index` is outside the matrix or the matrix
///   is not square
pub fn deflate(laplacian: &DMatrix<f64>, index: usize) -> CentralityResult<DMatrix<f64>> {
    let n = laplacian.nrows();
    if !laplacian.is_square() {
        return Err(CentralityError::InvalidConfiguration(format!(
            "Laplacian must be square, got {}x{}",
            n,
            laplacian.ncols()
        )));
    }
    if index >= n {
        return Err(CentralityError::InvalidConfiguration(format!(
            "node index {} out of bounds for {} nodes",
            index, n
        )));
    }

    // Skip row/column `index` by shifting everything after it up/left by one
    let keep = |k: usize| if k < index { k } else { k + 1 };

    Ok(DMatrix::from_fn(n - 1, n - 1, |r, c| {
        let (row, col) = (keep(r), keep(c));
        if row == col {
            laplacian[(row, row)] - laplacian[(row, index)].abs()
        } else {
            laplacian[(row, col)]
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::IndexedGraph;
    use crate::laplacian::{build_laplacian, undirected_laplacian};
    use crate::test_support::{path_graph, weighted_example};

    #[test]
    fn test_path_endpoint_removal() {
        let graph = IndexedGraph::from_petgraph(&path_graph(3)).unwrap();
        let lap = build_laplacian(&graph, None).unwrap();

        let without_0 = deflate(&lap, 0).unwrap();
        assert_eq!(without_0, DMatrix::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]));

        // Removing the middle node leaves two isolated nodes
        let without_1 = deflate(&lap, 1).unwrap();
        assert_eq!(without_1, DMatrix::zeros(2, 2));
    }

    #[test]
    fn test_matches_rebuilt_laplacian() {
        let graph = IndexedGraph::from_petgraph(&weighted_example()).unwrap();
        let lap = build_laplacian(&graph, None).unwrap();

        for removed in 0..graph.node_count() {
            // Rebuild from scratch with `removed` pruned and indices compacted
            let pruned: Vec<(usize, usize, f64)> = graph
                .edges
                .iter()
                .filter(|(s, t, _)| *s != removed && *t != removed)
                .map(|&(s, t, w)| {
                    let shift = |k: usize| if k > removed { k - 1 } else { k };
                    (shift(s), shift(t), w)
                })
                .collect();
            let expected = undirected_laplacian(graph.node_count() - 1, &pruned);

            assert_eq!(deflate(&lap, removed).unwrap(), expected, "removed node {}", removed);
        }
    }

    #[test]
    fn test_input_is_not_modified() {
        let graph = IndexedGraph::from_petgraph(&weighted_example()).unwrap();
        let lap = build_laplacian(&graph, None).unwrap();
        let before = lap.clone();
        let _ = deflate(&lap, 1).unwrap();
        assert_eq!(lap, before);
    }

    #[test]
    fn test_single_node_deflates_to_empty() {
        let lap = DMatrix::<f64>::zeros(1, 1);
        let deflated = deflate(&lap, 0).unwrap();
        assert_eq!(deflated.shape(), (0, 0));
    }

    #[test]
    fn test_out_of_bounds_index() {
        let lap = DMatrix::<f64>::zeros(3, 3);
        assert!(matches!(deflate(&lap, 3), Err(CentralityError::InvalidConfiguration(_))));
        let rect = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(deflate(&rect, 0), Err(CentralityError::InvalidConfiguration(_))));
    }
}
