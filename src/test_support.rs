//! Graph builders shared by unit tests.

use petgraph::graph::{DiGraph, UnGraph};

/// Undirected graph with nodes labelled 0..n and weighted edges
pub(crate) fn weighted_graph(n: u32, edges: &[(u32, u32, f64)]) -> UnGraph<u32, f64> {
    let mut graph = UnGraph::new_undirected();
    let nodes: Vec<_> = (0..n).map(|i| graph.add_node(i)).collect();
    for &(src, dst, weight) in edges {
        graph.add_edge(nodes[src as usize], nodes[dst as usize], weight);
    }
    graph
}

/// Undirected unweighted graph with nodes labelled 0..n
pub(crate) fn unweighted_graph(n: u32, edges: &[(u32, u32)]) -> UnGraph<u32, ()> {
    let mut graph = UnGraph::new_undirected();
    let nodes: Vec<_> = (0..n).map(|i| graph.add_node(i)).collect();
    for &(src, dst) in edges {
        graph.add_edge(nodes[src as usize], nodes[dst as usize], ());
    }
    graph
}

/// Directed unweighted graph with nodes labelled 0..n
pub(crate) fn digraph(n: u32, edges: &[(u32, u32)]) -> DiGraph<u32, ()> {
    let mut graph = DiGraph::new();
    let nodes: Vec<_> = (0..n).map(|i| graph.add_node(i)).collect();
    for &(src, dst) in edges {
        graph.add_edge(nodes[src as usize], nodes[dst as usize], ());
    }
    graph
}

/// Path 0 - 1 - ... - (n-1)
pub(crate) fn path_graph(n: u32) -> UnGraph<u32, ()> {
    let edges: Vec<_> = (1..n).map(|i| (i - 1, i)).collect();
    unweighted_graph(n, &edges)
}

/// Every pair of nodes connected
pub(crate) fn complete_graph(n: u32) -> UnGraph<u32, ()> {
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push((i, j));
        }
    }
    unweighted_graph(n, &edges)
}

/// Weighted example: (0,1,4),(0,2,2),(2,1,1),(1,3,2),(1,4,2),(4,5,1)
pub(crate) fn weighted_example() -> UnGraph<u32, f64> {
    weighted_graph(
        6,
        &[
            (0, 1, 4.0),
            (0, 2, 2.0),
            (2, 1, 1.0),
            (1, 3, 2.0),
            (1, 4, 2.0),
            (4, 5, 1.0),
        ],
    )
}

/// Nodes 0..4 point at hub 5, which points at 6, 7 and 8
pub(crate) fn directed_star() -> DiGraph<u32, ()> {
    digraph(
        9,
        &[(0, 5), (1, 5), (2, 5), (3, 5), (4, 5), (5, 6), (5, 7), (5, 8)],
    )
}
