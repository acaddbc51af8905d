// Graph adapter: petgraph in, dense index space out
//
// The centrality algorithm works on dense matrices indexed 0..n-1, but callers
// own graphs whose nodes carry arbitrary identities. This module maps the two
// worlds once per call:
//
//   petgraph::Graph<N, E, Ty, Ix>
//        │  node weights  = identities (N)
//        │  edge weights  = EdgeWeight -> f64
//        ▼
//   IndexedGraph { table: NodeIndexTable<N>, edges: [(i, j, w)], directed }
//
// Canonical order is petgraph's node-index order, so index i in every matrix
// is the i-th node returned by `graph.node_indices()`.

use std::fmt::Debug;
use std::hash::Hash;

use petgraph::graph::{Graph, IndexType};
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{CentralityError, CentralityResult};

/// Conversion of an edge payload into a real weight.
///
/// Unweighted graphs (`()` edges) get weight 1, matching the usual convention
/// for a missing `weight` attribute.
pub trait EdgeWeight {
    fn weight(&self) -> f64;
}

impl EdgeWeight for () {
    fn weight(&self) -> f64 {
        1.0
    }
}

macro_rules! numeric_edge_weight {
    ($($t:ty),*) => {
        $(
            impl EdgeWeight for $t {
                fn weight(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

numeric_edge_weight!(f64, f32, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Bidirectional identity <-> dense index table.
#[derive(Debug, Clone)]
pub struct NodeIndexTable<N> {
    ids: Vec<N>,
    index: FxHashMap<N, usize>,
}

impl<N> NodeIndexTable<N>
where
    N: Clone + Eq + Hash + Debug,
{
    /// Build the table from identities in canonical order.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if two nodes share an identity
    pub fn new(ids: Vec<N>) -> CentralityResult<Self> {
        let mut index = FxHashMap::default();
        index.reserve(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(CentralityError::InvalidConfiguration(format!(
                    "node identity {:?} appears more than once",
                    id
                )));
            }
        }
        Ok(Self { ids, index })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, id: &N) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn id_at(&self, index: usize) -> &N {
        &self.ids[index]
    }

    /// Identities in canonical order
    pub fn ids(&self) -> &[N] {
        &self.ids
    }
}

/// A graph flattened into dense index space.
#[derive(Debug, Clone)]
pub struct IndexedGraph<N> {
    pub table: NodeIndexTable<N>,
    /// (source, target, weight), each pair appears once
    pub edges: Vec<(usize, usize, f64)>,
    pub directed: bool,
}

impl<N> IndexedGraph<N>
where
    N: Clone + Eq + Hash + Debug,
{
    /// Flatten a petgraph graph.
    ///
    /// # Errors
    /// - `EmptyGraph` if the graph has no nodes (checked first)
    /// - `InvalidConfiguration` if node identities are not unique
    /// - `UnsupportedGraphKind` if two edges join the same node pair
    pub fn from_petgraph<E, Ty, Ix>(graph: &Graph<N, E, Ty, Ix>) -> CentralityResult<Self>
    where
        E: EdgeWeight,
        Ty: EdgeType,
        Ix: IndexType,
    {
        if graph.node_count() == 0 {
            return Err(CentralityError::EmptyGraph);
        }

        let ids: Vec<N> = graph
            .node_indices()
            .map(|ix| graph[ix].clone())
            .collect();
        let table = NodeIndexTable::new(ids)?;

        // NodeIndex::index() is already dense for petgraph::Graph
        let edges: Vec<(usize, usize, f64)> = graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight().weight()))
            .collect();

        let indexed = Self {
            table,
            edges,
            directed: graph.is_directed(),
        };
        indexed.check_simple()?;
        Ok(indexed)
    }

    pub fn node_count(&self) -> usize {
        self.table.len()
    }

    /// Reject multigraphs instead of silently summing or dropping duplicates.
    fn check_simple(&self) -> CentralityResult<()> {
        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
        seen.reserve(self.edges.len());

        for &(src, dst, _) in &self.edges {
            let key = if self.directed || src <= dst {
                (src, dst)
            } else {
                (dst, src)
            };
            if !seen.insert(key) {
                return Err(CentralityError::UnsupportedGraphKind {
                    source_label: format!("{:?}", self.table.id_at(src)),
                    target_label: format!("{:?}", self.table.id_at(dst)),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::{DiGraph, UnGraph};

    #[test]
    fn test_empty_graph_rejected() {
        let graph: UnGraph<u32, ()> = UnGraph::new_undirected();
        let err = IndexedGraph::from_petgraph(&graph).unwrap_err();
        assert_eq!(err, CentralityError::EmptyGraph);
    }

    #[test]
    fn test_table_round_trips_identities() {
        let mut graph: UnGraph<&str, f64> = UnGraph::new_undirected();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        graph.add_edge(a, b, 2.5);
        graph.add_edge(c, b, 1.0);

        let indexed = IndexedGraph::from_petgraph(&graph).unwrap();
        assert_eq!(indexed.node_count(), 3);
        assert_eq!(indexed.table.ids(), &["a", "b", "c"]);
        assert_eq!(indexed.table.index_of(&"c"), Some(2));
        assert_eq!(indexed.table.index_of(&"z"), None);
        assert_eq!(*indexed.table.id_at(1), "b");
        assert_eq!(indexed.edges, vec![(0, 1, 2.5), (2, 1, 1.0)]);
        assert!(!indexed.directed);
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut graph: UnGraph<u32, ()> = UnGraph::new_undirected();
        graph.add_node(7);
        graph.add_node(7);
        let err = IndexedGraph::from_petgraph(&graph).unwrap_err();
        assert!(matches!(err, CentralityError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_undirected_parallel_edges_rejected() {
        let mut graph: UnGraph<u32, ()> = UnGraph::new_undirected();
        let a = graph.add_node(0);
        let b = graph.add_node(1);
        graph.add_edge(a, b, ());
        graph.add_edge(b, a, ());

        let err = IndexedGraph::from_petgraph(&graph).unwrap_err();
        assert!(matches!(err, CentralityError::UnsupportedGraphKind { .. }));
    }

    #[test]
    fn test_directed_antiparallel_edges_allowed() {
        let mut graph: DiGraph<u32, ()> = DiGraph::new();
        let a = graph.add_node(0);
        let b = graph.add_node(1);
        graph.add_edge(a, b, ());
        graph.add_edge(b, a, ());

        let indexed = IndexedGraph::from_petgraph(&graph).unwrap();
        assert!(indexed.directed);
        assert_eq!(indexed.edges.len(), 2);

        graph.add_edge(a, b, ());
        let err = IndexedGraph::from_petgraph(&graph).unwrap_err();
        assert!(matches!(err, CentralityError::UnsupportedGraphKind { .. }));
    }

    #[test]
    fn test_edge_weight_conversions() {
        assert_eq!(().weight(), 1.0);
        assert_eq!(3u32.weight(), 3.0);
        assert_eq!((-2i64).weight(), -2.0);
        assert_eq!(0.5f32.weight(), 0.5);
    }
}
