// Error types for Laplacian centrality
//
// Every public entry point returns Result<T, CentralityError>. A call either
// yields a complete score mapping or exactly one of these errors; nothing is
// retried because every failure is a deterministic function of the input.

use std::fmt;
use thiserror::Error;

/// Which matrix a numeric failure belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTarget {
    /// The full-graph Laplacian (baseline energy or construction)
    FullGraph,
    /// The deflated matrix of one node, identified by its Debug label
    Node(String),
}

impl fmt::Display for NodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTarget::FullGraph => write!(f, "full graph"),
            NodeTarget::Node(label) => write!(f, "node {}", label),
        }
    }
}

/// Errors raised while computing Laplacian centrality
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CentralityError {
    #[error("cannot compute centrality for the null graph")]
    EmptyGraph,

    #[error("multigraphs are not supported: parallel edges between {source_label} and {target_label}")]
    UnsupportedGraphKind {
        source_label: String,
        target_label: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("numeric failure on {target}: {reason}")]
    NumericComputation { target: NodeTarget, reason: String },
}

impl CentralityError {
    pub(crate) fn numeric(target: NodeTarget, reason: impl Into<String>) -> Self {
        CentralityError::NumericComputation {
            target,
            reason: reason.into(),
        }
    }

    /// Re-label a numeric failure raised inside a solver with the node it belongs to.
    pub(crate) fn for_target(self, target: NodeTarget) -> Self {
        match self {
            CentralityError::NumericComputation { reason, .. } => {
                CentralityError::NumericComputation { target, reason }
            }
            other => other,
        }
    }
}

pub type CentralityResult<T> = Result<T, CentralityError>;
