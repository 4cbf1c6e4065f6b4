//! Error types for hypergraph construction.

use tpart_common::{HyperedgeId, VertexId};

/// Errors raised while building or validating a [`Hypergraph`](crate::Hypergraph).
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A pin or path vertex refers to a vertex that does not exist.
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    /// A path refers to a hyperedge that does not exist.
    #[error("unknown hyperedge {0}")]
    UnknownHyperedge(HyperedgeId),

    /// A hyperedge was added without any pins.
    #[error("hyperedge has no pins")]
    EmptyHyperedge,

    /// A weight or placement vector does not match the graph's dimensions.
    #[error("{what} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        /// Which vector was rejected.
        what: &'static str,
        /// Dimension declared by the graph.
        expected: usize,
        /// Dimension of the rejected vector.
        actual: usize,
    },
}
