//! Shared foundational types for the `tpart` partitioning workspace.
//!
//! This crate provides the opaque ID newtypes used to index vertices,
//! hyperedges, timing paths and blocks, plus the dense [`Matrix`] alias and
//! weight-vector arithmetic shared by the graph model and the evaluator.

#![warn(missing_docs)]

pub mod ids;
pub mod weights;

pub use ids::{BlockId, HyperedgeId, PathId, VertexId};
pub use weights::Matrix;

/// A partitioning solution: the block of every vertex, indexed by [`VertexId`].
pub type Partition = Vec<BlockId>;
