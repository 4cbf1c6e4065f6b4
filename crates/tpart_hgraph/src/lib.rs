//! Hypergraph model for timing-driven partitioning.
//!
//! A [`Hypergraph`] holds weighted vertices, weighted hyperedges and the
//! critical timing paths that run through them. It is built once by the
//! caller (netlist conversion or coarsening) and then borrowed read-only by
//! the refiner; only the [`TimingAttr`] slacks and costs are rewritten
//! between refinement rounds.
//!
//! # Usage
//!
//! ```
//! use tpart_hgraph::Hypergraph;
//!
//! let mut graph = Hypergraph::new(1, 1, 0);
//! let a = graph.add_vertex("a", vec![1.0], vec![]).unwrap();
//! let b = graph.add_vertex("b", vec![1.0], vec![]).unwrap();
//! let net = graph.add_hyperedge(vec![a, b], vec![1.0]).unwrap();
//! assert_eq!(graph.pins(net).len(), 2);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod hypergraph;
pub mod timing;

pub use error::GraphError;
pub use hypergraph::{Hyperedge, Hypergraph, TimingPath, Vertex};
pub use timing::TimingAttr;
