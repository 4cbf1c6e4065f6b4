//! Greedy timing-driven refinement of hypergraph partitions.
//!
//! The [`Evaluator`] scores partitions (cut hyperedge cost, critical path
//! cost with a snaking penalty, per-block balance) and evaluates hyperedge
//! moves. [`GreedyRefiner::pass`] runs one sweep of greedy hyperedge moves
//! over a [`RefineState`], and [`Refiner`] repeats passes until they stop
//! improving, re-deriving slacks from the partition in between.
//!
//! # Usage
//!
//! ```
//! use tpart_common::BlockId;
//! use tpart_config::RefineConfig;
//! use tpart_hgraph::Hypergraph;
//! use tpart_refine::{Evaluator, GreedyRefiner, RefineState};
//!
//! let mut graph = Hypergraph::new(1, 1, 0);
//! let a = graph.add_vertex("a", vec![1.0], vec![]).unwrap();
//! let b = graph.add_vertex("b", vec![1.0], vec![]).unwrap();
//! graph.add_hyperedge(vec![a, b], vec![1.0]).unwrap();
//!
//! let config = RefineConfig::default();
//! let evaluator = Evaluator::new(&config, &graph).unwrap();
//! let solution = vec![BlockId::from_raw(0), BlockId::from_raw(1)];
//! let mut state = RefineState::new(&graph, &evaluator, solution).unwrap();
//! let max_balance = vec![vec![2.0]; 2];
//!
//! let gain = GreedyRefiner::from_config(&config.refine)
//!     .pass(&graph, &evaluator, &max_balance, &mut state);
//! assert_eq!(gain, 1.0);
//! assert_eq!(state.solution[0], state.solution[1]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod evaluator;
pub mod greedy;
pub mod refiner;
pub mod state;

pub use error::RefineError;
pub use evaluator::{Evaluator, HyperedgeGain, PartitionToken, TimingCuts};
pub use greedy::{compare_candidates, GreedyRefiner};
pub use refiner::{RefineReport, Refiner};
pub use state::RefineState;
