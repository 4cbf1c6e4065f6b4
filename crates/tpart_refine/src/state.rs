//! Mutable refinement state kept consistent with a partition.

use crate::error::RefineError;
use crate::evaluator::Evaluator;
use tpart_common::weights::Matrix;
use tpart_common::Partition;
use tpart_hgraph::Hypergraph;

const TOLERANCE: f64 = 1e-6;

/// A partition together with the bookkeeping derived from it.
///
/// `block_balance`, `net_degs` and `paths_cost` must always equal a fresh
/// recount from `solution`; [`Evaluator::accept_move`] maintains this
/// incrementally and [`RefineState::verify`] checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct RefineState {
    /// Block of every vertex, indexed by vertex ID.
    pub solution: Partition,
    /// Summed vertex weights per block and dimension.
    pub block_balance: Matrix<f64>,
    /// Pin count per hyperedge and block.
    pub net_degs: Matrix<u32>,
    /// Cost of every critical path, indexed by path ID.
    pub paths_cost: Vec<f64>,
    /// Vertices moved during the current pass.
    pub visited: Vec<bool>,
}

impl RefineState {
    /// Derives the full state for `solution`.
    ///
    /// Fails if the partition does not cover every vertex or names a block
    /// outside `0..num_parts`.
    pub fn new(
        graph: &Hypergraph,
        evaluator: &Evaluator,
        solution: Partition,
    ) -> Result<Self, RefineError> {
        if solution.len() != graph.vertex_count() {
            return Err(RefineError::InvalidConfiguration(format!(
                "partition has {} entries but the graph has {} vertices",
                solution.len(),
                graph.vertex_count()
            )));
        }
        if let Some(block) = solution
            .iter()
            .find(|b| b.index() >= evaluator.num_parts())
        {
            return Err(RefineError::InvalidConfiguration(format!(
                "block {block} is out of range for {} parts",
                evaluator.num_parts()
            )));
        }

        Ok(Self {
            block_balance: evaluator.block_balance(graph, &solution),
            net_degs: evaluator.net_degrees(graph, &solution),
            paths_cost: evaluator.paths_cost(graph, &solution),
            visited: vec![false; solution.len()],
            solution,
        })
    }

    /// Recomputes every path cost, after the timing costs of the graph changed.
    pub fn refresh_paths_cost(&mut self, graph: &Hypergraph, evaluator: &Evaluator) {
        self.paths_cost = evaluator.paths_cost(graph, &self.solution);
    }

    /// Clears all visited flags.
    pub fn reset_visited(&mut self) {
        self.visited.fill(false);
    }

    /// Checks the incremental bookkeeping against a recount from the partition.
    pub fn verify(&self, graph: &Hypergraph, evaluator: &Evaluator) -> Result<(), RefineError> {
        if self.solution.len() != graph.vertex_count()
            || self.visited.len() != graph.vertex_count()
        {
            return Err(RefineError::InconsistentState(
                "partition length differs from vertex count".into(),
            ));
        }
        if self.net_degs != evaluator.net_degrees(graph, &self.solution) {
            return Err(RefineError::InconsistentState(
                "net degrees differ from partition".into(),
            ));
        }

        let balance = evaluator.block_balance(graph, &self.solution);
        let balance_ok = balance.len() == self.block_balance.len()
            && balance
                .iter()
                .zip(&self.block_balance)
                .all(|(expected, actual)| close(expected, actual));
        if !balance_ok {
            return Err(RefineError::InconsistentState(
                "block balance differs from partition".into(),
            ));
        }

        if !close(&evaluator.paths_cost(graph, &self.solution), &self.paths_cost) {
            return Err(RefineError::InconsistentState(
                "path costs differ from partition".into(),
            ));
        }
        Ok(())
    }

    /// Returns the block of every vertex as raw numbers.
    pub fn raw_solution(&self) -> Vec<u32> {
        self.solution.iter().map(|b| b.as_raw()).collect()
    }
}

fn close(expected: &[f64], actual: &[f64]) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| (e - a).abs() <= TOLERANCE * e.abs().max(1.0))
}
