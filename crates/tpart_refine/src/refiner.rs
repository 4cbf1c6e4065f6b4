//! Multi-pass refinement driver.

use crate::error::RefineError;
use crate::evaluator::Evaluator;
use crate::greedy::GreedyRefiner;
use crate::state::RefineState;
use tpart_config::PassConfig;
use tpart_hgraph::Hypergraph;
use tracing::{debug, info};

/// Outcome of a multi-pass refinement run.
///
/// Each pass gain is measured under the timing weights in force during that
/// pass, while `initial_cost` and `final_cost` use the weights at the start
/// and end of the run. With timing updates between passes the cost
/// difference therefore need not equal `total_gain`.
#[derive(Debug, Clone, PartialEq)]
pub struct RefineReport {
    /// Number of passes executed, including the final non-improving one.
    pub passes: usize,
    /// Sum of the gains of all passes, each under its own timing weights.
    pub total_gain: f64,
    /// Partition cost before the first pass, under the initial timing costs.
    pub initial_cost: f64,
    /// Partition cost after the last pass, under the final timing costs.
    pub final_cost: f64,
}

/// Repeats greedy passes until they stop paying off.
///
/// Between passes the visited flags are cleared and, when enabled and the
/// graph carries timing data, slacks are re-derived from the new partition.
#[derive(Debug, Clone)]
pub struct Refiner<'a> {
    evaluator: &'a Evaluator,
    greedy: GreedyRefiner,
    max_passes: usize,
    min_gain: f64,
    update_timing: bool,
}

impl<'a> Refiner<'a> {
    /// Creates a driver from the `[refine]` configuration section.
    pub fn new(evaluator: &'a Evaluator, config: &PassConfig) -> Self {
        Self {
            evaluator,
            greedy: GreedyRefiner::from_config(config),
            max_passes: config.max_passes,
            min_gain: config.min_gain,
            update_timing: config.update_timing,
        }
    }

    /// Refines `state` in place.
    ///
    /// Fails before any pass runs if the balance bounds have the wrong shape
    /// or the state does not match its partition.
    pub fn refine(
        &self,
        graph: &mut Hypergraph,
        max_block_balance: &[Vec<f64>],
        state: &mut RefineState,
    ) -> Result<RefineReport, RefineError> {
        let evaluator = self.evaluator;
        evaluator.check_balance_limits(graph, max_block_balance)?;
        state.verify(graph, evaluator)?;

        let initial_cost = evaluator.cut_evaluate(graph, &state.solution).cost;
        let retime = self.update_timing && graph.has_timing();
        let mut passes = 0;
        let mut total_gain = 0.0;

        while passes < self.max_passes {
            state.reset_visited();
            let gain = self.greedy.pass(graph, evaluator, max_block_balance, state);
            passes += 1;
            total_gain += gain;
            debug!(pass = passes, gain, "refinement pass complete");
            if gain <= self.min_gain {
                break;
            }
            if retime {
                evaluator.update_timing(graph, &state.solution);
                state.refresh_paths_cost(graph, evaluator);
            }
        }

        let final_cost = evaluator.cut_evaluate(graph, &state.solution).cost;
        info!(
            passes,
            total_gain,
            initial_cost,
            final_cost,
            "refinement finished"
        );
        Ok(RefineReport {
            passes,
            total_gain,
            initial_cost,
            final_cost,
        })
    }
}
