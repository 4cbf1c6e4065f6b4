//! Slack-to-cost conversion and slack updates between refinement rounds.
//!
//! Every block boundary adds `extra_cut_delay` (normalized by the clock
//! period) to a connection. A hyperedge's timing cost is the criticality it
//! would have if cut, `max(0, 1 - (base_slack - extra_cut_delay))`, raised to
//! `exp_factor`, so the cut delay is charged once whether or not the
//! hyperedge is currently cut. A path's timing cost is
//! `max(0, 1 - slack)^exp_factor`, where the path slack already accounts for
//! every boundary the path crosses.
//!
//! These functions rewrite the timing attributes of the whole graph and must
//! only run between passes, after which path costs held in a
//! [`RefineState`](crate::RefineState) have to be refreshed.

use super::cost::path_crossings;
use super::Evaluator;
use tpart_common::BlockId;
use tpart_hgraph::Hypergraph;
use tracing::debug;

impl Evaluator {
    /// Recomputes the timing cost of every path from its current slack and
    /// of every timed hyperedge from its slack when cut.
    pub fn initialize_timing(&self, graph: &mut Hypergraph) {
        for path in &mut graph.paths {
            path.timing.cost = self.criticality_cost(1.0 - path.timing.slack);
        }
        for edge in &mut graph.hyperedges {
            if let Some(timing) = edge.timing.as_mut() {
                timing.cost =
                    self.criticality_cost(1.0 - (timing.base_slack - self.extra_cut_delay));
            }
        }
    }

    /// Re-derives slacks from the partition, then recomputes timing costs.
    ///
    /// A cut hyperedge loses `extra_cut_delay` of slack; a path loses
    /// `extra_cut_delay` for every block boundary it crosses. Slacks are
    /// always derived from the base slack, so repeated updates do not
    /// accumulate.
    pub fn update_timing(&self, graph: &mut Hypergraph, solution: &[BlockId]) {
        let cut: Vec<bool> = graph
            .hyperedge_ids()
            .map(|e| self.is_cut(graph, e, solution))
            .collect();
        let path_cuts: Vec<usize> = graph
            .path_ids()
            .map(|p| path_crossings(graph, p, |v| solution[v.index()]).cuts)
            .collect();

        for (edge, is_cut) in graph.hyperedges.iter_mut().zip(cut) {
            if let Some(timing) = edge.timing.as_mut() {
                timing.degrade(if is_cut { self.extra_cut_delay } else { 0.0 });
            }
        }
        for (path, cuts) in graph.paths.iter_mut().zip(&path_cuts) {
            path.timing.degrade(self.extra_cut_delay * *cuts as f64);
        }

        debug!(
            paths = graph.path_count(),
            cut_paths = path_cuts.iter().filter(|&&c| c > 0).count(),
            "updated timing slacks from partition"
        );
        self.initialize_timing(graph);
    }

    fn criticality_cost(&self, criticality: f64) -> f64 {
        criticality.max(0.0).powf(self.timing_exp_factor)
    }
}
