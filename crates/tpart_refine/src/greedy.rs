//! Greedy hyperedge-move refinement pass.
//!
//! One pass walks every hyperedge in ascending ID order. For each cut
//! hyperedge it evaluates moving the hyperedge's pins into every block,
//! keeps the best legal candidate and commits it when its gain is strictly
//! positive. Each commit changes the state later hyperedges are evaluated
//! against, so the pass is strictly sequential.

use crate::evaluator::{Evaluator, HyperedgeGain};
use crate::state::RefineState;
use std::cmp::Ordering;
use tpart_config::PassConfig;
use tpart_hgraph::Hypergraph;
use tracing::debug;

/// Total order over candidate moves; `Greater` means `a` is preferred.
///
/// Higher gain wins; on equal gain the candidate moving less weight wins;
/// on equal weight the candidate with the smaller destination block wins.
pub fn compare_candidates(a: &HyperedgeGain, b: &HyperedgeGain) -> Ordering {
    a.gain
        .total_cmp(&b.gain)
        .then_with(|| b.moved_weight.total_cmp(&a.moved_weight))
        .then_with(|| b.destination.cmp(&a.destination))
}

/// Greedy refinement with a per-pass move budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyRefiner {
    max_moves: usize,
}

impl GreedyRefiner {
    /// Creates a refiner that considers at most `max_moves` cut hyperedges per pass.
    pub fn new(max_moves: usize) -> Self {
        Self { max_moves }
    }

    /// Creates a refiner from the `[refine]` configuration section.
    pub fn from_config(config: &PassConfig) -> Self {
        Self::new(config.max_moves)
    }

    /// Returns the per-pass move budget.
    pub fn max_moves(&self) -> usize {
        self.max_moves
    }

    /// Runs one refinement pass over `state` and returns the realized gain.
    ///
    /// Hyperedges whose pins all lie in one block are skipped and do not
    /// count against the budget. The pass stops early once `max_moves`
    /// cut hyperedges have been considered.
    ///
    /// `state` must be consistent with its partition on entry.
    pub fn pass(
        &self,
        graph: &Hypergraph,
        evaluator: &Evaluator,
        max_block_balance: &[Vec<f64>],
        state: &mut RefineState,
    ) -> f64 {
        debug_assert!(
            state.verify(graph, evaluator).is_ok(),
            "refinement state is inconsistent with its partition"
        );

        let mut total_gain = 0.0;
        let mut considered = 0;
        let mut accepted = 0;
        for e in graph.hyperedge_ids() {
            if Evaluator::block_span(&state.net_degs[e.index()]) <= 1 {
                continue;
            }
            if considered >= self.max_moves {
                debug!(considered, "move budget exhausted");
                break;
            }
            considered += 1;

            let best = evaluator
                .blocks()
                .filter(|&to| {
                    evaluator.is_legal_move(
                        graph,
                        e,
                        to,
                        &state.solution,
                        &state.block_balance,
                        max_block_balance,
                    )
                })
                .map(|to| {
                    evaluator.hyperedge_gain(
                        graph,
                        e,
                        to,
                        &state.solution,
                        &state.net_degs,
                        &state.paths_cost,
                    )
                })
                .max_by(compare_candidates);

            if let Some(candidate) = best.filter(|c| c.gain > 0.0) {
                total_gain += evaluator.accept_move(graph, &candidate, state);
                accepted += 1;
            }
        }

        debug!(considered, accepted, gain = total_gain, "greedy pass finished");
        total_gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpart_common::{BlockId, HyperedgeId, PathId, VertexId};
    use tpart_config::RefineConfig;

    fn blocks(raw: &[u32]) -> Vec<BlockId> {
        raw.iter().copied().map(BlockId::from_raw).collect()
    }

    fn unit_graph(vertex_weights: &[f64]) -> Hypergraph {
        let mut g = Hypergraph::new(1, 1, 0);
        for (i, &w) in vertex_weights.iter().enumerate() {
            g.add_vertex(format!("v{i}"), vec![w], vec![]).unwrap();
        }
        g
    }

    fn v(raw: u32) -> VertexId {
        VertexId::from_raw(raw)
    }

    fn evaluator(g: &Hypergraph, num_parts: usize) -> Evaluator {
        let mut config = RefineConfig::default();
        config.partition.num_parts = num_parts;
        Evaluator::new(&config, g).unwrap()
    }

    fn candidate(gain: f64, moved_weight: f64, destination: u32) -> HyperedgeGain {
        HyperedgeGain {
            hyperedge: HyperedgeId::from_raw(0),
            destination: BlockId::from_raw(destination),
            gain,
            moved_vertices: vec![],
            moved_weight,
            path_costs: vec![],
        }
    }

    #[test]
    fn comparator_orders_by_gain_then_weight_then_block() {
        assert_eq!(
            compare_candidates(&candidate(2.0, 9.0, 3), &candidate(1.0, 1.0, 0)),
            Ordering::Greater
        );
        assert_eq!(
            compare_candidates(&candidate(1.0, 1.0, 3), &candidate(1.0, 2.0, 0)),
            Ordering::Greater
        );
        assert_eq!(
            compare_candidates(&candidate(1.0, 1.0, 0), &candidate(1.0, 1.0, 1)),
            Ordering::Greater
        );
        assert_eq!(
            compare_candidates(&candidate(1.0, 1.0, 1), &candidate(1.0, 1.0, 1)),
            Ordering::Equal
        );
    }

    #[test]
    fn moves_lone_vertex_to_majority() {
        let mut g = unit_graph(&[1.0, 1.0, 1.0]);
        g.add_hyperedge(vec![v(0), v(1), v(2)], vec![3.0]).unwrap();
        let ev = evaluator(&g, 2);
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 0, 1])).unwrap();
        let max = vec![vec![3.0], vec![3.0]];

        let gain = GreedyRefiner::new(10).pass(&g, &ev, &max, &mut state);
        assert_eq!(gain, 3.0);
        assert_eq!(state.raw_solution(), vec![0, 0, 0]);
        assert_eq!(state.visited, vec![false, false, true]);
        assert!(state.verify(&g, &ev).is_ok());

        // converged: a second pass changes nothing
        let before = state.clone();
        let gain = GreedyRefiner::new(10).pass(&g, &ev, &max, &mut state);
        assert_eq!(gain, 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn balance_bound_redirects_move() {
        let mut g = unit_graph(&[1.0, 1.0, 1.0]);
        g.add_hyperedge(vec![v(0), v(1), v(2)], vec![3.0]).unwrap();
        let ev = evaluator(&g, 2);
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 0, 1])).unwrap();
        let max = vec![vec![2.0], vec![3.0]];

        let gain = GreedyRefiner::new(10).pass(&g, &ev, &max, &mut state);
        assert_eq!(gain, 3.0);
        assert_eq!(state.raw_solution(), vec![1, 1, 1]);
        assert_eq!(state.block_balance, vec![vec![0.0], vec![3.0]]);
    }

    #[test]
    fn no_legal_move_leaves_state_untouched() {
        let mut g = unit_graph(&[1.0, 1.0, 1.0]);
        g.add_hyperedge(vec![v(0), v(1), v(2)], vec![3.0]).unwrap();
        let ev = evaluator(&g, 2);
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 0, 1])).unwrap();
        let before = state.clone();
        let max = vec![vec![2.0], vec![2.0]];

        assert_eq!(GreedyRefiner::new(10).pass(&g, &ev, &max, &mut state), 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn internal_hyperedges_do_not_use_budget() {
        let mut g = unit_graph(&[1.0, 1.0, 1.0, 1.0]);
        g.add_hyperedge(vec![v(0), v(1)], vec![1.0]).unwrap();
        g.add_hyperedge(vec![v(2), v(3)], vec![1.0]).unwrap();
        let ev = evaluator(&g, 2);
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 0, 0, 1])).unwrap();
        let max = vec![vec![9.0], vec![9.0]];

        let gain = GreedyRefiner::new(1).pass(&g, &ev, &max, &mut state);
        assert_eq!(gain, 1.0);
        assert_eq!(state.raw_solution(), vec![0, 0, 0, 0]);
        assert_eq!(state.net_degs[0], vec![2, 0]);
    }

    #[test]
    fn equal_gain_prefers_lighter_move() {
        let mut g = unit_graph(&[1.0, 2.0]);
        g.add_hyperedge(vec![v(0), v(1)], vec![1.0]).unwrap();
        let ev = evaluator(&g, 3);
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 1])).unwrap();
        let max = vec![vec![9.0]; 3];

        assert_eq!(GreedyRefiner::new(10).pass(&g, &ev, &max, &mut state), 1.0);
        assert_eq!(state.raw_solution(), vec![1, 1]);

        let mut g = unit_graph(&[2.0, 1.0]);
        g.add_hyperedge(vec![v(0), v(1)], vec![1.0]).unwrap();
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 1])).unwrap();
        assert_eq!(GreedyRefiner::new(10).pass(&g, &ev, &max, &mut state), 1.0);
        assert_eq!(state.raw_solution(), vec![0, 0]);
    }

    #[test]
    fn budget_limits_considered_hyperedges() {
        let mut g = unit_graph(&[1.0; 6]);
        for i in 0..3 {
            g.add_hyperedge(vec![v(2 * i), v(2 * i + 1)], vec![1.0]).unwrap();
        }
        let ev = evaluator(&g, 2);
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 1, 0, 1, 0, 1])).unwrap();
        let max = vec![vec![9.0], vec![9.0]];

        let gain = GreedyRefiner::new(2).pass(&g, &ev, &max, &mut state);
        assert_eq!(gain, 2.0);
        assert_eq!(state.raw_solution(), vec![0, 0, 0, 0, 0, 1]);
        assert_eq!(
            ev.cut_hyperedges(&g, &state.solution),
            vec![HyperedgeId::from_raw(2)]
        );

        let mut state = RefineState::new(&g, &ev, blocks(&[0, 1, 0, 1, 0, 1])).unwrap();
        assert_eq!(GreedyRefiner::new(0).pass(&g, &ev, &max, &mut state), 0.0);
    }

    #[test]
    fn move_relocates_previously_moved_pins() {
        let mut g = unit_graph(&[1.0; 4]);
        g.add_hyperedge(vec![v(0), v(1)], vec![1.0]).unwrap();
        g.add_hyperedge(vec![v(1), v(2), v(3)], vec![5.0]).unwrap();
        let ev = evaluator(&g, 2);
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 1, 1, 0])).unwrap();
        let max = vec![vec![3.0], vec![4.0]];
        let initial = ev.cut_evaluate(&g, &state.solution).cost;

        // b joins a first, then leaves again with d to uncut the heavy hyperedge
        let gain = GreedyRefiner::new(10).pass(&g, &ev, &max, &mut state);
        assert_eq!(gain, 5.0);
        assert_eq!(state.raw_solution(), vec![0, 1, 1, 1]);
        assert_eq!(state.visited, vec![false, true, false, true]);
        assert_eq!(initial - ev.cut_evaluate(&g, &state.solution).cost, gain);
    }

    #[test]
    fn path_penalty_drives_move() {
        let mut g = unit_graph(&[1.0, 1.0, 1.0]);
        let ab = g.add_hyperedge(vec![v(0), v(1)], vec![1.0]).unwrap();
        let bc = g.add_hyperedge(vec![v(1), v(2)], vec![1.0]).unwrap();
        g.add_path(vec![v(0), v(1), v(2)], vec![ab, bc], 0.0).unwrap();
        let mut config = RefineConfig::default();
        config.timing.path_factor = 4.0;
        let ev = Evaluator::new(&config, &g).unwrap();
        ev.initialize_timing(&mut g);

        // a | b | a : path costs 4 * 2 cuts + snaking 1
        let mut state = RefineState::new(&g, &ev, blocks(&[0, 1, 0])).unwrap();
        assert_eq!(state.paths_cost, vec![9.0]);
        let max = vec![vec![3.0], vec![3.0]];

        let gain = GreedyRefiner::new(10).pass(&g, &ev, &max, &mut state);
        assert_eq!(gain, 11.0);
        assert_eq!(state.raw_solution(), vec![0, 0, 0]);
        assert_eq!(state.paths_cost[PathId::from_raw(0).index()], 0.0);
    }

    /// e0 = {0, 1, 3} and e1 = {1, 2} are light; e2 = {3, 4} is heavy.
    fn pin_order_graph() -> Hypergraph {
        let mut g = unit_graph(&[1.0; 5]);
        g.add_hyperedge(vec![v(0), v(1), v(3)], vec![1.0]).unwrap();
        g.add_hyperedge(vec![v(1), v(2)], vec![1.0]).unwrap();
        g.add_hyperedge(vec![v(3), v(4)], vec![10.0]).unwrap();
        g
    }

    fn assert_pass_accounts_gain(g: &Hypergraph) {
        let ev = evaluator(g, 2);
        let mut state = RefineState::new(g, &ev, blocks(&[0, 1, 0, 1, 1])).unwrap();
        let max = vec![vec![10.0], vec![3.0]];
        let before = ev.cut_evaluate(g, &state.solution).cost;

        let gain = GreedyRefiner::new(10).pass(g, &ev, &max, &mut state);
        let after = ev.cut_evaluate(g, &state.solution).cost;
        assert_eq!(gain, 1.0);
        assert_eq!(before - after, gain);
        assert_eq!(state.raw_solution(), vec![0, 0, 0, 1, 1]);
        assert!(state.verify(g, &ev).is_ok());
    }

    #[test]
    fn gain_ignores_pin_order() {
        let mut g = pin_order_graph();
        g.hyperedges[0].vertices = vec![v(3), v(1), v(0)];
        assert_pass_accounts_gain(&g);
    }

    #[test]
    fn deserialized_graph_with_unsorted_pins() {
        let g = pin_order_graph();
        let mut json = serde_json::to_value(&g).unwrap();
        json["hyperedges"][0]["vertices"] = serde_json::json!([3, 1, 0, 1]);
        let mut restored: Hypergraph = serde_json::from_value(json).unwrap();
        restored.rebuild_indices().unwrap();

        assert_eq!(restored.pins(HyperedgeId::from_raw(0)), &[v(0), v(1), v(3)]);
        assert_pass_accounts_gain(&restored);
    }
}
