//! Hyperedge move legality, gain computation and move commit.
//!
//! A hyperedge move to block `to` relocates every pin of the hyperedge that
//! is not already in `to`, including pins relocated earlier in the same pass.

use super::Evaluator;
use crate::state::RefineState;
use tpart_common::weights::{self, Matrix};
use tpart_common::{BlockId, HyperedgeId, PathId, VertexId};
use tpart_hgraph::Hypergraph;
use tracing::trace;

/// A candidate hyperedge move and its evaluated gain.
///
/// Only valid against the state it was computed from; it is discarded once
/// the hyperedge has been processed.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperedgeGain {
    /// The hyperedge whose pins move.
    pub hyperedge: HyperedgeId,
    /// The block receiving the pins.
    pub destination: BlockId,
    /// Cost reduction the move would produce.
    pub gain: f64,
    /// Pins that change block, in ascending order.
    pub moved_vertices: Vec<VertexId>,
    /// Sum over all dimensions of the weights of `moved_vertices`.
    pub moved_weight: f64,
    /// New cost of every path touched by the move.
    pub path_costs: Vec<(PathId, f64)>,
}

impl Evaluator {
    /// Returns the pins of `e` that are not in block `to`, in ascending order.
    pub fn movable_vertices(
        &self,
        graph: &Hypergraph,
        e: HyperedgeId,
        to: BlockId,
        solution: &[BlockId],
    ) -> Vec<VertexId> {
        let mut moved: Vec<VertexId> = graph
            .pins(e)
            .iter()
            .copied()
            .filter(|v| solution[v.index()] != to)
            .collect();
        moved.sort_unstable();
        moved.dedup();
        moved
    }

    /// Checks whether moving the pins of `e` into `to` keeps the receiving
    /// block and every losing block within their balance bounds.
    ///
    /// A move that relocates no pin is not legal.
    pub fn is_legal_move(
        &self,
        graph: &Hypergraph,
        e: HyperedgeId,
        to: BlockId,
        solution: &[BlockId],
        block_balance: &[Vec<f64>],
        max_block_balance: &[Vec<f64>],
    ) -> bool {
        let mut delta: Matrix<f64> =
            weights::zero_matrix(self.num_parts, graph.vertex_dimensions);
        let mut touched = vec![false; self.num_parts];
        for v in self.movable_vertices(graph, e, to, solution) {
            let from = solution[v.index()];
            let w = graph.vertex_weights(v);
            weights::sub_assign(&mut delta[from.index()], w);
            weights::add_assign(&mut delta[to.index()], w);
            touched[from.index()] = true;
            touched[to.index()] = true;
        }
        if !touched[to.index()] {
            return false;
        }

        touched
            .iter()
            .enumerate()
            .filter(|(_, &t)| t)
            .all(|(block, _)| {
                let after = weights::add(&block_balance[block], &delta[block]);
                weights::fits_within(&after, &max_block_balance[block])
            })
    }

    /// Evaluates moving the pins of `e` into `to` without changing any state.
    ///
    /// The gain is the cost of every hyperedge incident to a moved pin that
    /// the move uncuts, minus the cost of those it newly cuts, plus the cost
    /// reduction of every critical path through a moved pin.
    pub fn hyperedge_gain(
        &self,
        graph: &Hypergraph,
        e: HyperedgeId,
        to: BlockId,
        solution: &[BlockId],
        net_degs: &[Vec<u32>],
        paths_cost: &[f64],
    ) -> HyperedgeGain {
        let moved = self.movable_vertices(graph, e, to, solution);
        let is_moved = |v: VertexId| moved.binary_search(&v).is_ok();
        let mut gain = 0.0;

        let mut neighbors: Vec<HyperedgeId> = moved
            .iter()
            .flat_map(|&v| graph.incident_hyperedges(v).iter().copied())
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();

        let mut degs = vec![0u32; self.num_parts];
        for ne in neighbors {
            degs.copy_from_slice(&net_degs[ne.index()]);
            let cut_before = Self::block_span(&degs) > 1;
            for &v in graph.pins(ne) {
                if is_moved(v) {
                    degs[solution[v.index()].index()] -= 1;
                    degs[to.index()] += 1;
                }
            }
            let cut_after = Self::block_span(&degs) > 1;
            match (cut_before, cut_after) {
                (true, false) => gain += self.hyperedge_cost(graph, ne),
                (false, true) => gain -= self.hyperedge_cost(graph, ne),
                _ => {}
            }
        }

        let mut paths: Vec<PathId> = moved
            .iter()
            .flat_map(|&v| graph.vertex_paths(v).iter().copied())
            .collect();
        paths.sort_unstable();
        paths.dedup();

        let mut path_costs = Vec::with_capacity(paths.len());
        for p in paths {
            let cost = self.path_cost_with(graph, p, |v| {
                if is_moved(v) {
                    to
                } else {
                    solution[v.index()]
                }
            });
            gain += paths_cost[p.index()] - cost;
            path_costs.push((p, cost));
        }

        let moved_weight = moved
            .iter()
            .map(|&v| weights::weight_sum(graph.vertex_weights(v)))
            .sum();

        HyperedgeGain {
            hyperedge: e,
            destination: to,
            gain,
            moved_vertices: moved,
            moved_weight,
            path_costs,
        }
    }

    /// Commits an evaluated move and returns its gain.
    ///
    /// Updates the partition, block balance, net degrees and path costs of
    /// `state` together and marks every moved vertex as visited.
    pub fn accept_move(
        &self,
        graph: &Hypergraph,
        candidate: &HyperedgeGain,
        state: &mut RefineState,
    ) -> f64 {
        let to = candidate.destination;
        for &(p, cost) in &candidate.path_costs {
            state.paths_cost[p.index()] = cost;
        }
        for &v in &candidate.moved_vertices {
            let from = state.solution[v.index()];
            let w = graph.vertex_weights(v);
            weights::sub_assign(&mut state.block_balance[from.index()], w);
            weights::add_assign(&mut state.block_balance[to.index()], w);
            for &e in graph.incident_hyperedges(v) {
                state.net_degs[e.index()][from.index()] -= 1;
                state.net_degs[e.index()][to.index()] += 1;
            }
            state.solution[v.index()] = to;
            state.visited[v.index()] = true;
        }
        trace!(
            hyperedge = %candidate.hyperedge,
            to = %to,
            moved = candidate.moved_vertices.len(),
            gain = candidate.gain,
            "accepted hyperedge move"
        );
        candidate.gain
    }
}
