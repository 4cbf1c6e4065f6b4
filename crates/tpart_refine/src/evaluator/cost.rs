//! Hyperedge, path and placement cost functions.
//!
//! A cut hyperedge costs its structural weight (weights dotted with the
//! hyperedge factors) plus its timing weight. A critical path costs
//! `path_factor * cuts * path_timing_cost` for every block boundary it
//! crosses, plus `snaking_factor` for every re-entry into a block it has
//! already visited.

use super::Evaluator;
use tpart_common::weights;
use tpart_common::{BlockId, HyperedgeId, PathId, VertexId};
use tpart_hgraph::Hypergraph;

/// Summary of how critical paths are cut by a partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingCuts {
    /// Total number of block boundary crossings over all paths.
    pub total: usize,
    /// Largest number of crossings on a single path.
    pub worst: usize,
    /// Mean number of crossings per path.
    pub average: f64,
}

/// Block boundary crossings of one path under a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathCrossings {
    /// Number of times consecutive path vertices sit in different blocks.
    pub cuts: usize,
    /// Number of times the path re-enters a block it already left.
    pub reentries: usize,
}

impl Evaluator {
    /// Structural cost of cutting `e`: its weights dotted with the hyperedge factors.
    pub fn structural_edge_cost(&self, graph: &Hypergraph, e: HyperedgeId) -> f64 {
        weights::dot(&self.e_wt_factors, graph.hyperedge_weights(e))
    }

    /// Timing cost of cutting `e`; zero for hyperedges without slack information.
    pub fn timing_edge_cost(&self, graph: &Hypergraph, e: HyperedgeId) -> f64 {
        graph
            .hyperedge(e)
            .timing
            .map_or(0.0, |timing| self.timing_factor * timing.cost)
    }

    /// Total cost contributed by `e` while it is cut.
    pub fn hyperedge_cost(&self, graph: &Hypergraph, e: HyperedgeId) -> f64 {
        self.structural_edge_cost(graph, e) + self.timing_edge_cost(graph, e)
    }

    /// Hyperedge cost normalized by the number of pin pairs it would merge.
    ///
    /// Coarsening uses this as the contraction score of a hyperedge.
    pub fn norm_edge_score(&self, graph: &Hypergraph, e: HyperedgeId) -> f64 {
        let pins = graph.pins(e).len();
        let cost = self.hyperedge_cost(graph, e);
        if pins > 1 {
            cost / (pins - 1) as f64
        } else {
            cost
        }
    }

    /// Cost of a critical path under `solution`.
    pub fn path_cost(&self, graph: &Hypergraph, path: PathId, solution: &[BlockId]) -> f64 {
        self.path_cost_with(graph, path, |v| solution[v.index()])
    }

    /// Cost of a critical path with blocks supplied by `block_of`.
    ///
    /// Gain computation uses this to score a tentative move without
    /// touching the partition.
    pub(crate) fn path_cost_with(
        &self,
        graph: &Hypergraph,
        path: PathId,
        block_of: impl Fn(VertexId) -> BlockId,
    ) -> f64 {
        let crossings = path_crossings(graph, path, block_of);
        let timing_cost = graph.path(path).timing.cost;
        self.path_wt_factor * crossings.cuts as f64 * timing_cost
            + self.snaking_wt_factor * crossings.reentries as f64
    }

    /// Cost of every critical path, indexed by [`PathId`].
    pub fn paths_cost(&self, graph: &Hypergraph, solution: &[BlockId]) -> Vec<f64> {
        graph
            .path_ids()
            .map(|p| self.path_cost(graph, p, solution))
            .collect()
    }

    /// Counts block boundary crossings over all critical paths.
    pub fn timing_cuts(&self, graph: &Hypergraph, solution: &[BlockId]) -> TimingCuts {
        let mut total = 0;
        let mut worst = 0;
        for p in graph.path_ids() {
            let cuts = path_crossings(graph, p, |v| solution[v.index()]).cuts;
            total += cuts;
            worst = worst.max(cuts);
        }
        let average = if graph.path_count() == 0 {
            0.0
        } else {
            total as f64 / graph.path_count() as f64
        };
        TimingCuts {
            total,
            worst,
            average,
        }
    }

    /// Weight norm of a vertex: its weights dotted with the vertex factors.
    pub fn vertex_weight_norm(&self, graph: &Hypergraph, v: VertexId) -> f64 {
        weights::dot(&self.v_wt_factors, graph.vertex_weights(v))
    }

    /// Weighted Euclidean distance between the placements of `v` and `u`.
    ///
    /// Returns `0.0` when either vertex is unplaced or no placement factors
    /// are configured.
    pub fn placement_score(&self, graph: &Hypergraph, v: VertexId, u: VertexId) -> f64 {
        let pv = &graph.vertex(v).placement;
        let pu = &graph.vertex(u).placement;
        if pv.is_empty() || pu.is_empty() {
            return 0.0;
        }
        self.placement_wt_factors
            .iter()
            .zip(pv.iter().zip(pu))
            .map(|(f, (a, b))| f * (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Location of the merged vertex when `v` and `u` are contracted: the
    /// placements averaged by vertex weight norm.
    ///
    /// Falls back to the midpoint when both norms are zero, and to the placed
    /// vertex when only one of them has a location.
    pub fn avg_placement_loc(&self, graph: &Hypergraph, v: VertexId, u: VertexId) -> Vec<f64> {
        let pv = &graph.vertex(v).placement;
        let pu = &graph.vertex(u).placement;
        match (pv.is_empty(), pu.is_empty()) {
            (true, true) => return Vec::new(),
            (false, true) => return pv.clone(),
            (true, false) => return pu.clone(),
            (false, false) => {}
        }
        let wv = self.vertex_weight_norm(graph, v);
        let wu = self.vertex_weight_norm(graph, u);
        let total = wv + wu;
        if total == 0.0 {
            return weights::scale(&weights::add(pv, pu), 0.5);
        }
        let mut loc = weights::scale(pv, wv / total);
        weights::add_assign(&mut loc, &weights::scale(pu, wu / total));
        loc
    }
}

/// Walks a path and counts its block boundary crossings and block re-entries.
pub(crate) fn path_crossings(
    graph: &Hypergraph,
    path: PathId,
    block_of: impl Fn(VertexId) -> BlockId,
) -> PathCrossings {
    let mut segments = 0;
    let mut visited: Vec<BlockId> = Vec::new();
    let mut last = None;
    for &v in &graph.path(path).vertices {
        let block = block_of(v);
        if last == Some(block) {
            continue;
        }
        segments += 1;
        if !visited.contains(&block) {
            visited.push(block);
        }
        last = Some(block);
    }
    if segments == 0 {
        return PathCrossings {
            cuts: 0,
            reentries: 0,
        };
    }
    PathCrossings {
        cuts: segments - 1,
        reentries: segments - visited.len(),
    }
}
