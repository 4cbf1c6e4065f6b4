//! Cost, gain and balance evaluation for hypergraph partitions.
//!
//! The [`Evaluator`] holds the cost weight factors of one refinement setup and
//! answers queries over a `(Hypergraph, Partition)` pair: net degrees, block
//! balances, hyperedge and path costs, move legality and move gains. It never
//! owns the partition; the only mutating entry point is
//! [`accept_move`](Evaluator::accept_move), which commits a move into a
//! [`RefineState`](crate::RefineState).
//!
//! The cost of a partition is the summed cost of its cut hyperedges plus the
//! cost of every critical path (timing cut cost and snaking penalty).

mod cost;
mod moves;
mod timing;

pub use cost::TimingCuts;
pub use moves::HyperedgeGain;

use crate::error::RefineError;
use tpart_common::weights::{self, zero_matrix, Matrix};
use tpart_common::{BlockId, HyperedgeId};
use tpart_config::{validate_config, RefineConfig};
use tpart_hgraph::Hypergraph;

/// The score of a partitioning solution.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionToken {
    /// Total cost: cut hyperedges plus critical paths.
    pub cost: f64,
    /// Block balance, one row per block and one column per weight dimension.
    pub balance: Matrix<f64>,
}

/// Cost, gain and balance evaluator for one refinement setup.
///
/// Built once per hypergraph from a [`RefineConfig`] and then borrowed by
/// every consumer (refinement passes, the multi-pass driver, reporting).
#[derive(Debug, Clone)]
pub struct Evaluator {
    num_parts: usize,
    e_wt_factors: Vec<f64>,
    v_wt_factors: Vec<f64>,
    placement_wt_factors: Vec<f64>,
    timing_factor: f64,
    path_wt_factor: f64,
    snaking_wt_factor: f64,
    timing_exp_factor: f64,
    extra_cut_delay: f64,
}

impl Evaluator {
    /// Creates an evaluator for `graph` from a validated configuration.
    ///
    /// Fails if the configuration is invalid on its own or if a weight factor
    /// vector does not match the corresponding graph dimension.
    pub fn new(config: &RefineConfig, graph: &Hypergraph) -> Result<Self, RefineError> {
        validate_config(config)?;
        let factors = &config.weights;
        check_factor_len(
            "weights.hyperedge",
            factors.hyperedge.len(),
            graph.hyperedge_dimensions,
        )?;
        check_factor_len("weights.vertex", factors.vertex.len(), graph.vertex_dimensions)?;
        if !factors.placement.is_empty() {
            check_factor_len(
                "weights.placement",
                factors.placement.len(),
                graph.placement_dimensions,
            )?;
        }

        Ok(Self {
            num_parts: config.partition.num_parts,
            e_wt_factors: factors.hyperedge.clone(),
            v_wt_factors: factors.vertex.clone(),
            placement_wt_factors: factors.placement.clone(),
            timing_factor: config.timing.net_factor,
            path_wt_factor: config.timing.path_factor,
            snaking_wt_factor: config.timing.snaking_factor,
            timing_exp_factor: config.timing.exp_factor,
            extra_cut_delay: config.timing.extra_cut_delay,
        })
    }

    /// Returns the number of blocks.
    pub fn num_parts(&self) -> usize {
        self.num_parts
    }

    /// Returns an iterator over all block IDs in ascending order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockId> {
        (0..self.num_parts as u32).map(BlockId::from_raw)
    }

    /// Counts, for every hyperedge, how many of its pins lie in each block.
    pub fn net_degrees(&self, graph: &Hypergraph, solution: &[BlockId]) -> Matrix<u32> {
        let mut net_degs = zero_matrix(graph.hyperedge_count(), self.num_parts);
        for e in graph.hyperedge_ids() {
            for &v in graph.pins(e) {
                net_degs[e.index()][solution[v.index()].index()] += 1;
            }
        }
        net_degs
    }

    /// Sums the vertex weights of every block, per dimension.
    pub fn block_balance(&self, graph: &Hypergraph, solution: &[BlockId]) -> Matrix<f64> {
        let mut balance = zero_matrix(self.num_parts, graph.vertex_dimensions);
        for v in graph.vertex_ids() {
            weights::add_assign(
                &mut balance[solution[v.index()].index()],
                graph.vertex_weights(v),
            );
        }
        balance
    }

    /// Returns the number of blocks holding at least one pin of a hyperedge,
    /// given its row of the net-degree matrix.
    pub fn block_span(net_degs: &[u32]) -> usize {
        net_degs.iter().filter(|&&d| d > 0).count()
    }

    /// Returns whether the pins of `e` span more than one block.
    pub fn is_cut(&self, graph: &Hypergraph, e: HyperedgeId, solution: &[BlockId]) -> bool {
        let mut pins = graph.pins(e).iter().map(|v| solution[v.index()]);
        match pins.next() {
            Some(first) => pins.any(|b| b != first),
            None => false,
        }
    }

    /// Returns every hyperedge cut by the partition, in ascending ID order.
    pub fn cut_hyperedges(&self, graph: &Hypergraph, solution: &[BlockId]) -> Vec<HyperedgeId> {
        graph
            .hyperedge_ids()
            .filter(|&e| self.is_cut(graph, e, solution))
            .collect()
    }

    /// Scores a whole partition: total cost and block balance.
    pub fn cut_evaluate(&self, graph: &Hypergraph, solution: &[BlockId]) -> PartitionToken {
        let edge_cost: f64 = self
            .cut_hyperedges(graph, solution)
            .into_iter()
            .map(|e| self.hyperedge_cost(graph, e))
            .sum();
        let path_cost: f64 = self.paths_cost(graph, solution).iter().sum();
        PartitionToken {
            cost: edge_cost + path_cost,
            balance: self.block_balance(graph, solution),
        }
    }

    /// Checks that a balance bound matrix has one row per block and one
    /// column per vertex weight dimension.
    pub fn check_balance_limits(
        &self,
        graph: &Hypergraph,
        max_block_balance: &[Vec<f64>],
    ) -> Result<(), RefineError> {
        if max_block_balance.len() != self.num_parts
            || max_block_balance
                .iter()
                .any(|row| row.len() != graph.vertex_dimensions)
        {
            return Err(RefineError::InvalidConfiguration(format!(
                "balance bounds must be {} x {}",
                self.num_parts, graph.vertex_dimensions
            )));
        }
        Ok(())
    }
}

fn check_factor_len(name: &str, actual: usize, expected: usize) -> Result<(), RefineError> {
    if actual == expected {
        Ok(())
    } else {
        Err(RefineError::InvalidConfiguration(format!(
            "{name} has {actual} factors but the graph has {expected} dimensions"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_graph() -> Hypergraph {
        let mut g = Hypergraph::new(2, 1, 0);
        let a = g.add_vertex("a", vec![1.0, 2.0], vec![]).unwrap();
        let b = g.add_vertex("b", vec![3.0, 0.0], vec![]).unwrap();
        let c = g.add_vertex("c", vec![1.0, 1.0], vec![]).unwrap();
        g.add_hyperedge(vec![a, b], vec![2.0]).unwrap();
        g.add_hyperedge(vec![a, b, c], vec![5.0]).unwrap();
        g
    }

    fn make_config() -> RefineConfig {
        let mut config = RefineConfig::default();
        config.partition.num_parts = 3;
        config.weights.vertex = vec![1.0, 1.0];
        config
    }

    fn blocks(raw: &[u32]) -> Vec<BlockId> {
        raw.iter().copied().map(BlockId::from_raw).collect()
    }

    #[test]
    fn net_degrees_count_pins_per_block() {
        let g = make_graph();
        let ev = Evaluator::new(&make_config(), &g).unwrap();
        let degs = ev.net_degrees(&g, &blocks(&[0, 0, 2]));
        assert_eq!(degs, vec![vec![2, 0, 0], vec![2, 0, 1]]);
        assert_eq!(Evaluator::block_span(&degs[0]), 1);
        assert_eq!(Evaluator::block_span(&degs[1]), 2);
    }

    #[test]
    fn block_balance_sums_weights() {
        let g = make_graph();
        let ev = Evaluator::new(&make_config(), &g).unwrap();
        let balance = ev.block_balance(&g, &blocks(&[0, 1, 0]));
        assert_eq!(balance, vec![vec![2.0, 3.0], vec![3.0, 0.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn cut_evaluate_sums_cut_edges() {
        let g = make_graph();
        let ev = Evaluator::new(&make_config(), &g).unwrap();

        let token = ev.cut_evaluate(&g, &blocks(&[0, 0, 0]));
        assert_eq!(token.cost, 0.0);

        let token = ev.cut_evaluate(&g, &blocks(&[0, 0, 1]));
        assert_eq!(token.cost, 5.0);
        assert_eq!(
            ev.cut_hyperedges(&g, &blocks(&[0, 0, 1])),
            vec![HyperedgeId::from_raw(1)]
        );

        let token = ev.cut_evaluate(&g, &blocks(&[1, 0, 0]));
        assert_eq!(token.cost, 7.0);
        assert_eq!(token.balance[1], vec![1.0, 2.0]);
    }

    #[test]
    fn rejects_mismatched_hyperedge_factors() {
        let g = make_graph();
        let mut config = make_config();
        config.weights.hyperedge = vec![1.0, 1.0];
        let err = Evaluator::new(&config, &g).unwrap_err();
        assert!(matches!(err, RefineError::InvalidConfiguration(_)));
    }

    #[test]
    fn rejects_mismatched_vertex_factors() {
        let g = make_graph();
        let mut config = make_config();
        config.weights.vertex = vec![1.0];
        assert!(matches!(
            Evaluator::new(&config, &g),
            Err(RefineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_invalid_config() {
        let g = make_graph();
        let mut config = make_config();
        config.partition.num_parts = 1;
        assert!(matches!(
            Evaluator::new(&config, &g),
            Err(RefineError::Config(_))
        ));
    }

    #[test]
    fn balance_limit_shape() {
        let g = make_graph();
        let ev = Evaluator::new(&make_config(), &g).unwrap();
        assert!(ev.check_balance_limits(&g, &vec![vec![9.0, 9.0]; 3]).is_ok());
        assert!(ev.check_balance_limits(&g, &vec![vec![9.0, 9.0]; 2]).is_err());
        assert!(ev.check_balance_limits(&g, &vec![vec![9.0]; 3]).is_err());
    }
}
