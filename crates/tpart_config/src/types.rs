//! Configuration types deserialized from `tpart.toml`.

use serde::{Deserialize, Serialize};

/// The top-level refinement configuration parsed from `tpart.toml`.
///
/// Every section is optional; missing sections and fields fall back to the
/// values of [`RefineConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Block count and balance settings.
    pub partition: PartitionConfig,
    /// Weight factor vectors.
    pub weights: WeightConfig,
    /// Timing cost factors.
    pub timing: TimingConfig,
    /// Pass budget and multi-pass driver settings.
    pub refine: PassConfig,
}

/// Block count and balance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Number of blocks in the partition.
    pub num_parts: usize,
    /// Allowed imbalance in percent of the total weight, used to derive the
    /// per-block upper balance bound.
    pub ub_factor: f64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            num_parts: 2,
            ub_factor: 5.0,
        }
    }
}

/// Weight factor vectors combined with vertex, hyperedge and placement data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Factors dotted with a hyperedge weight vector to get its structural cut cost.
    pub hyperedge: Vec<f64>,
    /// Factors dotted with a vertex weight vector to get its weight norm.
    pub vertex: Vec<f64>,
    /// Per-coordinate factors of the placement distance. Empty for unplaced graphs.
    pub placement: Vec<f64>,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            hyperedge: vec![1.0],
            vertex: vec![1.0],
            placement: Vec::new(),
        }
    }
}

/// Timing cost factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Factor applied to the timing cost of a cut hyperedge.
    pub net_factor: f64,
    /// Cost of cutting a critical path once, scaled by the path timing cost.
    pub path_factor: f64,
    /// Cost of each re-entry of a critical path into a block it already visited.
    pub snaking_factor: f64,
    /// Exponent applied to the normalized criticality.
    pub exp_factor: f64,
    /// Normalized delay added to a connection when it crosses a block boundary.
    pub extra_cut_delay: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            net_factor: 1.0,
            path_factor: 1.0,
            snaking_factor: 1.0,
            exp_factor: 2.0,
            extra_cut_delay: 1.0,
        }
    }
}

/// Pass budget and multi-pass driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// Maximum number of straddled hyperedges considered in one pass.
    pub max_moves: usize,
    /// Maximum number of passes run by the multi-pass driver.
    pub max_passes: usize,
    /// The driver stops once a pass gains no more than this.
    pub min_gain: f64,
    /// Whether the driver refreshes slacks from the partition between passes.
    pub update_timing: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            max_moves: 1000,
            max_passes: 10,
            min_gain: 0.0,
            update_timing: true,
        }
    }
}
