//! Timing attributes attached to hyperedges and critical paths.
//!
//! Slacks are normalized by the clock period: `1.0` means the connection is
//! fully relaxed, values at or below `0.0` mean the constraint is violated.
//! The `base_slack` is the slack of the unpartitioned design and never
//! changes; `slack` is the current estimate after accounting for the extra
//! delay of cut connections, and `cost` is the timing weight derived from it.

use serde::{Deserialize, Serialize};

/// Slack and derived timing cost of a hyperedge or a timing path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingAttr {
    /// Normalized slack before any partitioning delay was applied.
    pub base_slack: f64,
    /// Current normalized slack.
    pub slack: f64,
    /// Timing weight; paths derive it from `slack`, hyperedges from the
    /// slack they would have when cut.
    pub cost: f64,
}

impl TimingAttr {
    /// Creates timing attributes with the given normalized slack and no cost yet.
    pub fn new(slack: f64) -> Self {
        Self {
            base_slack: slack,
            slack,
            cost: 0.0,
        }
    }

    /// Sets the current slack to the base slack reduced by `delay`.
    pub fn degrade(&mut self, delay: f64) {
        self.slack = self.base_slack - delay;
    }
}
