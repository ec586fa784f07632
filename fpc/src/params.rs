//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// All tunables of the FPC engine. Immutable once the engine is constructed;
/// there are no ambient or global defaults beyond [`FpcParameters::default`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FpcParameters {
    /// Lower bound of the threshold band for the first opinion-forming
    /// round. Default 0.67.
    pub first_round_lower_bound_threshold: f64,
    /// Upper bound for the first opinion-forming round. Default 0.67.
    pub first_round_upper_bound_threshold: f64,
    /// Lower bound for the middle rounds. Default 0.50.
    pub subsequent_rounds_lower_bound_threshold: f64,
    /// Upper bound for the middle rounds. Default 0.67.
    pub subsequent_rounds_upper_bound_threshold: f64,
    /// Fixed threshold for the terminal rounds. Default 0.50.
    pub ending_rounds_fixed_threshold: f64,
    /// Rounds to skip before opinion forming counts toward finalization.
    /// Default 0.
    pub total_rounds_cooling_off_period: u32,
    /// Consecutive identical opinions required to finalize. Default 10.
    pub total_rounds_finalization: u32,
    /// Number of trailing rounds that use the fixed threshold. Default 3.
    pub total_rounds_fixed_threshold: u32,
    /// Hard ceiling on rounds per vote context; reaching it fails the vote.
    /// Default 100.
    pub max_rounds_per_vote_context: u32,
    /// Target number of distinct opinion givers per query round. Default 21.
    pub query_sample_size: usize,
    /// Ceiling on sampling attempts when drawing distinct givers. Default
    /// 100.
    pub max_query_sample_size: usize,
    /// Below this many received opinions the liked proportion of a subject
    /// is left unchanged. Default 1.
    pub min_opinions_received: usize,
    /// Deadline per opinion query. Default 6500 ms.
    pub query_timeout: Duration,
}

impl Default for FpcParameters {
    fn default() -> Self {
        Self {
            first_round_lower_bound_threshold: 0.67,
            first_round_upper_bound_threshold: 0.67,
            subsequent_rounds_lower_bound_threshold: 0.50,
            subsequent_rounds_upper_bound_threshold: 0.67,
            ending_rounds_fixed_threshold: 0.50,
            total_rounds_cooling_off_period: 0,
            total_rounds_finalization: 10,
            total_rounds_fixed_threshold: 3,
            max_rounds_per_vote_context: 100,
            query_sample_size: 21,
            max_query_sample_size: 100,
            min_opinions_received: 1,
            query_timeout: Duration::from_millis(6500),
        }
    }
}
