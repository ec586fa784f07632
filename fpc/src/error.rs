//! Consensus error types.

use thiserror::Error;

/// Errors surfaced by the FPC engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FpcError {
    #[error("a vote is already ongoing for id {0}")]
    DuplicateVote(String),

    #[error("no vote is ongoing for id {0}")]
    VotingNotFound(String),

    #[error("no opinion givers are available")]
    NoOpinionGivers,

    #[error("opinion givers unavailable: {0}")]
    OpinionGiversUnavailable(String),

    #[error("opinion query failed: {0}")]
    QueryFailed(String),
}
