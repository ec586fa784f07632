//! Fast Probabilistic Consensus (FPC).
//!
//! A round-based voting protocol that finalizes a binary opinion (like /
//! dislike) on ledger objects by repeatedly querying a random, mana-weighted
//! sample of remote opinion givers and biasing the observed result toward
//! the node's own current opinion. An external driver (clock or distributed
//! random beacon) supplies one random number per round and calls
//! [`Fpc::round`] at its cadence.
//!
//! ## Module overview
//!
//! - [`opinion`] — the opinion values and per-giver query results.
//! - [`context`] — per-subject voting state across rounds.
//! - [`params`] — the immutable engine configuration.
//! - [`sampler`] — mana-weighted and uniform opinion-giver sampling.
//! - [`giver`] — the interface to remote opinion givers.
//! - [`events`] — finalized/failed/round-executed event wiring.
//! - [`engine`] — queue admission, round execution, finalization.
//! - [`error`] — consensus error types.

pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod giver;
pub mod opinion;
pub mod params;
pub mod sampler;

pub use context::{VoteContext, VoteObjectType, VotingWeights};
pub use engine::Fpc;
pub use error::FpcError;
pub use events::{Event, FpcEvents, HandlerId, OpinionEvent, RoundStats};
pub use giver::{OpinionGiver, OpinionGiverFn, OwnWeightFn};
pub use opinion::{Opinion, QueriedOpinions};
pub use params::FpcParameters;
