//! The interface to remote opinion givers.
//!
//! Opinion givers live outside this crate (they are peers reached over the
//! network); the engine only needs an identity, a mana weight and a way to
//! query opinions with a deadline.

use crate::error::FpcError;
use crate::opinion::Opinion;
use async_trait::async_trait;
use std::sync::Arc;
use weft_types::NodeId;

/// A remote entity whose opinion can be queried.
#[async_trait]
pub trait OpinionGiver: Send + Sync {
    /// Stable unique identity of the peer.
    fn id(&self) -> NodeId;

    /// The giver's current consensus mana; never negative.
    fn mana(&self) -> f64;

    /// Query opinions on the given subjects.
    ///
    /// The returned opinions must be ordered as the concatenation of
    /// `conflict_ids` and `timestamp_ids`; any other length is treated as a
    /// failed query. Errors surface transport failures.
    async fn query(
        &self,
        conflict_ids: &[String],
        timestamp_ids: &[String],
    ) -> Result<Vec<Opinion>, FpcError>;
}

/// Supplies the current set of opinion givers at the start of a query round.
pub type OpinionGiverFn =
    Box<dyn Fn() -> Result<Vec<Arc<dyn OpinionGiver>>, FpcError> + Send + Sync>;

/// Retrieves the node's own mana weight.
pub type OwnWeightFn = Box<dyn Fn() -> Result<f64, FpcError> + Send + Sync>;
