//! Opinion values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use weft_types::NodeId;

/// A binary opinion about a ledger object; `Unknown` marks the absence of
/// one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opinion {
    #[default]
    Unknown = 0,
    Like = 1,
    Dislike = 2,
}

impl Opinion {
    /// The numeric form used by the own-opinion bias: like is 1, dislike 0,
    /// unknown is negative to flag invalid input.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Like => 1.0,
            Self::Dislike => 0.0,
            Self::Unknown => -1.0,
        }
    }
}

/// The opinions one giver returned in a round, with the multiplicity its
/// selection carries in the tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueriedOpinions {
    /// Identity of the queried giver.
    pub opinion_giver_id: NodeId,
    /// Opinion per queried subject id.
    pub opinions: HashMap<String, Opinion>,
    /// How often the giver was selected by the sampler; its opinions count
    /// this many times.
    pub times_counted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_form() {
        assert_eq!(Opinion::Like.as_f64(), 1.0);
        assert_eq!(Opinion::Dislike.as_f64(), 0.0);
        assert!(Opinion::Unknown.as_f64() < 0.0);
    }
}
