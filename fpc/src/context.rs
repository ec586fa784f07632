//! Per-subject voting state.

use crate::opinion::Opinion;
use serde::{Deserialize, Serialize};

/// Marks a context whose liked proportion has never been observed.
const PROPORTION_UNKNOWN: f64 = -1.0;

/// What kind of ledger object a vote decides on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteObjectType {
    Conflict,
    Timestamp,
}

/// The mana weights used to bias a context toward the node's own opinion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VotingWeights {
    /// The node's own mana.
    pub own: f64,
    /// Total mana of the sampled givers plus the node's own.
    pub total: f64,
}

/// The voting state of one subject across rounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteContext {
    /// Opaque subject id (conflict hash or timestamp key).
    pub id: String,
    pub object_type: VoteObjectType,
    /// The liked proportion observed in the last tallied round, or −1 while
    /// no tally has happened yet.
    pub proportion_liked: f64,
    /// Completed rounds.
    pub rounds: u32,
    /// Append-only opinion history; index 0 is the initial opinion the vote
    /// was submitted with.
    pub opinions: Vec<Opinion>,
    pub weights: VotingWeights,
}

impl VoteContext {
    pub fn new(id: impl Into<String>, object_type: VoteObjectType, initial_opinion: Opinion) -> Self {
        Self {
            id: id.into(),
            object_type,
            proportion_liked: PROPORTION_UNKNOWN,
            rounds: 0,
            opinions: vec![initial_opinion],
            weights: VotingWeights::default(),
        }
    }

    pub fn add_opinion(&mut self, opinion: Opinion) {
        self.opinions.push(opinion);
    }

    /// The most recently formed opinion (the initial one until a round
    /// completes).
    pub fn last_opinion(&self) -> Opinion {
        // opinions is never empty; it is seeded with the initial opinion
        self.opinions[self.opinions.len() - 1]
    }

    /// Whether no query round has produced a tally for this context yet.
    pub fn is_new(&self) -> bool {
        self.proportion_liked == PROPORTION_UNKNOWN
    }

    /// Whether the context is forming its first opinion: exactly one query
    /// round has completed.
    pub fn had_first_round(&self) -> bool {
        self.rounds == 1
    }

    /// Whether the context is inside the terminal fixed-threshold window:
    /// no more than `fixed_rounds` rounds remain before the hard round
    /// ceiling.
    pub fn had_fixed_round(&self, max_rounds: u32, fixed_rounds: u32) -> bool {
        self.rounds.saturating_add(fixed_rounds) >= max_rounds
    }

    /// Whether the opinion has settled: past the cooling-off period and the
    /// last `finalization` formed opinions are identical.
    pub fn is_finalized(&self, cooling_off: u32, finalization: u32) -> bool {
        if finalization == 0 {
            return false;
        }
        // the first entry is the initial opinion, not a formed one
        let formed = self.opinions.len() - 1;
        if formed < (cooling_off + finalization) as usize {
            return false;
        }
        let window = &self.opinions[self.opinions.len() - finalization as usize..];
        window.iter().all(|opinion| *opinion == window[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(opinions: &[Opinion]) -> VoteContext {
        let mut ctx = VoteContext::new("ctx", VoteObjectType::Conflict, opinions[0]);
        for opinion in &opinions[1..] {
            ctx.add_opinion(*opinion);
        }
        ctx
    }

    #[test]
    fn new_context_is_new() {
        let ctx = VoteContext::new("a", VoteObjectType::Conflict, Opinion::Like);
        assert!(ctx.is_new());
        assert_eq!(ctx.rounds, 0);
        assert_eq!(ctx.last_opinion(), Opinion::Like);
    }

    #[test]
    fn tally_clears_is_new() {
        let mut ctx = VoteContext::new("a", VoteObjectType::Conflict, Opinion::Like);
        ctx.proportion_liked = 0.5;
        assert!(!ctx.is_new());
    }

    #[test]
    fn finalized_after_enough_identical_opinions() {
        use Opinion::{Dislike, Like};
        // initial + 3 formed, all equal
        assert!(ctx(&[Like, Like, Like, Like]).is_finalized(0, 3));
        // streak broken by a dislike inside the window
        assert!(!ctx(&[Like, Like, Dislike, Like]).is_finalized(0, 3));
        // not enough formed opinions yet
        assert!(!ctx(&[Like, Like, Like]).is_finalized(0, 3));
        // an early flip outside the window does not matter
        assert!(ctx(&[Like, Dislike, Like, Like, Like]).is_finalized(0, 3));
    }

    #[test]
    fn cooling_off_requires_more_opinions() {
        use Opinion::Like;
        let settled = ctx(&[Like, Like, Like, Like]);
        assert!(settled.is_finalized(0, 3));
        assert!(!settled.is_finalized(2, 3));
        assert!(ctx(&[Like, Like, Like, Like, Like, Like]).is_finalized(2, 3));
    }

    #[test]
    fn first_round_is_rounds_one() {
        let mut ctx = VoteContext::new("a", VoteObjectType::Timestamp, Opinion::Like);
        assert!(!ctx.had_first_round());
        ctx.rounds = 1;
        assert!(ctx.had_first_round());
        ctx.rounds = 2;
        assert!(!ctx.had_first_round());
    }

    #[test]
    fn fixed_round_window_counts_from_the_ceiling() {
        let mut ctx = VoteContext::new("a", VoteObjectType::Conflict, Opinion::Like);
        // max 10, fixed 3: rounds 7, 8, 9 are in the window
        ctx.rounds = 6;
        assert!(!ctx.had_fixed_round(10, 3));
        ctx.rounds = 7;
        assert!(ctx.had_fixed_round(10, 3));
        ctx.rounds = 9;
        assert!(ctx.had_fixed_round(10, 3));
    }
}
