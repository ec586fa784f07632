//! Event wiring for consensus outcomes.
//!
//! A plain multi-consumer observer list: handlers attach and detach at any
//! time and run synchronously on the thread driving the round. Handler lists
//! are snapshotted before triggering, so a handler may attach, detach or
//! re-enter the engine without deadlocking.

use crate::context::VoteContext;
use crate::error::FpcError;
use crate::opinion::{Opinion, QueriedOpinions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Identifies an attached handler so it can be detached again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A single event with attach/detach/trigger semantics.
pub struct Event<T> {
    handlers: Mutex<Vec<(u64, Handler<T>)>>,
    next_id: AtomicU64,
}

impl<T> Event<T> {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Attach a handler; returns the id to detach it with.
    pub fn attach(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> HandlerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(handler)));
        HandlerId(id)
    }

    /// Detach a previously attached handler. Unknown ids are ignored.
    pub fn detach(&self, id: HandlerId) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(handler_id, _)| *handler_id != id.0);
    }

    /// Invoke every attached handler with the payload.
    pub fn trigger(&self, payload: &T) {
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in snapshot {
            handler(payload);
        }
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload of the `finalized` and `failed` events.
#[derive(Clone, Debug)]
pub struct OpinionEvent {
    /// Subject the vote was about.
    pub id: String,
    /// The final (or last held) opinion.
    pub opinion: Opinion,
    /// Snapshot of the vote context at the time of the event.
    pub context: VoteContext,
}

/// Statistics of one executed round.
#[derive(Clone, Debug)]
pub struct RoundStats {
    /// Wall-clock duration of the round.
    pub duration: Duration,
    /// The random number the round was driven with.
    pub rand_used: f64,
    /// Snapshot of the vote contexts still active after the round.
    pub active_vote_contexts: HashMap<String, VoteContext>,
    /// The opinions obtained from every successfully queried giver.
    pub queried_opinions: Vec<QueriedOpinions>,
}

/// The events the engine emits.
#[derive(Default)]
pub struct FpcEvents {
    /// A vote context reached a stable opinion and was removed.
    pub finalized: Event<OpinionEvent>,
    /// A vote context hit the round ceiling without finalizing.
    pub failed: Event<OpinionEvent>,
    /// A round completed successfully (fires after finalized/failed).
    pub round_executed: Event<RoundStats>,
    /// A round-level failure occurred.
    pub error: Event<FpcError>,
}

impl FpcEvents {
    pub fn new() -> Self {
        Self::default()
    }
}
