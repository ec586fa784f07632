//! The FPC round engine.
//!
//! One driver thread calls [`Fpc::round`] at its own cadence, supplying the
//! round's random number (from a clock-seeded or distributed source).
//! [`Fpc::vote`] may be called concurrently; admissions become visible at the
//! next round's enqueue step. Lock order is pending queue before contexts on
//! every path, and no lock is held across the query fan-out.

use crate::context::{VoteContext, VoteObjectType, VotingWeights};
use crate::error::FpcError;
use crate::events::{FpcEvents, OpinionEvent, RoundStats};
use crate::giver::{OpinionGiverFn, OwnWeightFn};
use crate::opinion::{Opinion, QueriedOpinions};
use crate::params::FpcParameters;
use crate::sampler::mana_based_sampling;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, trace};

/// Interpolate the round's threshold inside the configured band.
fn rand_uniform_threshold(rand: f64, lower: f64, upper: f64) -> f64 {
    lower + rand * (upper - lower)
}

struct PendingQueue {
    queue: VecDeque<VoteContext>,
    ids: HashSet<String>,
}

/// The round-based voter: finalizes opinions by sampling opinion givers each
/// round and comparing the (own-opinion biased) liked proportion against a
/// randomized threshold.
pub struct Fpc {
    opinion_giver_fn: OpinionGiverFn,
    own_weight_fn: OwnWeightFn,
    params: FpcParameters,
    events: FpcEvents,
    /// FIFO of admitted but not yet active vote contexts.
    queue: Mutex<PendingQueue>,
    /// The active vote contexts by subject id.
    ctxs: RwLock<HashMap<String, VoteContext>>,
    /// Whether the previous round's query phase completed; opinion forming
    /// is skipped after a failed round.
    last_round_successful: AtomicBool,
    /// Giver-selection randomness; owned by the round driver.
    rng: Mutex<StdRng>,
}

impl Fpc {
    /// Create an engine with default parameters.
    pub fn new(opinion_giver_fn: OpinionGiverFn, own_weight_fn: OwnWeightFn) -> Self {
        Self::with_params(opinion_giver_fn, own_weight_fn, FpcParameters::default())
    }

    pub fn with_params(
        opinion_giver_fn: OpinionGiverFn,
        own_weight_fn: OwnWeightFn,
        params: FpcParameters,
    ) -> Self {
        Self {
            opinion_giver_fn,
            own_weight_fn,
            params,
            events: FpcEvents::new(),
            queue: Mutex::new(PendingQueue {
                queue: VecDeque::new(),
                ids: HashSet::new(),
            }),
            ctxs: RwLock::new(HashMap::new()),
            last_round_successful: AtomicBool::new(false),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the giver-selection RNG, e.g. with a seeded generator for
    /// deterministic tests.
    pub fn set_rng(&self, rng: StdRng) {
        *self.rng.lock().unwrap_or_else(PoisonError::into_inner) = rng;
    }

    pub fn events(&self) -> &FpcEvents {
        &self.events
    }

    pub fn params(&self) -> &FpcParameters {
        &self.params
    }

    /// Submit a subject for voting with an initial opinion.
    ///
    /// Fails when a vote for the id is already pending or active. The two
    /// locks are taken together so the uniqueness check is atomic against a
    /// concurrent round.
    pub fn vote(
        &self,
        id: impl Into<String>,
        object_type: VoteObjectType,
        initial_opinion: Opinion,
    ) -> Result<(), FpcError> {
        let id = id.into();
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let ctxs = self.ctxs.read().unwrap_or_else(PoisonError::into_inner);
        if queue.ids.contains(&id) || ctxs.contains_key(&id) {
            return Err(FpcError::DuplicateVote(id));
        }
        queue
            .queue
            .push_back(VoteContext::new(id.clone(), object_type, initial_opinion));
        queue.ids.insert(id);
        Ok(())
    }

    /// The last formed opinion of an active vote.
    pub fn intermediate_opinion(&self, id: &str) -> Result<Opinion, FpcError> {
        let ctxs = self.ctxs.read().unwrap_or_else(PoisonError::into_inner);
        ctxs.get(id)
            .map(VoteContext::last_opinion)
            .ok_or_else(|| FpcError::VotingNotFound(id.to_string()))
    }

    /// Execute one round: enqueue admissions, form opinions from the last
    /// tally, finalize settled contexts, then query a fresh sample of
    /// opinion givers.
    ///
    /// `rand` must lie in `[0, 1]`; it positions every context's threshold
    /// inside its configured band for this round.
    pub async fn round(&self, rand: f64) -> Result<(), FpcError> {
        let start = Instant::now();
        self.enqueue();

        // opinions can only be formed on a tally obtained by a successful
        // previous round
        if self.last_round_successful.load(Ordering::Acquire) {
            self.form_opinions(rand);
            self.finalize_opinions();
        }

        // a round counts even when no opinion was formed, so stale contexts
        // eventually hit the ceiling and get cleared
        {
            let mut ctxs = self.ctxs.write().unwrap_or_else(PoisonError::into_inner);
            for ctx in ctxs.values_mut() {
                ctx.rounds += 1;
            }
        }

        match self.query_opinions().await {
            Ok(queried_opinions) => {
                self.last_round_successful.store(true, Ordering::Release);
                let active_vote_contexts = self
                    .ctxs
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                debug!(
                    active = active_vote_contexts.len(),
                    queried = queried_opinions.len(),
                    rand,
                    "round executed"
                );
                let stats = RoundStats {
                    duration: start.elapsed(),
                    rand_used: rand,
                    active_vote_contexts,
                    queried_opinions,
                };
                self.events.round_executed.trigger(&stats);
                Ok(())
            }
            Err(err) => {
                self.last_round_successful.store(false, Ordering::Release);
                debug!(error = %err, "round failed");
                self.events.error.trigger(&err);
                Err(err)
            }
        }
    }

    /// Drain the pending queue into the active contexts. An id that raced an
    /// active context is dropped.
    fn enqueue(&self) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ctxs = self.ctxs.write().unwrap_or_else(PoisonError::into_inner);
        while let Some(ctx) = queue.queue.pop_front() {
            queue.ids.remove(&ctx.id);
            ctxs.entry(ctx.id.clone()).or_insert(ctx);
        }
    }

    /// Append one opinion to every context that has a tally, comparing the
    /// biased liked proportion against this round's threshold.
    fn form_opinions(&self, rand: f64) {
        let mut ctxs = self.ctxs.write().unwrap_or_else(PoisonError::into_inner);
        for ctx in ctxs.values_mut() {
            if ctx.is_new() {
                continue;
            }
            let (lower, upper) = self.thresholds(ctx);
            let biased = self.biased_proportion_liked(ctx);
            if biased < 0.0 {
                // no proportion observed, or inconsistent weights: nothing
                // to form this round
                trace!(id = %ctx.id, "no opinion formable this round");
                continue;
            }
            let threshold = rand_uniform_threshold(rand, lower, upper);
            if biased >= threshold {
                ctx.add_opinion(Opinion::Like);
            } else {
                ctx.add_opinion(Opinion::Dislike);
            }
            trace!(id = %ctx.id, biased, threshold, opinion = ?ctx.last_opinion(), "opinion formed");
        }
    }

    /// The threshold band for a context's current stage.
    fn thresholds(&self, ctx: &VoteContext) -> (f64, f64) {
        let mut lower = self.params.subsequent_rounds_lower_bound_threshold;
        let mut upper = self.params.subsequent_rounds_upper_bound_threshold;
        if ctx.had_first_round() {
            lower = self.params.first_round_lower_bound_threshold;
            upper = self.params.first_round_upper_bound_threshold;
        }
        if ctx.had_fixed_round(
            self.params.max_rounds_per_vote_context,
            self.params.total_rounds_fixed_threshold,
        ) {
            lower = self.params.ending_rounds_fixed_threshold;
            upper = self.params.ending_rounds_fixed_threshold;
        }
        (lower, upper)
    }

    /// Mix the node's own last opinion into the observed liked proportion,
    /// weighted by its mana share. Negative results flag contexts to skip.
    fn biased_proportion_liked(&self, ctx: &VoteContext) -> f64 {
        let own_mana = ctx.weights.own;
        let total_mana = ctx.weights.total;
        if own_mana > 0.0 && total_mana == 0.0 {
            // inconsistent weights
            return -1.0;
        }
        if ctx.proportion_liked < 0.0 {
            // no tally: peers unreachable or all queries dropped
            return ctx.proportion_liked;
        }
        if own_mana == 0.0 || total_mana == 0.0 {
            // no mana (uniform sampling): the own opinion carries no weight
            return ctx.proportion_liked;
        }
        let own_opinion = ctx.last_opinion().as_f64();
        if own_opinion < 0.0 {
            return ctx.proportion_liked;
        }
        let own_share = own_mana / total_mana;
        own_share * own_opinion + (1.0 - own_share) * ctx.proportion_liked
    }

    /// Remove settled and timed-out contexts, emitting their events after
    /// the contexts lock is released.
    fn finalize_opinions(&self) {
        let mut finalized = Vec::new();
        let mut failed = Vec::new();
        {
            let mut ctxs = self.ctxs.write().unwrap_or_else(PoisonError::into_inner);
            ctxs.retain(|id, ctx| {
                if ctx.is_finalized(
                    self.params.total_rounds_cooling_off_period,
                    self.params.total_rounds_finalization,
                ) {
                    finalized.push(OpinionEvent {
                        id: id.clone(),
                        opinion: ctx.last_opinion(),
                        context: ctx.clone(),
                    });
                    return false;
                }
                if ctx.rounds >= self.params.max_rounds_per_vote_context {
                    failed.push(OpinionEvent {
                        id: id.clone(),
                        opinion: ctx.last_opinion(),
                        context: ctx.clone(),
                    });
                    return false;
                }
                true
            });
        }
        for event in &finalized {
            debug!(id = %event.id, opinion = ?event.opinion, rounds = event.context.rounds, "vote finalized");
            self.events.finalized.trigger(event);
        }
        for event in &failed {
            debug!(id = %event.id, rounds = event.context.rounds, "vote failed");
            self.events.failed.trigger(event);
        }
    }

    /// The active subject ids, split by object type.
    fn vote_context_ids(&self) -> (Vec<String>, Vec<String>) {
        let ctxs = self.ctxs.read().unwrap_or_else(PoisonError::into_inner);
        let mut conflict_ids = Vec::new();
        let mut timestamp_ids = Vec::new();
        for (id, ctx) in ctxs.iter() {
            match ctx.object_type {
                VoteObjectType::Conflict => conflict_ids.push(id.clone()),
                VoteObjectType::Timestamp => timestamp_ids.push(id.clone()),
            }
        }
        // deterministic query order
        conflict_ids.sort();
        timestamp_ids.sort();
        (conflict_ids, timestamp_ids)
    }

    /// Query a sample of opinion givers about every active subject and
    /// update the contexts' tallies.
    async fn query_opinions(&self) -> Result<Vec<QueriedOpinions>, FpcError> {
        let (conflict_ids, timestamp_ids) = self.vote_context_ids();
        if conflict_ids.is_empty() && timestamp_ids.is_empty() {
            return Ok(Vec::new());
        }

        let givers = (self.opinion_giver_fn)()?;
        if givers.is_empty() {
            return Err(FpcError::NoOpinionGivers);
        }

        let manas: Vec<f64> = givers.iter().map(|giver| giver.mana()).collect();
        let (selection, total_giver_mana) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            mana_based_sampling(
                &manas,
                self.params.max_query_sample_size,
                self.params.query_sample_size,
                &mut *rng,
            )
        };

        let own_mana = (self.own_weight_fn)()?;
        let total_mana = total_giver_mana + own_mana;
        trace!(own_mana, total_mana, sampled = selection.len(), "dispatching queries");

        let conflict_ids = Arc::new(conflict_ids);
        let timestamp_ids = Arc::new(timestamp_ids);
        let expected_opinions = conflict_ids.len() + timestamp_ids.len();

        let mut handles = Vec::with_capacity(selection.len());
        for (index, selected_count) in selection {
            let giver = givers[index].clone();
            let conflict_ids = conflict_ids.clone();
            let timestamp_ids = timestamp_ids.clone();
            let deadline = self.params.query_timeout;
            handles.push(tokio::spawn(async move {
                match tokio::time::timeout(deadline, giver.query(&conflict_ids, &timestamp_ids))
                    .await
                {
                    Ok(Ok(opinions)) if opinions.len() == expected_opinions => {
                        Some((giver.id(), selected_count, opinions))
                    }
                    // transport error, wrong answer length, or deadline
                    // exceeded: this giver contributes nothing this round
                    _ => None,
                }
            }));
        }

        let mut vote_map: HashMap<String, Vec<Opinion>> = conflict_ids
            .iter()
            .chain(timestamp_ids.iter())
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        let mut all_queried_opinions = Vec::new();

        for handle in handles {
            let Ok(Some((giver_id, selected_count, opinions))) = handle.await else {
                continue;
            };
            let mut queried = QueriedOpinions {
                opinion_giver_id: giver_id,
                opinions: HashMap::with_capacity(expected_opinions),
                times_counted: selected_count,
            };
            for (i, id) in conflict_ids.iter().enumerate() {
                let Some(votes) = vote_map.get_mut(id) else {
                    continue;
                };
                for _ in 0..selected_count {
                    votes.push(opinions[i]);
                }
                queried.opinions.insert(id.clone(), opinions[i]);
            }
            for (i, id) in timestamp_ids.iter().enumerate() {
                let opinion = opinions[conflict_ids.len() + i];
                let Some(votes) = vote_map.get_mut(id) else {
                    continue;
                };
                for _ in 0..selected_count {
                    votes.push(opinion);
                }
                queried.opinions.insert(id.clone(), opinion);
            }
            all_queried_opinions.push(queried);
        }

        let mut ctxs = self.ctxs.write().unwrap_or_else(PoisonError::into_inner);
        for (id, votes) in &vote_map {
            let Some(ctx) = ctxs.get_mut(id) else {
                continue;
            };
            ctx.weights = VotingWeights {
                own: own_mana,
                total: total_mana,
            };

            let mut voted_count = votes.len();
            let mut liked_sum = 0.0;
            for opinion in votes {
                match opinion {
                    Opinion::Unknown => voted_count -= 1,
                    Opinion::Like => liked_sum += 1.0,
                    Opinion::Dislike => {}
                }
            }

            if voted_count == 0 || voted_count < self.params.min_opinions_received {
                continue;
            }
            ctx.proportion_liked = liked_sum / voted_count as f64;
            trace!(id = %id, proportion = ctx.proportion_liked, voted = voted_count, "tallied");
        }

        Ok(all_queried_opinions)
    }
}
