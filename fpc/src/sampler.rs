//! Opinion-giver sampling.
//!
//! Givers are drawn with probability proportional to their mana. Selecting
//! the same giver several times does not trigger extra queries; it raises the
//! multiplicity its single answer carries in the tally. When the pool holds
//! no meaningful mana the sampler falls back to uniform drawing.

use rand::Rng;
use std::collections::BTreeMap;

/// Total mana at or below this is treated as zero.
const TOTAL_MANA_TOLERANCE: f64 = 0.001;

/// Sample by cumulative mana weight.
///
/// Draws up to `max_query_sample_size` times, stopping early once
/// `query_sample_size` distinct givers are selected. Returns selection counts
/// keyed by giver index plus the total mana of the pool; a (near) zero total
/// falls back to [`uniform_sampling`] and reports a total of 0.
pub fn mana_based_sampling(
    manas: &[f64],
    max_query_sample_size: usize,
    query_sample_size: usize,
    rng: &mut impl Rng,
) -> (BTreeMap<usize, usize>, f64) {
    let mut cumulative = Vec::with_capacity(manas.len());
    let mut total_mana = 0.0;
    for mana in manas {
        total_mana += mana;
        cumulative.push(total_mana);
    }

    if total_mana.abs() <= TOTAL_MANA_TOLERANCE {
        return (uniform_sampling(manas.len(), query_sample_size, rng), 0.0);
    }

    let mut selected: BTreeMap<usize, usize> = BTreeMap::new();
    for _ in 0..max_query_sample_size {
        if selected.len() >= query_sample_size {
            break;
        }
        let rnd = rng.gen::<f64>() * total_mana;
        for (index, threshold) in cumulative.iter().enumerate() {
            if rnd < *threshold {
                *selected.entry(index).or_insert(0) += 1;
                break;
            }
        }
    }
    (selected, total_mana)
}

/// Draw `query_sample_size` times uniformly with replacement over
/// `giver_count` givers.
pub fn uniform_sampling(
    giver_count: usize,
    query_sample_size: usize,
    rng: &mut impl Rng,
) -> BTreeMap<usize, usize> {
    let mut selected = BTreeMap::new();
    if giver_count == 0 {
        return selected;
    }
    for _ in 0..query_sample_size {
        let index = rng.gen_range(0..giver_count);
        *selected.entry(index).or_insert(0) += 1;
    }
    selected
}
