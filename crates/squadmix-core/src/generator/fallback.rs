// Randomized fallback sampler.
//
// Rejection sampling with a hard attempt budget: pick an A-share, shuffle
// both full rosters, take the front of each, keep the union if it is valid
// and new. Not role-aware; validity is checked after the draw.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::{is_valid_candidate, BATCH_SIZE, MAX_FALLBACK_ATTEMPTS, MAX_FROM_SOURCE, MIN_FROM_SOURCE};
use crate::error::GenerateError;
use crate::roster::{team_key, CompositeRoster, Player, SQUAD_SIZE};

/// Draw `count` players from a shuffled copy of `pool`.
fn draw<'a, R: Rng + ?Sized>(
    pool: &'a [Player],
    count: usize,
    rng: &mut R,
) -> Result<Vec<&'a Player>, GenerateError> {
    let mut shuffled: Vec<&Player> = pool.iter().collect();
    shuffled.shuffle(rng);
    if count > shuffled.len() {
        return Err(GenerateError::Computation(format!(
            "cannot draw {count} players from a pool of {}",
            shuffled.len()
        )));
    }
    shuffled.truncate(count);
    Ok(shuffled)
}

/// Build one random candidate: `a_count` from `a`, the rest from `b`.
fn draw_candidate<'a, R: Rng + ?Sized>(
    a: &'a [Player],
    b: &'a [Player],
    rng: &mut R,
) -> Result<Vec<&'a Player>, GenerateError> {
    let a_count = rng.gen_range(MIN_FROM_SOURCE..=MAX_FROM_SOURCE);
    let b_count = SQUAD_SIZE - a_count;
    let mut candidate = draw(a, a_count, rng)?;
    candidate.extend(draw(b, b_count, rng)?);
    Ok(candidate)
}

/// Outcome of a fallback run.
#[derive(Debug, Clone, Default)]
pub struct FallbackResult {
    pub rosters: Vec<CompositeRoster>,
    pub attempts: usize,
}

/// Top `existing` up towards `BATCH_SIZE` rosters by random sampling.
///
/// `a` and `b` are the full source rosters, already stamped with their
/// source. Stops when the batch is full or the attempt budget runs out;
/// a single failed draw is logged and skipped.
pub fn top_up<R: Rng + ?Sized>(
    a: &[Player],
    b: &[Player],
    existing: usize,
    used_keys: &mut HashSet<String>,
    rng: &mut R,
) -> FallbackResult {
    let mut result = FallbackResult::default();

    while existing + result.rosters.len() < BATCH_SIZE && result.attempts < MAX_FALLBACK_ATTEMPTS {
        result.attempts += 1;

        let candidate = match draw_candidate(a, b, rng) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("Skipping fallback attempt {}: {}", result.attempts, e);
                continue;
            }
        };

        if !is_valid_candidate(&candidate) {
            continue;
        }

        let key = team_key(candidate.iter().copied());
        if used_keys.insert(key) {
            result
                .rosters
                .push(CompositeRoster::new(candidate.into_iter().cloned().collect()));
        }
    }

    debug!(
        "Fallback produced {} rosters in {} attempts",
        result.rosters.len(),
        result.attempts
    );

    result
}
