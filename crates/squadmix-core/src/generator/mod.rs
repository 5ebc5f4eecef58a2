// Team-combination engine.
//
// Generation runs once per call and holds no state between calls:
//   Planning -> StructuredSampling -> (FallbackSampling) -> Finishing -> Done
// with `Failed` reachable from the precondition check and from an exhausted
// fallback budget.

pub mod captaincy;
pub mod combinations;
pub mod distribution;
pub mod fallback;
pub mod partition;
pub mod sampler;

use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::error::GenerateError;
use crate::roster::{has_role_coverage, GeneratedBatch, Player, Roster, Source, SQUAD_SIZE};

use self::captaincy::assign_captaincy;
use self::distribution::plan_distributions;
use self::partition::RolePools;
use self::sampler::sample_distribution;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Rosters per generated batch.
pub const BATCH_SIZE: usize = 20;
/// Fewest players a composite may take from either source.
pub const MIN_FROM_SOURCE: usize = 4;
/// Most players a composite may take from either source.
pub const MAX_FROM_SOURCE: usize = 7;
/// Distributions the planner may propose.
pub const MAX_DISTRIBUTIONS: usize = 50;
/// Subsets kept per role on the A side of a distribution.
pub const MAX_COMBOS_PER_ROLE: usize = 5;
/// Subsets kept for B's open slots.
pub const MAX_REMAINING_COMBOS: usize = 10;
/// Rosters accepted from any single distribution.
pub const MAX_TEAMS_PER_DISTRIBUTION: usize = 5;
/// Random draws before the fallback sampler gives up.
pub const MAX_FALLBACK_ATTEMPTS: usize = 20_000;

// ---------------------------------------------------------------------------
// Phases and stats
// ---------------------------------------------------------------------------

/// Where a generation call currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Planning,
    StructuredSampling,
    FallbackSampling,
    Finishing,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Planning => "planning",
            Phase::StructuredSampling => "structured sampling",
            Phase::FallbackSampling => "fallback sampling",
            Phase::Finishing => "shuffling and captaincy",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// How a batch was assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Distributions proposed by the planner.
    pub distributions: usize,
    /// Rosters realized by structured sampling.
    pub structured: usize,
    /// Rosters added by the fallback sampler.
    pub fallback: usize,
    /// Random draws spent by the fallback sampler.
    pub fallback_attempts: usize,
}

/// A finished batch plus how it was produced.
#[derive(Debug, Clone)]
pub struct Generation {
    pub batch: GeneratedBatch,
    pub stats: GenerationStats,
}

// ---------------------------------------------------------------------------
// Candidate validity
// ---------------------------------------------------------------------------

/// Eleven players, all four roles, and no name twice.
pub(crate) fn is_valid_candidate(players: &[&Player]) -> bool {
    if players.len() != SQUAD_SIZE || !has_role_coverage(players.iter().copied()) {
        return false;
    }
    let mut names = HashSet::with_capacity(players.len());
    players.iter().all(|p| names.insert(p.name.as_str()))
}

fn check_complete(roster: &Roster, side: Source) -> Result<(), GenerateError> {
    if roster.is_complete() {
        Ok(())
    } else {
        Err(GenerateError::IncompleteRoster {
            side,
            count: roster.len(),
        })
    }
}

fn enter(phase: Phase) {
    debug!("Generation phase: {}", phase);
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Generate 20 composite rosters using a thread-local random source.
pub fn generate_teams(a: &Roster, b: &Roster) -> Result<GeneratedBatch, GenerateError> {
    let mut rng = rand::thread_rng();
    generate_with_rng(a, b, &mut rng).map(|g| g.batch)
}

/// Generate 20 composite rosters deterministically from `seed`.
pub fn generate_teams_seeded(
    a: &Roster,
    b: &Roster,
    seed: u64,
) -> Result<GeneratedBatch, GenerateError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_with_rng(a, b, &mut rng).map(|g| g.batch)
}

/// Generate with stats, seeded when `seed` is given and from the thread
/// RNG otherwise.
pub fn generate(a: &Roster, b: &Roster, seed: Option<u64>) -> Result<Generation, GenerateError> {
    match seed {
        Some(seed) => generate_with_rng(a, b, &mut ChaCha8Rng::seed_from_u64(seed)),
        None => generate_with_rng(a, b, &mut rand::thread_rng()),
    }
}

/// Run the engine with the given random source.
///
/// Both rosters must hold exactly 11 players. Structured sampling runs
/// first, each planned distribution contributing at most a few rosters;
/// the random fallback tops the set up to 20. The final set is shuffled
/// and each roster gets a captain and vice-captain.
pub fn generate_with_rng<R: Rng + ?Sized>(
    a: &Roster,
    b: &Roster,
    rng: &mut R,
) -> Result<Generation, GenerateError> {
    if let Err(e) = check_complete(a, Source::A).and_then(|_| check_complete(b, Source::B)) {
        enter(Phase::Failed);
        return Err(e);
    }

    enter(Phase::Planning);
    let a_pools = RolePools::partition(&a.players, Source::A);
    let b_pools = RolePools::partition(&b.players, Source::B);
    let distributions = plan_distributions(&a_pools, &b_pools, rng);

    let mut stats = GenerationStats {
        distributions: distributions.len(),
        ..Default::default()
    };
    let mut used_keys = HashSet::new();
    let mut rosters = Vec::with_capacity(BATCH_SIZE);

    enter(Phase::StructuredSampling);
    for distribution in &distributions {
        let realized = sample_distribution(&a_pools, &b_pools, distribution, &mut used_keys);
        let room = BATCH_SIZE - rosters.len();
        rosters.extend(realized.into_iter().take(room));
        if rosters.len() >= BATCH_SIZE {
            break;
        }
    }
    stats.structured = rosters.len();

    if rosters.len() < BATCH_SIZE {
        info!(
            "Structured sampling produced {} of {} rosters; falling back to random sampling",
            rosters.len(),
            BATCH_SIZE
        );
        enter(Phase::FallbackSampling);

        let a_stamped: Vec<Player> = a.players.iter().map(|p| p.stamped(Source::A)).collect();
        let b_stamped: Vec<Player> = b.players.iter().map(|p| p.stamped(Source::B)).collect();
        let topped = fallback::top_up(&a_stamped, &b_stamped, rosters.len(), &mut used_keys, rng);

        stats.fallback = topped.rosters.len();
        stats.fallback_attempts = topped.attempts;
        rosters.extend(topped.rosters);
    }

    if rosters.len() < BATCH_SIZE {
        enter(Phase::Failed);
        return Err(GenerateError::InsufficientDiversity {
            found: rosters.len(),
        });
    }

    enter(Phase::Finishing);
    rosters.shuffle(rng);
    for roster in &mut rosters {
        assign_captaincy(roster, rng);
    }

    enter(Phase::Done);
    info!(
        "Generated {} rosters ({} structured, {} fallback, {} fallback attempts)",
        rosters.len(),
        stats.structured,
        stats.fallback,
        stats.fallback_attempts
    );

    Ok(Generation {
        batch: GeneratedBatch::new(rosters),
        stats,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
