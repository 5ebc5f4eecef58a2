// Error types for roster editing and team generation.

use thiserror::Error;

use crate::roster::Source;

// ---------------------------------------------------------------------------
// Roster editing
// ---------------------------------------------------------------------------

/// Rejected edits to a source roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("player name must not be empty")]
    EmptyName,

    #[error("player `{name}` is already on this roster")]
    DuplicateName { name: String },

    #[error("roster already has {max} players")]
    RosterFull { max: usize },

    #[error("no player at index {index} (roster has {len} players)")]
    IndexOutOfRange { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Failures surfaced by the team-combination engine.
///
/// `IncompleteRoster` is raised before any sampling work happens.
/// `InsufficientDiversity` is the only failure after computation and is the
/// one a user can act on. Inside the engine `Computation` is scoped to a
/// single fallback draw and is skipped, not returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("{side} has {count} players; both teams need exactly 11 players to generate")]
    IncompleteRoster { side: Source, count: usize },

    #[error(
        "could not generate 20 unique valid teams (found {found}). \
         Try adding more variety in player roles."
    )]
    InsufficientDiversity { found: usize },

    #[error("failed to assemble candidate team: {0}")]
    Computation(String),
}

impl GenerateError {
    /// Whether this is the lack-of-variety failure (as opposed to a
    /// precondition problem with the inputs).
    pub fn is_insufficient_diversity(&self) -> bool {
        matches!(self, GenerateError::InsufficientDiversity { .. })
    }
}
