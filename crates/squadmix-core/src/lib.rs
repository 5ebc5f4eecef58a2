// Library root: roster model and the team-combination engine.

pub mod error;
pub mod generator;
pub mod roster;

pub use error::{GenerateError, RosterError};
pub use generator::{
    generate, generate_teams, generate_teams_seeded, generate_with_rng, Generation,
    GenerationStats,
};
pub use roster::{CompositeRoster, FranchiseInfo, GeneratedBatch, Player, Role, Roster, Source};
