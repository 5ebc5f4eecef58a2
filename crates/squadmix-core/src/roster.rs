// Player, source roster, and generated roster types.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// Number of players on every roster (source or composite).
pub const SQUAD_SIZE: usize = 11;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Cricket playing roles. Every composite roster needs at least one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "WK")]
    WicketKeeper,
    #[serde(rename = "Batter")]
    Batter,
    #[serde(rename = "All-Rounder")]
    AllRounder,
    #[serde(rename = "Bowler")]
    Bowler,
}

impl Role {
    /// All roles in display order. Coverage checks iterate this same list.
    pub const ALL: [Role; 4] = [
        Role::WicketKeeper,
        Role::Batter,
        Role::AllRounder,
        Role::Bowler,
    ];

    /// Parse a role label.
    ///
    /// Accepts the serialized labels ("WK", "All-Rounder", ...) as well as
    /// spelled-out forms ("wicketkeeper", "allrounder", "bowl"), ignoring case.
    pub fn from_str_role(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wk" | "wicketkeeper" | "wicket-keeper" | "keeper" => Some(Role::WicketKeeper),
            "bat" | "batter" | "batsman" => Some(Role::Batter),
            "ar" | "all-rounder" | "allrounder" | "all_rounder" => Some(Role::AllRounder),
            "bowl" | "bowler" => Some(Role::Bowler),
            _ => None,
        }
    }

    /// Return the display string for this role.
    pub fn label(&self) -> &'static str {
        match self {
            Role::WicketKeeper => "WK",
            Role::Batter => "Batter",
            Role::AllRounder => "All-Rounder",
            Role::Bowler => "Bowler",
        }
    }

    /// Position of this role in `Role::ALL`.
    pub fn sort_order(&self) -> usize {
        match self {
            Role::WicketKeeper => 0,
            Role::Batter => 1,
            Role::AllRounder => 2,
            Role::Bowler => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Which of the two source rosters a player was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "team1")]
    A,
    #[serde(rename = "team2")]
    B,
}

impl Source {
    pub const BOTH: [Source; 2] = [Source::A, Source::B];

    /// The other side.
    pub fn other(&self) -> Source {
        match self {
            Source::A => Source::B,
            Source::B => Source::A,
        }
    }

    /// 0 for A, 1 for B.
    pub fn index(&self) -> usize {
        match self {
            Source::A => 0,
            Source::B => 1,
        }
    }

    pub fn from_str_source(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "a" | "1" | "team1" => Some(Source::A),
            "b" | "2" | "team2" => Some(Source::B),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::A => write!(f, "Team 1"),
            Source::B => write!(f, "Team 2"),
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A named player with a role. Inside generated rosters the player also
/// carries the source it was drawn from and its captaincy flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub role: Role,
    #[serde(default, rename = "originalTeam", skip_serializing_if = "Option::is_none")]
    pub original_source: Option<Source>,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Player {
            name: name.into(),
            role,
            original_source: None,
            is_captain: false,
            is_vice_captain: false,
        }
    }

    /// Copy of this player tagged with `source` and stripped of captaincy.
    pub fn stamped(&self, source: Source) -> Self {
        Player {
            name: self.name.clone(),
            role: self.role,
            original_source: Some(source),
            is_captain: false,
            is_vice_captain: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Franchise metadata
// ---------------------------------------------------------------------------

/// Display metadata for the real-world team a source roster represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseInfo {
    pub id: String,
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
}

// ---------------------------------------------------------------------------
// Source roster
// ---------------------------------------------------------------------------

/// One of the two user-built input rosters. Complete at exactly 11 players.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default, rename = "teamInfo", skip_serializing_if = "Option::is_none")]
    pub franchise: Option<FranchiseInfo>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a player.
    ///
    /// The name is trimmed. Empty names, names already on this roster, and
    /// additions past 11 players are rejected.
    pub fn add_player(&mut self, name: &str, role: Role) -> Result<&Player, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.players.len() >= SQUAD_SIZE {
            return Err(RosterError::RosterFull { max: SQUAD_SIZE });
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(RosterError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.players.push(Player::new(name, role));
        Ok(&self.players[self.players.len() - 1])
    }

    /// Remove the player at `index` (0-based) and return it.
    pub fn remove_player(&mut self, index: usize) -> Result<Player, RosterError> {
        if index >= self.players.len() {
            return Err(RosterError::IndexOutOfRange {
                index,
                len: self.players.len(),
            });
        }
        Ok(self.players.remove(index))
    }

    pub fn select_franchise(&mut self, info: FranchiseInfo) {
        self.franchise = Some(info);
    }

    /// Drop all players and the franchise selection.
    pub fn clear(&mut self) {
        self.players.clear();
        self.franchise = None;
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.players.len() == SQUAD_SIZE
    }

    /// Player count per role, indexed by `Role::sort_order()`.
    pub fn role_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for p in &self.players {
            counts[p.role.sort_order()] += 1;
        }
        counts
    }

    /// Franchise display name, or the generic side label.
    pub fn display_name(&self, side: Source) -> String {
        match &self.franchise {
            Some(info) => info.name.clone(),
            None => side.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Generated rosters
// ---------------------------------------------------------------------------

/// Whether the players cover all four roles.
pub fn has_role_coverage<'a>(players: impl IntoIterator<Item = &'a Player>) -> bool {
    let mut seen = [false; 4];
    for p in players {
        seen[p.role.sort_order()] = true;
    }
    seen.iter().all(|&s| s)
}

/// Uniqueness signature of a set of players: names sorted and joined by `|`.
///
/// Only names take part, so the same name drawn from either source yields
/// the same key.
pub fn team_key<'a>(players: impl IntoIterator<Item = &'a Player>) -> String {
    let mut names: Vec<&str> = players.into_iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names.join("|")
}

/// A generated eleven-player roster mixing players from both sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeRoster {
    pub players: Vec<Player>,
}

impl CompositeRoster {
    pub fn new(players: Vec<Player>) -> Self {
        CompositeRoster { players }
    }

    pub fn captain(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_captain)
    }

    pub fn vice_captain(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_vice_captain)
    }

    /// Number of players drawn from `source`.
    pub fn count_from(&self, source: Source) -> usize {
        self.players
            .iter()
            .filter(|p| p.original_source == Some(source))
            .count()
    }

    pub fn has_role_coverage(&self) -> bool {
        has_role_coverage(&self.players)
    }

    pub fn team_key(&self) -> String {
        team_key(&self.players)
    }

    /// Whether any name appears twice in this roster.
    pub fn has_duplicate_names(&self) -> bool {
        let mut seen = HashSet::new();
        !self.players.iter().all(|p| seen.insert(p.name.as_str()))
    }

    /// Players ordered by `Role::ALL`, keeping the original order within a role.
    pub fn sorted_by_role(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by_key(|p| p.role.sort_order());
        sorted
    }
}

/// The ordered output of one generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedBatch {
    pub rosters: Vec<CompositeRoster>,
}

impl GeneratedBatch {
    pub fn new(rosters: Vec<CompositeRoster>) -> Self {
        GeneratedBatch { rosters }
    }

    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompositeRoster> {
        self.rosters.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
