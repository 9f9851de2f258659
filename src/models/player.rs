//! Player, StatCounts and PlayerStats data structures.

use crate::models::scoring::ScoringPolicy;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Raw per-(player, tournament) counters. All derived values are computed from these.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct StatCounts {
    pub total_matches: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_drawn: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub tournaments_played: u32,
    pub tournaments_won: u32,
}

impl StatCounts {
    /// `sets_won - sets_lost`.
    pub fn set_difference(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    /// `games_won - games_lost`.
    pub fn game_difference(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }

    /// Won + lost + drawn adds up to the match total.
    pub fn is_consistent(&self) -> bool {
        u64::from(self.matches_won) + u64::from(self.matches_lost) + u64::from(self.matches_drawn)
            == u64::from(self.total_matches)
    }
}

/// Percentage of matches won, 0 when no match has been played.
pub fn win_percentage(matches_won: u32, total_matches: u32) -> f64 {
    if total_matches == 0 {
        return 0.0;
    }
    100.0 * f64::from(matches_won) / f64::from(total_matches)
}

/// Aggregate statistics for one player in one tournament.
///
/// Counts are only reachable through [`PlayerStats::from_counts`], which recomputes
/// `win_percentage` and `tournament_points`, so the derived fields never drift.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerStats {
    player_id: PlayerId,
    #[serde(flatten)]
    counts: StatCounts,
    win_percentage: f64,
    tournament_points: f64,
}

impl PlayerStats {
    pub fn from_counts<P>(player_id: PlayerId, counts: StatCounts, policy: &P) -> Self
    where
        P: ScoringPolicy + ?Sized,
    {
        debug_assert!(counts.is_consistent(), "match counts out of balance: {counts:?}");
        Self {
            player_id,
            counts,
            win_percentage: win_percentage(counts.matches_won, counts.total_matches),
            tournament_points: policy.points(&counts),
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn counts(&self) -> &StatCounts {
        &self.counts
    }

    pub fn win_percentage(&self) -> f64 {
        self.win_percentage
    }

    pub fn tournament_points(&self) -> f64 {
        self.tournament_points
    }
}

/// Stats of a player that may not have played yet. Serializes as `null` or the stats.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StatsState {
    /// No recorded match; equivalent to zero-valued stats.
    #[default]
    Empty,
    Recorded(PlayerStats),
}

impl StatsState {
    pub fn recorded(&self) -> Option<&PlayerStats> {
        match self {
            StatsState::Empty => None,
            StatsState::Recorded(stats) => Some(stats),
        }
    }

    pub fn into_recorded(self) -> Option<PlayerStats> {
        match self {
            StatsState::Empty => None,
            StatsState::Recorded(stats) => Some(stats),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StatsState::Empty)
    }
}

impl From<Option<PlayerStats>> for StatsState {
    fn from(stats: Option<PlayerStats>) -> Self {
        stats.map_or(StatsState::Empty, StatsState::Recorded)
    }
}

impl Serialize for StatsState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.recorded().serialize(serializer)
    }
}

/// A player as seen by the engine: identity, display name, and stats if any.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub stats: StatsState,
}

impl Player {
    /// Create a new player with the given name and no stats.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            stats: StatsState::Empty,
        }
    }

    /// Player with a known id (e.g. loaded from the player directory).
    pub fn with_id(id: PlayerId, name: impl Into<String>, stats: StatsState) -> Self {
        Self {
            id,
            name: name.into(),
            stats,
        }
    }
}

/// Applying a delta would take a counter below zero or past `u32::MAX`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatsError {
    /// Usually a reversal of a match that was never applied (double reversal).
    Underflow {
        player_id: PlayerId,
        field: &'static str,
    },
    Overflow {
        player_id: PlayerId,
        field: &'static str,
    },
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::Underflow { player_id, field } => {
                write!(f, "Stats underflow for player {}: {} would drop below zero", player_id, field)
            }
            StatsError::Overflow { player_id, field } => {
                write!(f, "Stats overflow for player {}: {} is out of range", player_id, field)
            }
        }
    }
}

impl std::error::Error for StatsError {}
