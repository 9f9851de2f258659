//! Tournament configuration and the in-memory Tournament aggregate.

use crate::models::game::{InvalidResult, MatchId, MatchRecord};
use crate::models::player::{Player, PlayerId, StatsError};
use crate::models::scoring::PointsTable;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// First knockout phase of a group-stage tournament unless configured otherwise.
pub const DEFAULT_KNOCKOUT_FROM_PHASE: u32 = 2;

fn default_knockout_from_phase() -> u32 {
    DEFAULT_KNOCKOUT_FROM_PHASE
}

/// Tournament format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentType {
    RoundRobin,
    Knockout,
    /// Group phases first; every phase from `knockout_from_phase` on is a knockout phase.
    GroupStageKnockout {
        #[serde(default = "default_knockout_from_phase")]
        knockout_from_phase: u32,
    },
}

impl TournamentType {
    pub fn group_stage_knockout() -> Self {
        TournamentType::GroupStageKnockout {
            knockout_from_phase: DEFAULT_KNOCKOUT_FROM_PHASE,
        }
    }

    /// Whether a match in `phase` is a knockout match under this format.
    pub fn is_knockout_phase(&self, phase: u32) -> bool {
        match *self {
            TournamentType::RoundRobin => false,
            TournamentType::Knockout => true,
            TournamentType::GroupStageKnockout {
                knockout_from_phase,
            } => phase >= knockout_from_phase,
        }
    }
}

/// Read-only tournament rules the engine scores against.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub allow_ties: bool,
    #[serde(flatten)]
    pub kind: TournamentType,
}

impl TournamentConfig {
    pub fn new(kind: TournamentType, allow_ties: bool) -> Self {
        Self { allow_ties, kind }
    }
}

/// Errors that can occur while recording results in a tournament.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// The submitted score was rejected.
    InvalidResult(InvalidResult),
    /// Stats could not be updated consistently (e.g. double reversal).
    Stats(StatsError),
    /// A team has no players.
    EmptyTeam,
    /// The same player appears twice in one match.
    DuplicateParticipant(PlayerId),
    /// Player not found in this tournament.
    PlayerNotFound(PlayerId),
    /// Match not found in this tournament.
    MatchNotFound(MatchId),
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player names must not be blank.
    EmptyPlayerName,
    /// The tournament has been completed; results are frozen.
    AlreadyCompleted,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidResult(e) => write!(f, "{}", e),
            TournamentError::Stats(e) => write!(f, "{}", e),
            TournamentError::EmptyTeam => write!(f, "Each team needs at least one player"),
            TournamentError::DuplicateParticipant(_) => {
                write!(f, "A player can only appear once in a match")
            }
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            TournamentError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            TournamentError::AlreadyCompleted => write!(f, "Tournament is already completed"),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TournamentError::InvalidResult(e) => Some(e),
            TournamentError::Stats(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidResult> for TournamentError {
    fn from(e: InvalidResult) -> Self {
        TournamentError::InvalidResult(e)
    }
}

impl From<StatsError> for TournamentError {
    fn from(e: StatsError) -> Self {
        TournamentError::Stats(e)
    }
}

/// A tournament's players, recorded matches and scoring rules.
/// Player stats live on the players; matches are kept so they can be edited or deleted.
#[derive(Clone, Debug, Serialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub config: TournamentConfig,
    pub scoring: PointsTable,
    pub players: Vec<Player>,
    pub matches: Vec<MatchRecord>,
    pub completed: bool,
}

impl Tournament {
    pub fn new(config: TournamentConfig, scoring: PointsTable) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            scoring,
            players: Vec::new(),
            matches: Vec::new(),
            completed: false,
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&MatchRecord> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Add a player by name. Names must be unique (case-insensitive). Returns the new id.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        let player = Player::new(name_trimmed);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Fail with `PlayerNotFound` for the first id that is not in the tournament.
    pub fn ensure_players(&self, ids: impl IntoIterator<Item = PlayerId>) -> Result<(), TournamentError> {
        for id in ids {
            if self.get_player(id).is_none() {
                return Err(TournamentError::PlayerNotFound(id));
            }
        }
        Ok(())
    }
}
