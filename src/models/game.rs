//! Match result, Team, and the recorded match that stats are derived from.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

/// Sets won by each team in one match.
///
/// Scores are signed so that a negative submission is representable and can be
/// rejected by the validator instead of being lost in a parse step.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub team_1_score: i64,
    pub team_2_score: i64,
}

impl MatchResult {
    pub fn new(team_1_score: i64, team_2_score: i64) -> Self {
        Self {
            team_1_score,
            team_2_score,
        }
    }

    /// Build a result from untyped numeric input (e.g. JSON numbers).
    /// Fails with `NonIntegerScore` for fractional, infinite or NaN values.
    pub fn from_raw(team_1_score: f64, team_2_score: f64) -> Result<Self, InvalidResult> {
        Ok(Self {
            team_1_score: integral(team_1_score)?,
            team_2_score: integral(team_2_score)?,
        })
    }

    /// Score of the given team.
    pub fn score(&self, team: Team) -> i64 {
        match team {
            Team::One => self.team_1_score,
            Team::Two => self.team_2_score,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.team_1_score == self.team_2_score
    }
}

fn integral(value: f64) -> Result<i64, InvalidResult> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return Err(InvalidResult::new(InvalidReason::NonIntegerScore));
    }
    Ok(value as i64)
}

/// Why a match result was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    NegativeScore,
    NonIntegerScore,
    DisallowedTie,
}

impl InvalidReason {
    /// Stable reason code surfaced to the submitter.
    pub fn code(self) -> &'static str {
        match self {
            InvalidReason::NegativeScore => "negative_score",
            InvalidReason::NonIntegerScore => "non_integer_score",
            InvalidReason::DisallowedTie => "disallowed_tie",
        }
    }
}

/// A malformed or disallowed match score. The submitter's fault; never retried.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidResult {
    pub reason: InvalidReason,
}

impl InvalidResult {
    pub fn new(reason: InvalidReason) -> Self {
        Self { reason }
    }
}

impl std::fmt::Display for InvalidResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            InvalidReason::NegativeScore => write!(f, "Scores must not be negative"),
            InvalidReason::NonIntegerScore => write!(f, "Scores must be whole numbers"),
            InvalidReason::DisallowedTie => write!(f, "A tie is not allowed for this match"),
        }
    }
}

impl std::error::Error for InvalidResult {}

/// Which phase of the tournament a match belongs to. Numbering is owned by the scheduler.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchContext {
    pub phase: u32,
}

impl MatchContext {
    pub fn new(phase: u32) -> Self {
        Self { phase }
    }
}

/// Games won by each team across all sets of the match (tie-break material only).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameTally {
    pub team_1: u32,
    pub team_2: u32,
}

impl GameTally {
    pub fn new(team_1: u32, team_2: u32) -> Self {
        Self { team_1, team_2 }
    }

    /// (games for, games against) from the given team's side.
    pub fn for_team(&self, team: Team) -> (u32, u32) {
        match team {
            Team::One => (self.team_1, self.team_2),
            Team::Two => (self.team_2, self.team_1),
        }
    }
}

/// A match whose result has been folded into player stats.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub team_1: Vec<PlayerId>,
    pub team_2: Vec<PlayerId>,
    pub result: MatchResult,
    pub games: GameTally,
    pub context: MatchContext,
    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(
        team_1: Vec<PlayerId>,
        team_2: Vec<PlayerId>,
        result: MatchResult,
        games: GameTally,
        context: MatchContext,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_1,
            team_2,
            result,
            games,
            context,
            recorded_at: Utc::now(),
        }
    }

    /// Player ids on the given side.
    pub fn team(&self, team: Team) -> &[PlayerId] {
        match team {
            Team::One => &self.team_1,
            Team::Two => &self.team_2,
        }
    }

    /// Every participant, team 1 first.
    pub fn participants(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_1.iter().chain(self.team_2.iter()).copied()
    }
}
