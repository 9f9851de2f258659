//! Data structures for the standings engine: players, stats, matches, tournament config.

mod game;
mod player;
mod scoring;
mod tournament;

pub use game::{
    GameTally, InvalidReason, InvalidResult, MatchContext, MatchId, MatchRecord, MatchResult, Team,
};
pub use player::{
    win_percentage, Player, PlayerId, PlayerStats, StatCounts, StatsError, StatsState,
};
pub use scoring::{InvalidPointsTable, PointsTable, ScoringPolicy};
pub use tournament::{
    Tournament, TournamentConfig, TournamentError, TournamentId, TournamentType,
    DEFAULT_KNOCKOUT_FROM_PHASE,
};
