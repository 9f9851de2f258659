//! Match-result validation and standings engine: library with models and scoring logic.

pub mod logic;
pub mod models;

pub use logic::{
    apply_match, calculate_updated_stats, calculate_updated_stats_for_tie, calculate_win_percentage,
    complete_tournament, create_empty_stats, delete_match, determine_winner,
    determine_winner_with_ties, edit_match, leaderboard_rows, record_match, replace_match,
    revert_match, sort_leaderboard, ties_allowed, tournament_leaderboard, validate_match_result,
    validate_match_result_with_config, write_leaderboard_csv, Direction, InMemoryStats,
    LeaderboardRow, MatchSubmission, PlayerOutcome, StatsAggregator, StatsStore,
};
pub use models::{
    GameTally, InvalidPointsTable, InvalidReason, InvalidResult, MatchContext, MatchId,
    MatchRecord, MatchResult, Player, PlayerId, PlayerStats, PointsTable, ScoringPolicy,
    StatCounts, StatsError, StatsState, Team, Tournament, TournamentConfig, TournamentError,
    TournamentId, TournamentType,
};
