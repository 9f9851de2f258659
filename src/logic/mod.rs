//! Standings engine: validation, winner resolution, stats aggregation, ranking,
//! and the match bookkeeping that ties them together.

mod aggregator;
mod ledger;
mod leaderboard;
mod matches;
mod resolver;
mod validator;

pub use aggregator::{
    calculate_updated_stats, calculate_updated_stats_for_tie, calculate_win_percentage,
    create_empty_stats, Direction, PlayerOutcome, StatsAggregator,
};
pub use ledger::{apply_match, replace_match, revert_match, InMemoryStats, StatsStore};
pub use leaderboard::{leaderboard_rows, sort_leaderboard, write_leaderboard_csv, LeaderboardRow};
pub use matches::{
    complete_tournament, delete_match, edit_match, record_match, tournament_leaderboard,
    MatchSubmission,
};
pub use resolver::{determine_winner, determine_winner_with_ties};
pub use validator::{ties_allowed, validate_match_result, validate_match_result_with_config};
