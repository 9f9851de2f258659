//! Match outcome from a validated score.

use crate::models::{MatchResult, Team};

/// Team with the strictly higher score.
///
/// Only meaningful for results validated in a no-tie context. An equal score is a
/// caller bug: debug builds panic on it, release builds resolve it to `Team::Two`.
pub fn determine_winner(result: &MatchResult) -> Team {
    debug_assert!(!result.is_tie(), "determine_winner called on a tie");
    if result.team_1_score > result.team_2_score {
        Team::One
    } else {
        Team::Two
    }
}

/// Winner, or `None` for a tie.
pub fn determine_winner_with_ties(result: &MatchResult) -> Option<Team> {
    match result.team_1_score.cmp(&result.team_2_score) {
        std::cmp::Ordering::Greater => Some(Team::One),
        std::cmp::Ordering::Less => Some(Team::Two),
        std::cmp::Ordering::Equal => None,
    }
}
