//! Score well-formedness and format-specific legality.

use crate::models::{
    InvalidReason, InvalidResult, MatchContext, MatchResult, TournamentConfig, TournamentType,
};

/// Strict two-outcome validation: non-negative scores, no tie.
///
/// Used by callers that have not resolved the tournament context yet.
pub fn validate_match_result(result: &MatchResult) -> Result<(), InvalidResult> {
    check(result, false)
}

/// Validate against the tournament's tie policy for the match's phase.
pub fn validate_match_result_with_config(
    result: &MatchResult,
    config: &TournamentConfig,
    context: &MatchContext,
) -> Result<(), InvalidResult> {
    check(result, ties_allowed(config, context))
}

/// Effective tie policy: `allow_ties`, except that knockout matches must always have a winner.
pub fn ties_allowed(config: &TournamentConfig, context: &MatchContext) -> bool {
    let knockout = match config.kind {
        TournamentType::RoundRobin => false,
        TournamentType::Knockout => true,
        kind @ TournamentType::GroupStageKnockout { .. } => kind.is_knockout_phase(context.phase),
    };
    config.allow_ties && !knockout
}

fn check(result: &MatchResult, allow_ties: bool) -> Result<(), InvalidResult> {
    if result.team_1_score < 0 || result.team_2_score < 0 {
        return Err(InvalidResult::new(InvalidReason::NegativeScore));
    }
    if result.is_tie() && !allow_ties {
        return Err(InvalidResult::new(InvalidReason::DisallowedTie));
    }
    Ok(())
}
