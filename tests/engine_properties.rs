//! Integration tests for the engine's public scoring functions.

use match_standings::{
    calculate_updated_stats, calculate_updated_stats_for_tie, calculate_win_percentage,
    create_empty_stats, determine_winner, determine_winner_with_ties, sort_leaderboard,
    validate_match_result, validate_match_result_with_config, InvalidReason, MatchContext,
    MatchResult, Player, PlayerStats, StatCounts, StatsError, StatsState, Team, TournamentConfig,
    TournamentType,
};
use uuid::Uuid;

#[test]
fn resolvers_agree_for_every_decided_score() {
    for s1 in 0..6 {
        for s2 in 0..6 {
            let result = MatchResult::new(s1, s2);
            if s1 == s2 {
                assert_eq!(determine_winner_with_ties(&result), None);
                continue;
            }
            let winner = determine_winner(&result);
            assert_eq!(determine_winner_with_ties(&result), Some(winner));
            assert!(result.score(winner) > result.score(winner.opponent()));
        }
    }
}

#[test]
fn tie_validation_by_format() {
    let group_phase = MatchContext::new(1);
    for s in 0..4 {
        let tie = MatchResult::new(s, s);
        assert_eq!(
            validate_match_result(&tie).unwrap_err().reason,
            InvalidReason::DisallowedTie
        );
        assert!(validate_match_result_with_config(
            &tie,
            &TournamentConfig::new(TournamentType::RoundRobin, true),
            &group_phase
        )
        .is_ok());
        for allow_ties in [true, false] {
            assert!(validate_match_result_with_config(
                &tie,
                &TournamentConfig::new(TournamentType::Knockout, allow_ties),
                &group_phase
            )
            .is_err());
        }
    }
}

#[test]
fn fractional_scores_are_rejected() {
    assert_eq!(
        MatchResult::from_raw(2.5, 1.0).unwrap_err().reason,
        InvalidReason::NonIntegerScore
    );
    assert_eq!(
        MatchResult::from_raw(f64::NAN, 1.0).unwrap_err().reason,
        InvalidReason::NonIntegerScore
    );
    assert_eq!(MatchResult::from_raw(3.0, 1.0).unwrap(), MatchResult::new(3, 1));
    // negatives parse and are left to the validator
    let negative = MatchResult::from_raw(-1.0, 1.0).unwrap();
    assert_eq!(
        validate_match_result(&negative).unwrap_err().reason,
        InvalidReason::NegativeScore
    );
}

#[test]
fn scores_beyond_i64_range_are_rejected() {
    let two_pow_63 = 9_223_372_036_854_775_808.0;
    assert_eq!(
        MatchResult::from_raw(two_pow_63, 0.0).unwrap_err().reason,
        InvalidReason::NonIntegerScore
    );
    assert_eq!(
        MatchResult::from_raw(0.0, 1e300).unwrap_err().reason,
        InvalidReason::NonIntegerScore
    );
    let two_pow_62 = 4_611_686_018_427_387_904.0;
    assert_eq!(
        MatchResult::from_raw(two_pow_62, 0.0).unwrap(),
        MatchResult::new(1 << 62, 0)
    );
}

#[test]
fn apply_then_reverse_is_identity_after_any_history() {
    let mut stats = create_empty_stats(Uuid::new_v4());
    let history = [(Some(true), 12, 7), (None, 4, 4), (Some(false), 3, 12), (Some(true), 9, 0)];
    for &(outcome, gf, ga) in &history {
        let next = match outcome {
            Some(is_winner) => calculate_updated_stats(&stats, is_winner, gf, ga, false).unwrap(),
            None => calculate_updated_stats_for_tie(&stats, gf, ga, false).unwrap(),
        };
        let back = match outcome {
            Some(is_winner) => calculate_updated_stats(&next, is_winner, gf, ga, true).unwrap(),
            None => calculate_updated_stats_for_tie(&next, gf, ga, true).unwrap(),
        };
        assert_eq!(back, stats);
        assert!(next.counts().is_consistent());
        stats = next;
    }
    assert_eq!(stats.counts().total_matches, 4);
    assert_eq!(stats.win_percentage(), 50.0);
}

#[test]
fn double_reversal_fails() {
    let empty = create_empty_stats(Uuid::new_v4());
    let once = calculate_updated_stats_for_tie(&empty, 2, 2, false).unwrap();
    let undone = calculate_updated_stats_for_tie(&once, 2, 2, true).unwrap();
    assert!(matches!(
        calculate_updated_stats_for_tie(&undone, 2, 2, true),
        Err(StatsError::Underflow { .. })
    ));
}

#[test]
fn win_percentage_examples() {
    assert_eq!(calculate_win_percentage(0, 0), 0.0);
    assert_eq!(calculate_win_percentage(3, 4), 75.0);
}

#[test]
fn new_player_has_zero_stats() {
    let player = Player::new("Ann");
    assert!(player.stats.is_empty());
    let stats = create_empty_stats(player.id);
    assert_eq!(*stats.counts(), StatCounts::default());
    assert_eq!(stats.win_percentage(), 0.0);
    assert_eq!(stats.tournament_points(), 0.0);
    assert_eq!(serde_json::to_value(&player).unwrap()["stats"], serde_json::Value::Null);
}

fn ranked(name: &str, points: f64, won: u32, lost: u32, sets: (u32, u32)) -> Player {
    let id = Uuid::new_v4();
    let counts = StatCounts {
        total_matches: won + lost,
        matches_won: won,
        matches_lost: lost,
        sets_won: sets.0,
        sets_lost: sets.1,
        ..StatCounts::default()
    };
    let policy = move |_: &StatCounts| points;
    Player::with_id(id, name, StatsState::Recorded(PlayerStats::from_counts(id, counts, &policy)))
}

#[test]
fn leaderboard_points_then_percentage() {
    let a = ranked("A", 9.0, 3, 0, (3, 0));
    let b = ranked("B", 9.0, 4, 1, (4, 1));
    let c = ranked("C", 6.0, 2, 0, (2, 0));
    let order: Vec<String> = sort_leaderboard(vec![b, c, a]).into_iter().map(|p| p.name).collect();
    assert_eq!(order, ["A", "B", "C"]);
}

#[test]
fn leaderboard_set_difference() {
    let a = ranked("A", 6.0, 2, 1, (7, 2));
    let b = ranked("B", 6.0, 2, 1, (4, 2));
    let order: Vec<String> = sort_leaderboard(vec![b, a]).into_iter().map(|p| p.name).collect();
    assert_eq!(order, ["A", "B"]);
}

#[test]
fn winner_is_team_enum() {
    assert_eq!(determine_winner(&MatchResult::new(0, 2)), Team::Two);
}
