//! Integration tests for recording, correcting and deleting matches in a tournament.

use match_standings::{
    complete_tournament, delete_match, edit_match, record_match, tournament_leaderboard,
    GameTally, InvalidReason, MatchContext, MatchResult, MatchSubmission, PlayerId, PointsTable,
    StatsError, Tournament, TournamentConfig, TournamentError, TournamentType,
};

fn tournament_with_players(kind: TournamentType, allow_ties: bool, names: &[&str]) -> (Tournament, Vec<PlayerId>) {
    let mut t = Tournament::new(TournamentConfig::new(kind, allow_ties), PointsTable::default());
    let ids = names.iter().map(|n| t.add_player(*n).unwrap()).collect();
    (t, ids)
}

fn singles(a: PlayerId, b: PlayerId, score: (i64, i64), games: (u32, u32), phase: u32) -> MatchSubmission {
    MatchSubmission {
        team_1: vec![a],
        team_2: vec![b],
        result: MatchResult::new(score.0, score.1),
        games: GameTally::new(games.0, games.1),
        context: MatchContext::new(phase),
    }
}

fn counts(t: &Tournament, id: PlayerId) -> match_standings::StatCounts {
    *t.get_player(id).unwrap().stats.recorded().unwrap().counts()
}

#[test]
fn round_robin_season_ranks_players() {
    let (mut t, ids) = tournament_with_players(TournamentType::RoundRobin, true, &["Ann", "Bob", "Cat"]);
    let (ann, bob, cat) = (ids[0], ids[1], ids[2]);

    record_match(&mut t, singles(ann, bob, (2, 0), (12, 5), 1)).unwrap();
    record_match(&mut t, singles(bob, cat, (1, 1), (9, 9), 1)).unwrap();
    record_match(&mut t, singles(cat, ann, (2, 1), (14, 13), 1)).unwrap();

    let rows = tournament_leaderboard(&t);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    // Cat: 4 pts (W, D), Ann: 3 pts (W, L), Bob: 1 pt (L, D)
    assert_eq!(names, ["Cat", "Ann", "Bob"]);
    assert_eq!(rows[0].tournament_points, 4.0);
    assert_eq!(rows[1].win_percentage, 50.0);
    assert_eq!(rows[2].matches_drawn, 1);
    for row in &rows {
        assert_eq!(row.matches_won + row.matches_lost + row.matches_drawn, row.total_matches);
    }
}

#[test]
fn knockout_rejects_tie_even_when_ties_allowed() {
    let (mut t, ids) = tournament_with_players(TournamentType::Knockout, true, &["Ann", "Bob"]);
    let err = record_match(&mut t, singles(ids[0], ids[1], (1, 1), (6, 6), 1)).unwrap_err();
    match err {
        TournamentError::InvalidResult(e) => assert_eq!(e.reason, InvalidReason::DisallowedTie),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(t.matches.is_empty());
    assert!(t.players.iter().all(|p| p.stats.is_empty()));
}

#[test]
fn group_stage_tie_allowed_then_knockout_needs_winner() {
    let (mut t, ids) = tournament_with_players(TournamentType::group_stage_knockout(), true, &["Ann", "Bob"]);
    record_match(&mut t, singles(ids[0], ids[1], (1, 1), (8, 8), 1)).unwrap();
    assert!(record_match(&mut t, singles(ids[0], ids[1], (2, 2), (8, 8), 2)).is_err());
    record_match(&mut t, singles(ids[0], ids[1], (3, 2), (20, 18), 2)).unwrap();

    let ann = counts(&t, ids[0]);
    assert_eq!((ann.total_matches, ann.matches_drawn, ann.matches_won), (2, 1, 1));
}

#[test]
fn negative_score_is_rejected() {
    let (mut t, ids) = tournament_with_players(TournamentType::RoundRobin, false, &["Ann", "Bob"]);
    let err = record_match(&mut t, singles(ids[0], ids[1], (-2, 1), (0, 0), 1)).unwrap_err();
    assert!(matches!(
        err,
        TournamentError::InvalidResult(e) if e.reason == InvalidReason::NegativeScore
    ));
}

#[test]
fn editing_a_match_swaps_its_effect() {
    let (mut t, ids) = tournament_with_players(TournamentType::RoundRobin, true, &["Ann", "Bob"]);
    let (ann, bob) = (ids[0], ids[1]);
    record_match(&mut t, singles(ann, bob, (2, 1), (15, 12), 1)).unwrap();
    let id = record_match(&mut t, singles(ann, bob, (2, 0), (12, 4), 1)).unwrap();

    edit_match(&mut t, id, singles(ann, bob, (1, 1), (10, 10), 1)).unwrap();

    let a = counts(&t, ann);
    assert_eq!((a.total_matches, a.matches_won, a.matches_drawn), (2, 1, 1));
    assert_eq!((a.sets_won, a.sets_lost), (1, 0));
    assert_eq!((a.games_won, a.games_lost), (25, 22));
    let b = counts(&t, bob);
    assert_eq!((b.matches_lost, b.matches_drawn), (1, 1));
    assert_eq!(t.get_match(id).unwrap().result, MatchResult::new(1, 1));
}

#[test]
fn failed_edit_changes_nothing() {
    let (mut t, ids) = tournament_with_players(TournamentType::RoundRobin, false, &["Ann", "Bob"]);
    let id = record_match(&mut t, singles(ids[0], ids[1], (2, 0), (12, 4), 1)).unwrap();
    let before = t.players.clone();

    let err = edit_match(&mut t, id, singles(ids[0], ids[1], (1, 1), (6, 6), 1)).unwrap_err();
    assert!(matches!(err, TournamentError::InvalidResult(_)));
    assert_eq!(t.players, before);
    assert_eq!(t.get_match(id).unwrap().result, MatchResult::new(2, 0));
}

#[test]
fn deleting_all_matches_returns_to_zero() {
    let (mut t, ids) = tournament_with_players(TournamentType::RoundRobin, true, &["Ann", "Bob"]);
    let first = record_match(&mut t, singles(ids[0], ids[1], (2, 0), (12, 4), 1)).unwrap();
    let second = record_match(&mut t, singles(ids[1], ids[0], (0, 0), (3, 3), 1)).unwrap();

    delete_match(&mut t, first).unwrap();
    delete_match(&mut t, second).unwrap();

    for id in ids {
        let stats = t.get_player(id).unwrap().stats.recorded().unwrap();
        assert_eq!(*stats.counts(), match_standings::StatCounts::default());
        assert_eq!(stats.win_percentage(), 0.0);
        assert_eq!(stats.tournament_points(), 0.0);
    }
    assert!(t.matches.is_empty());
}

#[test]
fn deleting_unknown_match_is_not_found() {
    let (mut t, _) = tournament_with_players(TournamentType::RoundRobin, true, &["Ann"]);
    let ghost = uuid::Uuid::new_v4();
    assert!(matches!(delete_match(&mut t, ghost), Err(TournamentError::MatchNotFound(id)) if id == ghost));
}

#[test]
fn corrupted_stats_surface_as_underflow() {
    let (mut t, ids) = tournament_with_players(TournamentType::RoundRobin, true, &["Ann", "Bob"]);
    let id = record_match(&mut t, singles(ids[0], ids[1], (2, 0), (12, 4), 1)).unwrap();
    // stats wiped outside the engine (e.g. a bad restore)
    t.players[0].stats = Default::default();

    let err = delete_match(&mut t, id).unwrap_err();
    assert!(matches!(err, TournamentError::Stats(StatsError::Underflow { .. })));
    assert_eq!(t.matches.len(), 1);
    assert_eq!(counts(&t, ids[1]).matches_lost, 1);
}

#[test]
fn completing_records_tournament_counts() {
    let (mut t, ids) = tournament_with_players(TournamentType::RoundRobin, true, &["Ann", "Bob", "Cat"]);
    record_match(&mut t, singles(ids[0], ids[1], (2, 0), (12, 4), 1)).unwrap();
    complete_tournament(&mut t, &[ids[0]]).unwrap();

    assert_eq!(counts(&t, ids[0]).tournaments_won, 1);
    assert_eq!(counts(&t, ids[1]).tournaments_played, 1);
    assert!(t.get_player(ids[2]).unwrap().stats.is_empty());
    assert!(matches!(
        record_match(&mut t, singles(ids[0], ids[1], (2, 0), (1, 0), 1)),
        Err(TournamentError::AlreadyCompleted)
    ));
}
