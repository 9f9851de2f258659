//! Recording, editing and deleting matches of a tournament, and finishing it.

use crate::logic::aggregator::{Direction, StatsAggregator};
use crate::logic::leaderboard::{leaderboard_rows, LeaderboardRow};
use crate::logic::ledger::{apply_match, replace_match, revert_match, StatsStore};
use crate::models::{
    GameTally, MatchContext, MatchId, MatchRecord, MatchResult, PlayerId, Tournament,
    TournamentError,
};
use std::collections::HashSet;

/// A match result as submitted for a scheduled match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchSubmission {
    pub team_1: Vec<PlayerId>,
    pub team_2: Vec<PlayerId>,
    pub result: MatchResult,
    pub games: GameTally,
    pub context: MatchContext,
}

impl MatchSubmission {
    fn into_record(self) -> MatchRecord {
        MatchRecord::new(self.team_1, self.team_2, self.result, self.games, self.context)
    }
}

fn ensure_open(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.completed {
        return Err(TournamentError::AlreadyCompleted);
    }
    Ok(())
}

fn match_index(tournament: &Tournament, match_id: MatchId) -> Result<usize, TournamentError> {
    tournament
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))
}

/// Validate a submission and fold it into the participants' stats. Returns the new match id.
pub fn record_match(
    tournament: &mut Tournament,
    submission: MatchSubmission,
) -> Result<MatchId, TournamentError> {
    ensure_open(tournament)?;
    let record = submission.into_record();
    tournament.ensure_players(record.participants())?;

    let aggregator = StatsAggregator::new(tournament.scoring);
    apply_match(&mut tournament.players, &aggregator, &tournament.config, &record)?;
    let id = record.id;
    tournament.matches.push(record);
    Ok(id)
}

/// Correct a recorded match. The old result is undone and the new one applied as one update;
/// on error neither stats nor the stored match change.
pub fn edit_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    submission: MatchSubmission,
) -> Result<(), TournamentError> {
    ensure_open(tournament)?;
    let idx = match_index(tournament, match_id)?;
    let mut record = submission.into_record();
    record.id = match_id;
    tournament.ensure_players(record.participants())?;

    let aggregator = StatsAggregator::new(tournament.scoring);
    replace_match(
        &mut tournament.players,
        &aggregator,
        &tournament.config,
        &tournament.matches[idx],
        &record,
    )?;
    tournament.matches[idx] = record;
    Ok(())
}

/// Remove a recorded match and undo its effect on stats.
pub fn delete_match(tournament: &mut Tournament, match_id: MatchId) -> Result<MatchRecord, TournamentError> {
    ensure_open(tournament)?;
    let idx = match_index(tournament, match_id)?;
    let aggregator = StatsAggregator::new(tournament.scoring);
    revert_match(&mut tournament.players, &aggregator, &tournament.matches[idx])?;
    Ok(tournament.matches.remove(idx))
}

/// Finish the tournament: every player with stats, plus every winner, has played one
/// more tournament; winners have won one more.
pub fn complete_tournament(tournament: &mut Tournament, winner_ids: &[PlayerId]) -> Result<(), TournamentError> {
    ensure_open(tournament)?;
    tournament.ensure_players(winner_ids.iter().copied())?;
    let winners: HashSet<PlayerId> = winner_ids.iter().copied().collect();

    let aggregator = StatsAggregator::new(tournament.scoring);
    let mut snapshots = Vec::new();
    for player in &tournament.players {
        let won = winners.contains(&player.id);
        let current = match player.stats.recorded() {
            Some(stats) => stats.clone(),
            None if won => aggregator.empty_stats(player.id),
            None => continue,
        };
        snapshots.push(aggregator.apply_tournament(&current, won, Direction::Forward)?);
    }
    tournament.players.commit(snapshots)?;
    tournament.completed = true;
    log::info!("Tournament {} completed with {} winner(s)", tournament.id, winners.len());
    Ok(())
}

/// Current leaderboard of the tournament.
pub fn tournament_leaderboard(tournament: &Tournament) -> Vec<LeaderboardRow> {
    leaderboard_rows(tournament.players.clone())
}
