//! Applying, reverting and replacing whole matches against a stats store.
//!
//! Every participant's next snapshot is computed before anything is written, and
//! the batch is committed at once: a failure for one player leaves every player's
//! stats untouched.

use crate::logic::aggregator::{Direction, PlayerOutcome, StatsAggregator};
use crate::logic::resolver::determine_winner_with_ties;
use crate::logic::validator::validate_match_result_with_config;
use crate::models::{
    MatchRecord, Player, PlayerId, PlayerStats, ScoringPolicy, StatsState, Team, TournamentConfig,
    TournamentError,
};
use std::collections::{HashMap, HashSet};

/// Where player stats snapshots are read from and written to.
///
/// Callers serialize access per player (e.g. one transaction per update); the
/// engine only reads a consistent snapshot and hands back the next one.
pub trait StatsStore {
    fn fetch(&self, player_id: PlayerId) -> StatsState;

    /// Write all snapshots as one unit. On error nothing is written.
    fn commit(&mut self, snapshots: Vec<PlayerStats>) -> Result<(), TournamentError>;
}

/// Stats kept in a map, keyed by player.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStats {
    stats: HashMap<PlayerId, PlayerStats>,
}

impl InMemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&PlayerStats> {
        self.stats.get(&player_id)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl StatsStore for InMemoryStats {
    fn fetch(&self, player_id: PlayerId) -> StatsState {
        self.stats.get(&player_id).cloned().into()
    }

    fn commit(&mut self, snapshots: Vec<PlayerStats>) -> Result<(), TournamentError> {
        for stats in snapshots {
            self.stats.insert(stats.player_id(), stats);
        }
        Ok(())
    }
}

/// A roster stores stats on its players. A snapshot for a player outside the roster
/// fails the whole commit with `PlayerNotFound`.
impl StatsStore for Vec<Player> {
    fn fetch(&self, player_id: PlayerId) -> StatsState {
        self.iter()
            .find(|p| p.id == player_id)
            .map(|p| p.stats.clone())
            .unwrap_or_default()
    }

    fn commit(&mut self, snapshots: Vec<PlayerStats>) -> Result<(), TournamentError> {
        if let Some(unknown) = snapshots
            .iter()
            .map(|s| s.player_id())
            .find(|id| !self.iter().any(|p| p.id == *id))
        {
            log::error!("Refusing stats commit for unknown player {}", unknown);
            return Err(TournamentError::PlayerNotFound(unknown));
        }
        for stats in snapshots {
            if let Some(p) = self.iter_mut().find(|p| p.id == stats.player_id()) {
                p.stats = StatsState::Recorded(stats);
            }
        }
        Ok(())
    }
}

/// Validate a new match and fold it into every participant's stats.
pub fn apply_match<S, P>(
    store: &mut S,
    aggregator: &StatsAggregator<P>,
    config: &TournamentConfig,
    record: &MatchRecord,
) -> Result<(), TournamentError>
where
    S: StatsStore + ?Sized,
    P: ScoringPolicy,
{
    check_submission(config, record)?;
    let mut batch = Batch::new(store, aggregator);
    batch.fold(record, Direction::Forward)?;
    let snapshots = batch.into_snapshots();
    store.commit(snapshots)?;
    log::info!("Applied match {}", record.id);
    Ok(())
}

/// Undo a previously applied match (e.g. before deleting it).
///
/// The result is not re-validated: it was legal when applied, and a later change
/// of tie policy must not make it impossible to undo.
pub fn revert_match<S, P>(
    store: &mut S,
    aggregator: &StatsAggregator<P>,
    record: &MatchRecord,
) -> Result<(), TournamentError>
where
    S: StatsStore + ?Sized,
    P: ScoringPolicy,
{
    let mut batch = Batch::new(store, aggregator);
    batch.fold(record, Direction::Reverse)?;
    let snapshots = batch.into_snapshots();
    store.commit(snapshots)?;
    log::info!("Reverted match {}", record.id);
    Ok(())
}

/// Replace a recorded match with a corrected one: undo `old`, apply `new`, commit once.
pub fn replace_match<S, P>(
    store: &mut S,
    aggregator: &StatsAggregator<P>,
    config: &TournamentConfig,
    old: &MatchRecord,
    new: &MatchRecord,
) -> Result<(), TournamentError>
where
    S: StatsStore + ?Sized,
    P: ScoringPolicy,
{
    check_submission(config, new)?;
    let mut batch = Batch::new(store, aggregator);
    batch.fold(old, Direction::Reverse)?;
    batch.fold(new, Direction::Forward)?;
    let snapshots = batch.into_snapshots();
    store.commit(snapshots)?;
    log::info!("Replaced match {} with {}", old.id, new.id);
    Ok(())
}

fn check_submission(config: &TournamentConfig, record: &MatchRecord) -> Result<(), TournamentError> {
    check_lineup(record)?;
    validate_match_result_with_config(&record.result, config, &record.context).map_err(|e| {
        log::warn!("Rejected result for match {}: {}", record.id, e.reason.code());
        TournamentError::from(e)
    })
}

fn check_lineup(record: &MatchRecord) -> Result<(), TournamentError> {
    if record.team_1.is_empty() || record.team_2.is_empty() {
        return Err(TournamentError::EmptyTeam);
    }
    let mut seen = HashSet::new();
    for id in record.participants() {
        if !seen.insert(id) {
            return Err(TournamentError::DuplicateParticipant(id));
        }
    }
    Ok(())
}

/// Pending snapshots layered over the store, in first-touched order.
struct Batch<'a, S: ?Sized, P> {
    store: &'a S,
    aggregator: &'a StatsAggregator<P>,
    pending: HashMap<PlayerId, PlayerStats>,
    order: Vec<PlayerId>,
}

impl<'a, S, P> Batch<'a, S, P>
where
    S: StatsStore + ?Sized,
    P: ScoringPolicy,
{
    fn new(store: &'a S, aggregator: &'a StatsAggregator<P>) -> Self {
        Self {
            store,
            aggregator,
            pending: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn current(&self, player_id: PlayerId) -> PlayerStats {
        if let Some(stats) = self.pending.get(&player_id) {
            return stats.clone();
        }
        self.store
            .fetch(player_id)
            .into_recorded()
            .unwrap_or_else(|| self.aggregator.empty_stats(player_id))
    }

    fn fold(&mut self, record: &MatchRecord, direction: Direction) -> Result<(), TournamentError> {
        let winner = determine_winner_with_ties(&record.result);
        for team in [Team::One, Team::Two] {
            let outcome = match winner {
                Some(w) if w == team => PlayerOutcome::Won,
                Some(_) => PlayerOutcome::Lost,
                None => PlayerOutcome::Drawn,
            };
            let (games_for, games_against) = record.games.for_team(team);
            for &player_id in record.team(team) {
                let current = self.current(player_id);
                let next = self
                    .aggregator
                    .apply(&current, outcome, games_for, games_against, direction)?;
                if self.pending.insert(player_id, next).is_none() {
                    self.order.push(player_id);
                }
            }
        }
        Ok(())
    }

    fn into_snapshots(mut self) -> Vec<PlayerStats> {
        self.order
            .iter()
            .filter_map(|id| self.pending.remove(id))
            .collect()
    }
}
