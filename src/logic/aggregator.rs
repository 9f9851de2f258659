//! Folds match outcomes into a player's running stats, forwards or in reverse.
//!
//! Every call produces a fresh [`PlayerStats`] from updated counts, so the derived
//! fields are recomputed rather than adjusted. Reversal is the exact inverse of
//! application: applying then reversing the same outcome returns an equal record.

use crate::models::{PlayerId, PlayerStats, PointsTable, ScoringPolicy, StatCounts, StatsError};

/// What a match meant for one participant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayerOutcome {
    Won,
    Lost,
    Drawn,
}

/// Whether deltas are added (a new result) or subtracted (undoing a recorded result).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn from_reverse_flag(reverse: bool) -> Self {
        if reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }
}

/// Stats updater bound to a scoring policy.
#[derive(Clone, Debug, Default)]
pub struct StatsAggregator<P = PointsTable> {
    policy: P,
}

impl<P: ScoringPolicy> StatsAggregator<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Zero-valued stats for a player without any recorded match.
    pub fn empty_stats(&self, player_id: PlayerId) -> PlayerStats {
        PlayerStats::from_counts(player_id, StatCounts::default(), &self.policy)
    }

    /// Recompute derived fields of `stats` under this aggregator's policy.
    pub fn rescore(&self, stats: &PlayerStats) -> PlayerStats {
        PlayerStats::from_counts(stats.player_id(), *stats.counts(), &self.policy)
    }

    /// Apply (or undo) one match for one participant.
    ///
    /// A decided match counts as one set for the winner and one against the loser;
    /// a draw touches no set counter. Games are always from the participant's side.
    pub fn apply(
        &self,
        current: &PlayerStats,
        outcome: PlayerOutcome,
        games_for: u32,
        games_against: u32,
        direction: Direction,
    ) -> Result<PlayerStats, StatsError> {
        let mut delta = Delta::new(current, direction);
        delta.step("total_matches", |c| &mut c.total_matches, 1)?;
        match outcome {
            PlayerOutcome::Won => {
                delta.step("matches_won", |c| &mut c.matches_won, 1)?;
                delta.step("sets_won", |c| &mut c.sets_won, 1)?;
            }
            PlayerOutcome::Lost => {
                delta.step("matches_lost", |c| &mut c.matches_lost, 1)?;
                delta.step("sets_lost", |c| &mut c.sets_lost, 1)?;
            }
            PlayerOutcome::Drawn => {
                delta.step("matches_drawn", |c| &mut c.matches_drawn, 1)?;
            }
        }
        delta.step("games_won", |c| &mut c.games_won, games_for)?;
        delta.step("games_lost", |c| &mut c.games_lost, games_against)?;

        log::debug!(
            "{:?} {:?} for player {} ({}-{} games)",
            direction,
            outcome,
            current.player_id(),
            games_for,
            games_against
        );
        Ok(delta.finish(&self.policy))
    }

    /// Apply (or undo) the end of a tournament: one more tournament played, and won if `won`.
    pub fn apply_tournament(
        &self,
        current: &PlayerStats,
        won: bool,
        direction: Direction,
    ) -> Result<PlayerStats, StatsError> {
        let mut delta = Delta::new(current, direction);
        delta.step("tournaments_played", |c| &mut c.tournaments_played, 1)?;
        if won {
            delta.step("tournaments_won", |c| &mut c.tournaments_won, 1)?;
        }
        log::debug!("{:?} tournament (won: {}) for player {}", direction, won, current.player_id());
        Ok(delta.finish(&self.policy))
    }
}

/// Working copy of the counts; fails on the first counter that would leave `u32`.
struct Delta {
    player_id: PlayerId,
    counts: StatCounts,
    direction: Direction,
}

impl Delta {
    fn new(current: &PlayerStats, direction: Direction) -> Self {
        Self {
            player_id: current.player_id(),
            counts: *current.counts(),
            direction,
        }
    }

    fn step(
        &mut self,
        field: &'static str,
        counter: impl FnOnce(&mut StatCounts) -> &mut u32,
        amount: u32,
    ) -> Result<(), StatsError> {
        let player_id = self.player_id;
        let value = counter(&mut self.counts);
        let next = match self.direction {
            Direction::Forward => value
                .checked_add(amount)
                .ok_or(StatsError::Overflow { player_id, field }),
            Direction::Reverse => value
                .checked_sub(amount)
                .ok_or(StatsError::Underflow { player_id, field }),
        };
        *value = next.inspect_err(|e| log::error!("{}", e))?;
        Ok(())
    }

    fn finish<P: ScoringPolicy + ?Sized>(self, policy: &P) -> PlayerStats {
        PlayerStats::from_counts(self.player_id, self.counts, policy)
    }
}

/// Zero-valued stats under the default 3 / 1 / 0 scoring.
pub fn create_empty_stats(player_id: PlayerId) -> PlayerStats {
    StatsAggregator::<PointsTable>::default().empty_stats(player_id)
}

/// Win/loss update under the default scoring. `reverse` undoes a previously applied result.
pub fn calculate_updated_stats(
    current: &PlayerStats,
    is_winner: bool,
    games_for: u32,
    games_against: u32,
    reverse: bool,
) -> Result<PlayerStats, StatsError> {
    let outcome = if is_winner {
        PlayerOutcome::Won
    } else {
        PlayerOutcome::Lost
    };
    StatsAggregator::<PointsTable>::default().apply(
        current,
        outcome,
        games_for,
        games_against,
        Direction::from_reverse_flag(reverse),
    )
}

/// Draw update under the default scoring. `reverse` undoes a previously applied draw.
pub fn calculate_updated_stats_for_tie(
    current: &PlayerStats,
    games_for: u32,
    games_against: u32,
    reverse: bool,
) -> Result<PlayerStats, StatsError> {
    StatsAggregator::<PointsTable>::default().apply(
        current,
        PlayerOutcome::Drawn,
        games_for,
        games_against,
        Direction::from_reverse_flag(reverse),
    )
}

/// `100 * matches_won / total_matches`, or 0 with no matches.
pub fn calculate_win_percentage(matches_won: u32, total_matches: u32) -> f64 {
    crate::models::win_percentage(matches_won, total_matches)
}
