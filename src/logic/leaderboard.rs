//! Leaderboard ordering and display rows.

use crate::models::{Player, PlayerId, PlayerStats, StatCounts};
use serde::Serialize;
use std::cmp::Ordering;

/// Sort players into leaderboard order.
///
/// Players with stats come first, ordered by tournament points, win percentage,
/// set difference, game difference and tournaments won (all descending), then by
/// name ascending. Players without stats follow in their input order. The sort is
/// stable, so fully equal entries keep their relative input order.
pub fn sort_leaderboard(mut players: Vec<Player>) -> Vec<Player> {
    players.sort_by(compare_standing);
    players
}

fn compare_standing(a: &Player, b: &Player) -> Ordering {
    match (a.stats.recorded(), b.stats.recorded()) {
        (Some(x), Some(y)) => compare_stats(x, y).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Better stats sort first.
fn compare_stats(a: &PlayerStats, b: &PlayerStats) -> Ordering {
    let (ca, cb) = (a.counts(), b.counts());
    b.tournament_points()
        .total_cmp(&a.tournament_points())
        .then_with(|| b.win_percentage().total_cmp(&a.win_percentage()))
        .then_with(|| cb.set_difference().cmp(&ca.set_difference()))
        .then_with(|| cb.game_difference().cmp(&ca.game_difference()))
        .then_with(|| cb.tournaments_won.cmp(&ca.tournaments_won))
}

/// One leaderboard line (for API / CSV).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub total_matches: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_drawn: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub tournaments_played: u32,
    pub tournaments_won: u32,
    pub win_percentage: f64,
    pub tournament_points: f64,
}

impl LeaderboardRow {
    fn new(rank: usize, player: &Player) -> Self {
        let (counts, win_percentage, tournament_points) = match player.stats.recorded() {
            Some(s) => (*s.counts(), s.win_percentage(), s.tournament_points()),
            None => (StatCounts::default(), 0.0, 0.0),
        };
        Self {
            rank,
            player_id: player.id,
            name: player.name.clone(),
            total_matches: counts.total_matches,
            matches_won: counts.matches_won,
            matches_lost: counts.matches_lost,
            matches_drawn: counts.matches_drawn,
            sets_won: counts.sets_won,
            sets_lost: counts.sets_lost,
            games_won: counts.games_won,
            games_lost: counts.games_lost,
            tournaments_played: counts.tournaments_played,
            tournaments_won: counts.tournaments_won,
            win_percentage,
            tournament_points,
        }
    }
}

/// Sorted leaderboard with 1-based ranks.
pub fn leaderboard_rows(players: Vec<Player>) -> Vec<LeaderboardRow> {
    sort_leaderboard(players)
        .iter()
        .enumerate()
        .map(|(i, p)| LeaderboardRow::new(i + 1, p))
        .collect()
}

/// Write rows as CSV with a header line.
pub fn write_leaderboard_csv<W: std::io::Write>(rows: &[LeaderboardRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
