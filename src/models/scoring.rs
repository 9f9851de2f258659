//! Tournament points: the pluggable policy behind the primary ranking key.

use crate::models::player::StatCounts;
use serde::Serialize;

/// Turns a player's counts into tournament points.
pub trait ScoringPolicy {
    fn points(&self, counts: &StatCounts) -> f64;
}

impl<F> ScoringPolicy for F
where
    F: Fn(&StatCounts) -> f64,
{
    fn points(&self, counts: &StatCounts) -> f64 {
        self(counts)
    }
}

/// Fixed points per won, drawn and lost match. Default is 3 / 1 / 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PointsTable {
    win: f64,
    draw: f64,
    loss: f64,
}

impl PointsTable {
    /// A win must be worth more than a draw, and a draw more than a loss.
    pub fn new(win: f64, draw: f64, loss: f64) -> Result<Self, InvalidPointsTable> {
        let finite = win.is_finite() && draw.is_finite() && loss.is_finite();
        if !finite || win <= draw || draw <= loss {
            return Err(InvalidPointsTable { win, draw, loss });
        }
        Ok(Self { win, draw, loss })
    }

    pub fn win(&self) -> f64 {
        self.win
    }

    pub fn draw(&self) -> f64 {
        self.draw
    }

    pub fn loss(&self) -> f64 {
        self.loss
    }
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            win: 3.0,
            draw: 1.0,
            loss: 0.0,
        }
    }
}

impl ScoringPolicy for PointsTable {
    fn points(&self, counts: &StatCounts) -> f64 {
        self.win * f64::from(counts.matches_won)
            + self.draw * f64::from(counts.matches_drawn)
            + self.loss * f64::from(counts.matches_lost)
    }
}

/// Rejected points table (weights not strictly decreasing from win to loss).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidPointsTable {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl std::fmt::Display for InvalidPointsTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Points must satisfy win > draw > loss (got {} / {} / {})",
            self.win, self.draw, self.loss
        )
    }
}

impl std::error::Error for InvalidPointsTable {}
