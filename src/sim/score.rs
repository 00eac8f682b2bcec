//! Score and lives bookkeeping

use serde::{Deserialize, Serialize};

use super::difficulty::EnemyType;
use crate::consts::STARTING_LIVES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    score: u64,
    lives: u8,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    /// Credit a popped balloon, returns the points awarded
    pub fn credit(&mut self, kind: EnemyType) -> u64 {
        let points = kind.points();
        self.score = self.score.saturating_add(points);
        points
    }

    /// Remove one life, returns lives remaining
    pub fn lose_life(&mut self) -> u8 {
        debug_assert!(self.lives > 0, "lose_life with no lives left");
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}
