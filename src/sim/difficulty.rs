//! Difficulty tiers and per-balloon stats
//!
//! Static data: every tier is a complete table, chosen once at session start.

use serde::{Deserialize, Serialize};

/// Balloon types, from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyType {
    /// Green balloon
    Weak,
    /// Orange balloon
    Medium,
    /// Pink balloon
    Strong,
}

impl EnemyType {
    pub const ALL: [EnemyType; 3] = [EnemyType::Weak, EnemyType::Medium, EnemyType::Strong];

    /// Points credited when this balloon is popped
    pub fn points(&self) -> u64 {
        match self {
            EnemyType::Weak => 5,
            EnemyType::Medium => 50,
            EnemyType::Strong => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyType::Weak => "green",
            EnemyType::Medium => "orange",
            EnemyType::Strong => "pink",
        }
    }
}

/// Health and speed of one balloon type within a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: u8,
    /// Speed along the path (units/s)
    pub speed: f32,
}

const fn stats(health: u8, speed: f32) -> EnemyStats {
    EnemyStats { health, speed }
}

/// Difficulty tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum DifficultyTier {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(DifficultyTier::Easy),
            "medium" | "med" => Some(DifficultyTier::Medium),
            "hard" => Some(DifficultyTier::Hard),
            _ => None,
        }
    }

    /// Seconds between balloon spawns
    pub fn spawn_interval(&self) -> f32 {
        match self {
            DifficultyTier::Easy => 2.5,
            DifficultyTier::Medium => 2.0,
            DifficultyTier::Hard => 1.5,
        }
    }

    /// Stats for a balloon type in this tier
    pub fn stats_for(&self, kind: EnemyType) -> EnemyStats {
        stats_for(*self, kind)
    }
}

/// Lookup table. Health and speed never decrease as the tier rises.
pub fn stats_for(tier: DifficultyTier, kind: EnemyType) -> EnemyStats {
    use DifficultyTier as T;
    use EnemyType as E;
    match (tier, kind) {
        (T::Easy, E::Weak) => stats(1, 80.0),
        (T::Easy, E::Medium) => stats(1, 60.0),
        (T::Easy, E::Strong) => stats(2, 40.0),
        (T::Medium, E::Weak) => stats(1, 90.0),
        (T::Medium, E::Medium) => stats(2, 70.0),
        (T::Medium, E::Strong) => stats(2, 50.0),
        (T::Hard, E::Weak) => stats(2, 100.0),
        (T::Hard, E::Medium) => stats(3, 80.0),
        (T::Hard, E::Strong) => stats(4, 60.0),
    }
}
