//! Game state and core simulation types
//!
//! Everything one session owns lives here: the tier it was started with,
//! the entities, the timers and the outgoing event buffer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyTier, EnemyType};
use super::path::Trajectory;
use super::score::ScoreTracker;
use crate::consts::*;
use crate::{Playfield, heading_vector};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Set up, waiting for the first tick
    Initializing,
    /// Active gameplay
    Running,
    /// Frozen by an external pause request
    Paused,
    /// Lives exhausted or session ended; only a new game leaves this phase
    GameOver,
}

/// Entity discriminator used for collision pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Bullet,
}

/// Ship color (also selects the laser color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerColor {
    #[default]
    Green,
    Blue,
    Red,
}

impl PlayerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::Green => "green",
            PlayerColor::Blue => "blue",
            PlayerColor::Red => "red",
        }
    }

    /// Integer encoding used by the settings store
    pub fn encoding(&self) -> u8 {
        match self {
            PlayerColor::Green => 0,
            PlayerColor::Blue => 1,
            PlayerColor::Red => 2,
        }
    }

    pub fn from_encoding(encoding: i64) -> Option<Self> {
        match encoding {
            0 => Some(PlayerColor::Green),
            1 => Some(PlayerColor::Blue),
            2 => Some(PlayerColor::Red),
            _ => None,
        }
    }
}

/// The player's ship. Immobile as a physics body: it triggers contacts but
/// is never pushed by them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    /// Facing angle (radians, 0 = +x)
    pub facing: f32,
    pub color: PlayerColor,
    pub radius: f32,
}

impl Player {
    pub fn new(id: u32, pos: Vec2, color: PlayerColor) -> Self {
        Self {
            id,
            pos,
            facing: 0.0,
            color,
            radius: PLAYER_RADIUS,
        }
    }
}

/// A balloon following its spawn trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyType,
    pub health: u8,
    pub max_health: u8,
    pub pos: Vec2,
    pub path: Trajectory,
    /// Distance travelled along `path`
    pub traveled: f32,
    /// Speed along the path (units/s)
    pub speed: f32,
    pub radius: f32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyType, health: u8, speed: f32, path: Trajectory) -> Self {
        Self {
            id,
            kind,
            health,
            max_health: health,
            pos: path.start(),
            path,
            traveled: 0.0,
            speed,
            radius: ENEMY_RADIUS,
        }
    }

    /// Reached the end of its path without being popped
    pub fn has_escaped(&self) -> bool {
        self.path.is_complete(self.traveled)
    }
}

/// A laser bolt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub color: PlayerColor,
    pub pos: Vec2,
    /// Heading angle (radians)
    pub heading: f32,
    pub speed: f32,
    /// Seconds left before the bolt expires
    pub ttl: f32,
    /// Half extents of the bolt rectangle, x along heading
    pub half_extents: Vec2,
}

impl Bullet {
    pub fn new(id: u32, color: PlayerColor, pos: Vec2, heading: f32, speed: f32) -> Self {
        Self {
            id,
            color,
            pos,
            heading,
            speed,
            ttl: BULLET_LIFETIME,
            half_extents: Vec2::new(BULLET_LENGTH / 2.0, BULLET_THICKNESS / 2.0),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += heading_vector(self.heading) * self.speed * dt;
        self.ttl -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.ttl <= 0.0
    }
}

/// Discrete events for render/audio collaborators (fire-and-forget)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned {
        id: u32,
        kind: EnemyType,
        pos: Vec2,
    },
    BulletFired {
        id: u32,
        color: PlayerColor,
        pos: Vec2,
        heading: f32,
    },
    /// Hit marker at the bolt's position
    EnemyHit {
        id: u32,
        pos: Vec2,
        remaining_health: u8,
        max_health: u8,
    },
    /// Explosion at the balloon's position
    EnemyDestroyed {
        id: u32,
        kind: EnemyType,
        pos: Vec2,
        points: u64,
    },
    /// Explosion where the balloon struck the ship
    PlayerHit {
        enemy_id: u32,
        kind: EnemyType,
        pos: Vec2,
        lives_remaining: u8,
    },
    GameOver {
        score: u64,
    },
}

/// Complete state of one session (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Tier chosen at session start
    pub tier: DifficultyTier,
    pub playfield: Playfield,
    pub phase: GamePhase,
    pub scores: ScoreTracker,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    /// Seconds accumulated toward the next spawn
    pub spawn_clock: f32,
    /// Seconds since the last shot
    pub fire_clock: f32,
    pub player: Player,
    /// Active balloons (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Active bolts (sorted by id)
    pub bullets: Vec<Bullet>,
    /// Events emitted since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(tier: DifficultyTier, color: PlayerColor, playfield: Playfield, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tier,
            playfield,
            phase: GamePhase::Initializing,
            scores: ScoreTracker::new(),
            time_ticks: 0,
            spawn_clock: 0.0,
            fire_clock: 0.0,
            player: Player::new(0, playfield.center(), color),
            enemies: Vec::new(),
            bullets: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.player.id = state.next_entity_id();
        state
    }

    /// Allocate a new entity ID (creation order)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Freeze the session as terminal; clears transient entities.
    /// Returns the game-over event the first time only.
    pub fn enter_game_over(&mut self) -> Option<GameEvent> {
        if self.is_over() {
            return None;
        }
        self.phase = GamePhase::GameOver;
        self.enemies.clear();
        self.bullets.clear();
        Some(GameEvent::GameOver {
            score: self.scores.score(),
        })
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
    }
}
