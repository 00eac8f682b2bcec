//! Balloon Defense - A 2D arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, motion, collisions, session)
//! - `input`: Joystick reduction of touch events into per-tick input
//! - `settings`: Difficulty / color preferences
//! - `highscores`: Leaderboard collaborator boundary
//! - `audio`: Sound effect dispatch for simulation events

pub mod audio;
pub mod highscores;
pub mod input;
pub mod settings;
pub mod sim;

pub use highscores::{InMemoryLeaderboard, Leaderboard, ScoreRecord};
pub use settings::{PlayerColor, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the runner (60 Hz, matches the display rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 400.0;

    /// Lives at the start of every session
    pub const STARTING_LIVES: u8 = 5;

    /// Player ship sprite is 65x45; hitbox is a circle of half the width
    pub const PLAYER_WIDTH: f32 = 65.0;
    pub const PLAYER_RADIUS: f32 = PLAYER_WIDTH / 2.0;
    /// Player speed at full joystick deflection (units/s)
    pub const PLAYER_SPEED: f32 = 270.0;

    /// Enemy balloon sprite is 60x70
    pub const ENEMY_WIDTH: f32 = 60.0;
    pub const ENEMY_HEIGHT: f32 = 70.0;
    pub const ENEMY_RADIUS: f32 = ENEMY_WIDTH / 2.0;

    /// Laser bolt rectangle
    pub const BULLET_LENGTH: f32 = 15.0;
    pub const BULLET_THICKNESS: f32 = 5.0;
    /// Bolts cross one playfield width over their lifetime
    pub const BULLET_LIFETIME: f32 = 0.5;
    /// Minimum time between shots (seconds)
    pub const FIRE_COOLDOWN: f32 = 0.2;

    /// Curved path control point offsets (vertical, from the spawn point)
    pub const CURVE_RISE_FROM_LEFT: f32 = 300.0;
    pub const CURVE_DROP_FROM_RIGHT: f32 = 400.0;
    /// How far past the opposite edge paths end
    pub const CURVE_OVERSHOOT_LEFT: f32 = 400.0;
    pub const CURVE_OVERSHOOT_RIGHT: f32 = 500.0;
    pub const STRAIGHT_OVERSHOOT: f32 = 200.0;
}

/// Axis-aligned playfield rectangle (y grows upward)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Playfield {
    pub min: Vec2,
    pub max: Vec2,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Clamp a point into the playfield, each axis independently
    #[inline]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(consts::PLAYFIELD_WIDTH, consts::PLAYFIELD_HEIGHT)
    }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vector(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Heading angle of a vector
#[inline]
pub fn vector_heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
