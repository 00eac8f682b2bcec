//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Accumulator timers, no wall clock
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod difficulty;
pub mod path;
pub mod score;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{
    Contact, ContactKind, SideEffects, contact_kind, detect_and_resolve, detect_contacts,
};
pub use difficulty::{DifficultyTier, EnemyStats, EnemyType, stats_for};
pub use path::{PathShape, Trajectory, advance, plan_spawn};
pub use score::ScoreTracker;
pub use session::{GameOverReport, Session};
pub use state::{Bullet, Enemy, EntityKind, GameEvent, GamePhase, GameState, Player, PlayerColor};
pub use tick::{TickInput, tick};
