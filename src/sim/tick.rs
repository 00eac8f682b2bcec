//! Simulation tick
//!
//! Advances a running session by one step: motion, player movement, firing,
//! spawning, then contact resolution. Timers are elapsed-time accumulators,
//! so a paused session keeps their remainders untouched.

use glam::Vec2;

use super::collision;
use super::path;
use super::state::{Bullet, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::vector_heading;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Joystick direction, magnitude in [0, 1]
    pub direction: Vec2,
    /// Fire intent (held while the joystick is engaged)
    pub fire: bool,
}

impl TickInput {
    /// Direction clamped to unit length; non-finite input reads as idle
    pub fn sanitized_direction(&self) -> Vec2 {
        if !self.direction.is_finite() {
            return Vec2::ZERO;
        }
        self.direction.clamp_length_max(1.0)
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Initializing => {
            state.phase = GamePhase::Running;
            log::info!(
                "Session started: tier={}, seed={}",
                state.tier.as_str(),
                state.seed
            );
        }
        GamePhase::Running => {}
        GamePhase::Paused | GamePhase::GameOver => return,
    }

    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    state.time_ticks += 1;

    advance_entities(state, dt);
    move_player(state, input, dt);
    fire(state, input, dt);
    spawn(state, dt);

    let fx = collision::detect_and_resolve(state);
    if fx.game_over {
        log::info!(
            "Game over after {} ticks, final score {}",
            state.time_ticks,
            state.scores.score()
        );
    }

    state.normalize_order();
}

/// Move balloons along their paths and bolts along their headings;
/// drop escaped balloons and expired bolts.
fn advance_entities(state: &mut GameState, dt: f32) {
    for enemy in &mut state.enemies {
        path::advance(enemy, dt);
    }
    state.enemies.retain(|e| {
        if e.has_escaped() {
            log::debug!("Balloon {} escaped", e.id);
            false
        } else {
            true
        }
    });

    for bullet in &mut state.bullets {
        bullet.advance(dt);
    }
    state.bullets.retain(|b| !b.is_expired());
}

fn move_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let direction = input.sanitized_direction();
    if direction == Vec2::ZERO {
        return;
    }
    let player = &mut state.player;
    player.pos = state.playfield.clamp(player.pos + direction * PLAYER_SPEED * dt);
    player.facing = crate::normalize_angle(vector_heading(direction));
}

fn fire(state: &mut GameState, input: &TickInput, dt: f32) {
    // Capped so an idle ship doesn't accumulate unbounded time
    state.fire_clock = (state.fire_clock + dt).min(1.0);
    if !input.fire || state.fire_clock <= FIRE_COOLDOWN {
        return;
    }
    state.fire_clock = 0.0;

    let id = state.next_entity_id();
    let player = &state.player;
    let speed = state.playfield.width() / BULLET_LIFETIME;
    let bullet = Bullet::new(id, player.color, player.pos, player.facing, speed);
    state.events.push(GameEvent::BulletFired {
        id,
        color: bullet.color,
        pos: bullet.pos,
        heading: bullet.heading,
    });
    state.bullets.push(bullet);
}

fn spawn(state: &mut GameState, dt: f32) {
    state.spawn_clock += dt;
    let interval = state.tier.spawn_interval();
    if state.spawn_clock < interval {
        return;
    }
    state.spawn_clock -= interval;

    let id = state.next_entity_id();
    let enemy = path::plan_spawn(state.tier, &state.playfield, &mut state.rng, id);
    log::debug!(
        "Spawned {} balloon {} at ({:.0}, {:.0}), curved={}",
        enemy.kind.as_str(),
        id,
        enemy.pos.x,
        enemy.pos.y,
        enemy.path.is_curved()
    );
    state.events.push(GameEvent::EnemySpawned {
        id,
        kind: enemy.kind,
        pos: enemy.pos,
    });
    state.enemies.push(enemy);
}
