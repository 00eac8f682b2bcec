//! Contact detection and resolution
//!
//! Only two pairings matter: a bolt touching a balloon, and a balloon
//! touching the ship. Pairs are matched on the unordered pair of entity
//! kinds; everything else is ignored even when it overlaps.

use glam::Vec2;

use super::state::{EntityKind, GameEvent, GameState};
use crate::heading_vector;

/// Circle/circle overlap (touching counts)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Circle vs oriented rectangle, via the closest point in the rectangle's frame
pub fn circle_rect_overlap(
    center: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
    angle: f32,
) -> bool {
    let axis = heading_vector(angle);
    let rel = center - rect_center;
    // Rotate into the rectangle's local frame
    let local = Vec2::new(rel.dot(axis), rel.dot(axis.perp()));
    let closest = local.clamp(-half_extents, half_extents);
    local.distance_squared(closest) <= radius * radius
}

/// Pairing that produces a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    BulletEnemy,
    PlayerEnemy,
}

/// Explicit dispatch on the unordered pair of kinds
pub fn contact_kind(a: EntityKind, b: EntityKind) -> Option<ContactKind> {
    use EntityKind::*;
    match (a, b) {
        (Bullet, Enemy) | (Enemy, Bullet) => Some(ContactKind::BulletEnemy),
        (Player, Enemy) | (Enemy, Player) => Some(ContactKind::PlayerEnemy),
        (Player, Player)
        | (Enemy, Enemy)
        | (Bullet, Bullet)
        | (Player, Bullet)
        | (Bullet, Player) => None,
    }
}

/// A detected overlap between two eligible entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    BulletEnemy {
        bullet: u32,
        enemy: u32,
    },
    PlayerEnemy {
        player: u32,
        enemy: u32,
    },
}

impl Contact {
    /// Resolution order: by entity creation order of the pair, older id first
    fn order_key(&self) -> (u32, u32) {
        let (a, b) = match *self {
            Contact::BulletEnemy { bullet, enemy } => (bullet, enemy),
            Contact::PlayerEnemy { player, enemy } => (player, enemy),
        };
        (a.min(b), a.max(b))
    }
}

/// Everything a resolution pass changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideEffects {
    pub score_delta: u64,
    pub lives_lost: u8,
    pub removed_enemies: Vec<u32>,
    pub removed_bullets: Vec<u32>,
    pub events: Vec<GameEvent>,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy)]
struct Body {
    id: u32,
    kind: EntityKind,
    /// Position in the owning collection; 0 for the player
    index: usize,
}

fn collect_bodies(state: &GameState) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(1 + state.enemies.len() + state.bullets.len());
    bodies.push(Body {
        id: state.player.id,
        kind: EntityKind::Player,
        index: 0,
    });
    bodies.extend(state.enemies.iter().enumerate().map(|(index, e)| Body {
        id: e.id,
        kind: EntityKind::Enemy,
        index,
    }));
    bodies.extend(state.bullets.iter().enumerate().map(|(index, b)| Body {
        id: b.id,
        kind: EntityKind::Bullet,
        index,
    }));
    bodies.sort_by_key(|b| b.id);
    bodies
}

/// Geometry test for a pairing: balloons and the ship are circles, bolts are
/// oriented rectangles.
fn touches(state: &GameState, kind: ContactKind, enemy: &Body, other: &Body) -> bool {
    let balloon = &state.enemies[enemy.index];
    match kind {
        ContactKind::BulletEnemy => {
            let bolt = &state.bullets[other.index];
            circle_rect_overlap(
                balloon.pos,
                balloon.radius,
                bolt.pos,
                bolt.half_extents,
                bolt.heading,
            )
        }
        ContactKind::PlayerEnemy => circles_overlap(
            balloon.pos,
            balloon.radius,
            state.player.pos,
            state.player.radius,
        ),
    }
}

/// Find every eligible overlapping pair, in resolution order
pub fn detect_contacts(state: &GameState) -> Vec<Contact> {
    let bodies = collect_bodies(state);
    let mut contacts = Vec::new();

    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let Some(kind) = contact_kind(a.kind, b.kind) else {
                continue;
            };
            let (enemy, other) = if a.kind == EntityKind::Enemy {
                (a, b)
            } else {
                (b, a)
            };
            if !touches(state, kind, enemy, other) {
                continue;
            }
            contacts.push(match kind {
                ContactKind::BulletEnemy => Contact::BulletEnemy {
                    bullet: other.id,
                    enemy: enemy.id,
                },
                ContactKind::PlayerEnemy => Contact::PlayerEnemy {
                    player: other.id,
                    enemy: enemy.id,
                },
            });
        }
    }

    contacts.sort_by_key(Contact::order_key);
    contacts
}

/// Apply contacts to the state. Each contact is resolved independently;
/// a bolt is spent on its first hit and a removed balloon takes no more hits.
pub fn resolve_contacts(state: &mut GameState, contacts: &[Contact]) -> SideEffects {
    let mut fx = SideEffects::default();

    for contact in contacts {
        if state.scores.is_out_of_lives() {
            break;
        }
        match *contact {
            Contact::BulletEnemy { bullet, enemy } => {
                if fx.removed_bullets.contains(&bullet) || fx.removed_enemies.contains(&enemy) {
                    continue;
                }
                let Some(hit_pos) = state
                    .bullets
                    .iter()
                    .find(|b| b.id == bullet)
                    .map(|b| b.pos)
                else {
                    debug_assert!(false, "contact with unknown bullet {bullet}");
                    continue;
                };
                let Some(target) = state.enemies.iter_mut().find(|e| e.id == enemy) else {
                    debug_assert!(false, "contact with unknown enemy {enemy}");
                    continue;
                };

                debug_assert!(target.health > 0);
                target.health = target.health.saturating_sub(1);
                let (kind, pos, remaining) = (target.kind, target.pos, target.health);
                let max_health = target.max_health;

                fx.removed_bullets.push(bullet);
                fx.events.push(GameEvent::EnemyHit {
                    id: enemy,
                    pos: hit_pos,
                    remaining_health: remaining,
                    max_health,
                });

                if remaining == 0 {
                    let points = state.scores.credit(kind);
                    fx.score_delta += points;
                    fx.removed_enemies.push(enemy);
                    fx.events.push(GameEvent::EnemyDestroyed {
                        id: enemy,
                        kind,
                        pos,
                        points,
                    });
                }
            }
            Contact::PlayerEnemy { enemy, .. } => {
                if fx.removed_enemies.contains(&enemy) {
                    continue;
                }
                let Some(target) = state.enemies.iter().find(|e| e.id == enemy) else {
                    debug_assert!(false, "contact with unknown enemy {enemy}");
                    continue;
                };
                let (kind, pos) = (target.kind, target.pos);

                let lives_remaining = state.scores.lose_life();
                fx.lives_lost += 1;
                fx.removed_enemies.push(enemy);
                fx.events.push(GameEvent::PlayerHit {
                    enemy_id: enemy,
                    kind,
                    pos,
                    lives_remaining,
                });

                if lives_remaining == 0 {
                    fx.game_over = true;
                }
            }
        }
    }

    state
        .enemies
        .retain(|e| !fx.removed_enemies.contains(&e.id));
    state
        .bullets
        .retain(|b| !fx.removed_bullets.contains(&b.id));

    if fx.game_over {
        if let Some(event) = state.enter_game_over() {
            fx.events.push(event);
        }
    }

    state.events.extend(fx.events.iter().cloned());
    fx
}

/// Detect and resolve in one pass. No-op once the session is over.
pub fn detect_and_resolve(state: &mut GameState) -> SideEffects {
    if state.is_over() {
        return SideEffects::default();
    }
    let contacts = detect_contacts(state);
    resolve_contacts(state, &contacts)
}
