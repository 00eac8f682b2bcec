//! Balloon trajectories
//!
//! Paths are parameterized by arc length so balloons move at a constant
//! speed along curves. Position is a pure function of distance travelled,
//! which makes advancement resumable at any tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyTier, EnemyType};
use super::state::Enemy;
use crate::Playfield;
use crate::consts::*;

/// Samples used to build the arc-length table of a curve
const PATH_SAMPLES: usize = 48;

/// Geometric shape of a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathShape {
    Straight { start: Vec2, end: Vec2 },
    /// Quadratic Bezier curve
    Curve {
        start: Vec2,
        control: Vec2,
        end: Vec2,
    },
}

impl PathShape {
    /// Point at curve parameter t in [0, 1]
    pub fn point_at(&self, t: f32) -> Vec2 {
        match *self {
            PathShape::Straight { start, end } => start.lerp(end, t),
            PathShape::Curve {
                start,
                control,
                end,
            } => {
                let u = 1.0 - t;
                start * (u * u) + control * (2.0 * u * t) + end * (t * t)
            }
        }
    }
}

/// A path plus its cumulative arc-length table. Serialized as its shape;
/// the table is always rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PathShape", into = "PathShape")]
pub struct Trajectory {
    pub shape: PathShape,
    /// Cumulative length at each sample (`PATH_SAMPLES + 1` entries, first is 0)
    lengths: Vec<f32>,
}

impl Trajectory {
    pub fn new(shape: PathShape) -> Self {
        let mut lengths = Vec::with_capacity(PATH_SAMPLES + 1);
        lengths.push(0.0);
        let mut prev = shape.point_at(0.0);
        let mut total = 0.0;
        for i in 1..=PATH_SAMPLES {
            let p = shape.point_at(i as f32 / PATH_SAMPLES as f32);
            total += p.distance(prev);
            lengths.push(total);
            prev = p;
        }
        Self { shape, lengths }
    }

    pub fn start(&self) -> Vec2 {
        self.shape.point_at(0.0)
    }

    pub fn end(&self) -> Vec2 {
        self.shape.point_at(1.0)
    }

    /// Total arc length
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    pub fn is_curved(&self) -> bool {
        matches!(self.shape, PathShape::Curve { .. })
    }

    /// Whether a traveller at `distance` has reached the end point
    pub fn is_complete(&self, distance: f32) -> bool {
        distance >= self.length()
    }

    /// Position after travelling `distance` along the path
    pub fn position_at(&self, distance: f32) -> Vec2 {
        let total = self.length();
        if total <= 0.0 {
            return self.start();
        }
        let d = distance.clamp(0.0, total);

        // First sample whose cumulative length reaches d
        let idx = self.lengths.partition_point(|&l| l < d).max(1);
        let (l0, l1) = (self.lengths[idx - 1], self.lengths[idx]);
        let seg = l1 - l0;
        let frac = if seg > 0.0 { (d - l0) / seg } else { 0.0 };
        let t = ((idx - 1) as f32 + frac) / PATH_SAMPLES as f32;
        self.shape.point_at(t.min(1.0))
    }
}

impl From<PathShape> for Trajectory {
    fn from(shape: PathShape) -> Self {
        Self::new(shape)
    }
}

impl From<Trajectory> for PathShape {
    fn from(path: Trajectory) -> Self {
        path.shape
    }
}

/// Move a balloon along its path, returns the new position
pub fn advance(enemy: &mut Enemy, dt: f32) -> Vec2 {
    let step = (enemy.speed * dt).max(0.0);
    enemy.traveled = (enemy.traveled + step).min(enemy.path.length());
    enemy.pos = enemy.path.position_at(enemy.traveled);
    enemy.pos
}

/// Which edge a balloon enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSide {
    Left,
    Right,
}

/// Build the path for a balloon entering at height `y`
pub fn plan_path(playfield: &Playfield, side: SpawnSide, curved: bool, y: f32) -> Trajectory {
    let start = match side {
        SpawnSide::Left => Vec2::new(playfield.min.x - ENEMY_WIDTH / 2.0, y),
        SpawnSide::Right => Vec2::new(playfield.max.x + ENEMY_WIDTH / 2.0, y),
    };

    let shape = match (side, curved) {
        (SpawnSide::Left, true) => PathShape::Curve {
            start,
            control: start + Vec2::new(0.0, CURVE_RISE_FROM_LEFT),
            end: Vec2::new(playfield.max.x + CURVE_OVERSHOOT_LEFT, y),
        },
        (SpawnSide::Right, true) => PathShape::Curve {
            start,
            control: start - Vec2::new(0.0, CURVE_DROP_FROM_RIGHT),
            end: Vec2::new(playfield.min.x - CURVE_OVERSHOOT_RIGHT, playfield.min.y),
        },
        (SpawnSide::Left, false) => PathShape::Straight {
            start,
            end: Vec2::new(playfield.max.x + STRAIGHT_OVERSHOOT, y),
        },
        (SpawnSide::Right, false) => PathShape::Straight {
            start,
            end: Vec2::new(playfield.min.x - STRAIGHT_OVERSHOOT, y),
        },
    };

    Trajectory::new(shape)
}

/// Roll a new balloon: type, side and path shape are each uniform.
pub fn plan_spawn<R: Rng>(
    tier: DifficultyTier,
    playfield: &Playfield,
    rng: &mut R,
    id: u32,
) -> Enemy {
    let kind = EnemyType::ALL[rng.random_range(0..EnemyType::ALL.len())];
    let side = if rng.random_bool(0.5) {
        SpawnSide::Left
    } else {
        SpawnSide::Right
    };
    let curved = rng.random_bool(0.5);

    let lo = playfield.min.y + ENEMY_HEIGHT / 2.0;
    let hi = playfield.max.y - ENEMY_HEIGHT / 2.0;
    let y = if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        playfield.center().y
    };

    let stats = tier.stats_for(kind);
    let path = plan_path(playfield, side, curved, y);
    Enemy::new(id, kind, stats.health, stats.speed, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Playfield {
        Playfield::new(400.0, 400.0)
    }

    #[test]
    fn test_straight_length_and_midpoint() {
        let path = Trajectory::new(PathShape::Straight {
            start: Vec2::new(0.0, 10.0),
            end: Vec2::new(100.0, 10.0),
        });
        assert!((path.length() - 100.0).abs() < 1e-3);
        let mid = path.position_at(50.0);
        assert!((mid - Vec2::new(50.0, 10.0)).length() < 1e-3);
        assert_eq!(path.position_at(500.0), path.end());
        assert!(path.is_complete(100.0));
        assert!(!path.is_complete(99.0));
    }

    #[test]
    fn test_curve_constant_speed() {
        let path = Trajectory::new(PathShape::Curve {
            start: Vec2::new(0.0, 0.0),
            control: Vec2::new(0.0, 300.0),
            end: Vec2::new(400.0, 0.0),
        });
        // Equal distance steps produce roughly equal chord lengths
        let step = path.length() / 20.0;
        let mut prev = path.position_at(0.0);
        for i in 1..=20 {
            let p = path.position_at(step * i as f32);
            let chord = p.distance(prev);
            assert!(chord <= step * 1.02);
            assert!(chord > step * 0.9);
            prev = p;
        }
    }

    #[test]
    fn test_plan_path_left_curve() {
        let path = plan_path(&field(), SpawnSide::Left, true, 120.0);
        assert_eq!(path.start(), Vec2::new(-30.0, 120.0));
        match path.shape {
            PathShape::Curve { control, end, .. } => {
                assert_eq!(control, Vec2::new(-30.0, 420.0));
                assert_eq!(end, Vec2::new(800.0, 120.0));
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn test_plan_path_right_curve() {
        let path = plan_path(&field(), SpawnSide::Right, true, 200.0);
        assert_eq!(path.start(), Vec2::new(430.0, 200.0));
        match path.shape {
            PathShape::Curve { control, end, .. } => {
                assert_eq!(control, Vec2::new(430.0, -200.0));
                assert_eq!(end, Vec2::new(-500.0, 0.0));
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn test_plan_path_straight_keeps_height() {
        let path = plan_path(&field(), SpawnSide::Right, false, 77.0);
        assert_eq!(path.end(), Vec2::new(-200.0, 77.0));
        assert!(!path.is_curved());
    }

    #[test]
    fn test_plan_spawn_uses_tier_stats() {
        let mut rng = Pcg32::seed_from_u64(42);
        for id in 0..50 {
            let enemy = plan_spawn(DifficultyTier::Hard, &field(), &mut rng, id);
            let stats = DifficultyTier::Hard.stats_for(enemy.kind);
            assert_eq!(enemy.health, stats.health);
            assert_eq!(enemy.speed, stats.speed);
            assert!(enemy.pos.y >= ENEMY_HEIGHT / 2.0);
            assert!(enemy.pos.y <= 400.0 - ENEMY_HEIGHT / 2.0);
            assert!(enemy.pos.x < 0.0 || enemy.pos.x > 400.0);
        }
    }

    #[test]
    fn test_plan_spawn_covers_all_variants() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut kinds = std::collections::HashSet::new();
        let (mut left, mut right, mut curved, mut straight) = (0, 0, 0, 0);
        for id in 0..200 {
            let enemy = plan_spawn(DifficultyTier::Easy, &field(), &mut rng, id);
            kinds.insert(enemy.kind);
            if enemy.pos.x < 0.0 {
                left += 1;
            } else {
                right += 1;
            }
            if enemy.path.is_curved() {
                curved += 1;
            } else {
                straight += 1;
            }
        }
        assert_eq!(kinds.len(), 3);
        assert!(left > 0 && right > 0 && curved > 0 && straight > 0);
    }

    #[test]
    fn test_deserialize_rebuilds_length_table() {
        let path = plan_path(&field(), SpawnSide::Right, true, 150.0);
        let json = serde_json::to_string(&path).unwrap();
        assert!(!json.contains("lengths"));
        let restored: Trajectory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, path);

        let json = r#"{"Straight":{"start":[0.0,0.0],"end":[10.0,0.0]}}"#;
        let restored: Trajectory = serde_json::from_str(json).unwrap();
        assert!((restored.length() - 10.0).abs() < 1e-4);
        assert!((restored.position_at(5.0) - Vec2::new(5.0, 0.0)).length() < 1e-4);

        // A hand-made length table is not accepted
        let stale = format!(r#"{{"shape":{json},"lengths":[5.0]}}"#);
        assert!(serde_json::from_str::<Trajectory>(&stale).is_err());
    }

    #[test]
    fn test_advance_reaches_end() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut enemy = plan_spawn(DifficultyTier::Medium, &field(), &mut rng, 1);
        let mut ticks = 0;
        while !enemy.has_escaped() {
            advance(&mut enemy, 1.0 / 60.0);
            ticks += 1;
            assert!(ticks < 100_000);
        }
        assert!((enemy.pos - enemy.path.end()).length() < 1e-2);
    }

    proptest! {
        #[test]
        fn prop_advance_is_resumable(seed in any::<u64>(), steps in 1usize..120) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let template = plan_spawn(DifficultyTier::Easy, &field(), &mut rng, 1);

            let mut stepped = template.clone();
            let dt = 1.0 / 60.0;
            for _ in 0..steps {
                advance(&mut stepped, dt);
            }

            let mut jumped = template.clone();
            advance(&mut jumped, dt * steps as f32);

            prop_assert!((stepped.traveled - jumped.traveled).abs() < 0.05);
            prop_assert!((stepped.pos - jumped.pos).length() < 0.05);
        }

        #[test]
        fn prop_zero_dt_does_not_move(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut enemy = plan_spawn(DifficultyTier::Hard, &field(), &mut rng, 1);
            advance(&mut enemy, 0.3);
            let before = enemy.pos;
            advance(&mut enemy, 0.0);
            prop_assert_eq!(before, enemy.pos);
        }
    }
}
