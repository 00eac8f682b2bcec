//! Session lifecycle: new game, pause/resume, end of game
//!
//! The session owns the single `GameState`. Difficulty and ship color are
//! read from `Settings` when a game starts and never change mid-game.

use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyTier;
use super::state::{GameEvent, GamePhase, GameState};
use super::tick::{TickInput, tick};
use crate::Playfield;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::ScoreSubmission;
use crate::input::InputQueue;
use crate::settings::Settings;

/// Final result of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub score: u64,
    pub tier: DifficultyTier,
}

pub struct Session {
    state: GameState,
    /// Base seed; each new game derives its own from it
    seed: u64,
    games_started: u64,
    /// Unsimulated frame time carried between `update` calls
    accumulator: f32,
}

impl Session {
    pub fn new(settings: &Settings, playfield: Playfield, seed: u64) -> Self {
        Self {
            state: GameState::new(settings.difficulty, settings.player_color, playfield, seed),
            seed,
            games_started: 1,
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.scores.score()
    }

    pub fn lives(&self) -> u8 {
        self.state.scores.lives()
    }

    /// Start over: clears entities, resets score and lives, re-reads the tier
    /// and color, restarts timers. Runs again on the next tick.
    pub fn new_game(&mut self, settings: &Settings) {
        let seed = self
            .seed
            .wrapping_add(self.games_started.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.games_started += 1;
        self.accumulator = 0.0;
        self.state = GameState::new(
            settings.difficulty,
            settings.player_color,
            self.state.playfield,
            seed,
        );
        log::info!(
            "New game: tier={}, color={}",
            settings.difficulty.as_str(),
            settings.player_color.as_str()
        );
    }

    /// Freeze the session as terminal, keeping the final score
    pub fn end_game(&mut self) -> GameOverReport {
        if let Some(event) = self.state.enter_game_over() {
            self.state.events.push(event);
            log::info!("Game ended with score {}", self.score());
        }
        self.report()
    }

    pub fn report(&self) -> GameOverReport {
        GameOverReport {
            score: self.score(),
            tier: self.state.tier,
        }
    }

    /// Returns true if the session was paused by this call
    pub fn pause(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Initializing | GamePhase::Running => {
                self.state.phase = GamePhase::Paused;
                log::info!("Paused");
                true
            }
            GamePhase::Paused | GamePhase::GameOver => false,
        }
    }

    /// Returns true if the session was resumed by this call
    pub fn resume(&mut self) -> bool {
        if self.state.phase != GamePhase::Paused {
            return false;
        }
        self.state.phase = GamePhase::Running;
        log::info!("Resumed");
        true
    }

    pub fn is_paused(&self) -> bool {
        self.state.phase == GamePhase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Advance one tick with explicit input
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(&mut self.state, input, dt);
    }

    /// Apply queued input events, then advance one tick
    pub fn tick_queued(&mut self, queue: &mut InputQueue, dt: f32) {
        if self.is_over() {
            queue.clear();
        }
        let input = queue.poll();
        self.tick(&input, dt);
    }

    /// Fixed-step update for a frame of `frame_dt` seconds.
    /// Returns the number of ticks run.
    pub fn update(&mut self, queue: &mut InputQueue, frame_dt: f32) -> u32 {
        if self.is_paused() {
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick_queued(queue, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// The (name, score, date) tuple for the leaderboard, once the game is over
    pub fn submission(&self, name: &str, date: &str) -> Option<ScoreSubmission> {
        if !self.is_over() {
            return None;
        }
        Some(ScoreSubmission {
            name: name.to_string(),
            score: self.score(),
            date: date.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STARTING_LIVES;
    use crate::sim::difficulty::EnemyType;
    use crate::sim::path::{PathShape, Trajectory};
    use crate::sim::state::{Bullet, Enemy, PlayerColor};
    use glam::Vec2;

    fn settings(tier: DifficultyTier) -> Settings {
        Settings {
            difficulty: tier,
            player_color: PlayerColor::Blue,
            muted: false,
        }
    }

    fn session(tier: DifficultyTier) -> Session {
        Session::new(&settings(tier), Playfield::new(400.0, 400.0), 77)
    }

    fn place_enemy(session: &mut Session, kind: EnemyType, pos: Vec2) -> u32 {
        let state = session.state_mut();
        let id = state.next_entity_id();
        let stats = state.tier.stats_for(kind);
        // Stationary: zero speed keeps it parked for the test
        let path = Trajectory::new(PathShape::Straight {
            start: pos,
            end: pos + Vec2::new(1000.0, 0.0),
        });
        state.enemies.push(Enemy::new(id, kind, stats.health, 0.0, path));
        id
    }

    #[test]
    fn test_new_game_after_game_over_resets() {
        let mut s = session(DifficultyTier::Easy);
        s.tick(&TickInput::default(), SIM_DT);
        s.state_mut().scores.credit(EnemyType::Strong);
        s.end_game();
        assert!(s.is_over());

        s.new_game(&settings(DifficultyTier::Hard));
        assert_eq!(s.score(), 0);
        assert_eq!(s.lives(), STARTING_LIVES);
        assert!(s.state().enemies.is_empty() && s.state().bullets.is_empty());
        assert_eq!(s.state().tier, DifficultyTier::Hard);
        assert_eq!(s.phase(), GamePhase::Initializing);

        s.tick(&TickInput::default(), SIM_DT);
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let mut s = session(DifficultyTier::Medium);
        let input = TickInput {
            direction: Vec2::new(0.3, 0.1),
            fire: true,
        };
        for _ in 0..200 {
            s.tick(&input, SIM_DT);
        }
        let before = s.state().clone();

        assert!(s.pause());
        assert!(!s.pause());
        assert!(s.resume());

        let after = s.state();
        assert_eq!(after.phase, GamePhase::Running);
        assert_eq!(after.scores, before.scores);
        assert_eq!(after.spawn_clock, before.spawn_clock);
        assert_eq!(after.fire_clock, before.fire_clock);
        assert_eq!(after.player.pos, before.player.pos);
        let pos = |st: &GameState| st.enemies.iter().map(|e| e.pos).collect::<Vec<_>>();
        assert_eq!(pos(after), pos(&before));
    }

    #[test]
    fn test_paused_session_ignores_updates() {
        let mut s = session(DifficultyTier::Easy);
        let mut queue = InputQueue::default();
        assert_eq!(s.update(&mut queue, 0.06), 3);
        let ticks = s.state().time_ticks;
        s.pause();
        assert_eq!(s.update(&mut queue, 0.06), 0);
        assert_eq!(s.state().time_ticks, ticks);
        assert!(s.resume());
        assert!(s.update(&mut queue, 0.06) > 0);
    }

    #[test]
    fn test_hard_strong_enemy_scenario() {
        let mut s = session(DifficultyTier::Hard);
        s.tick(&TickInput::default(), SIM_DT);
        let target = s.state().player.pos + Vec2::new(150.0, 0.0);
        let enemy = place_enemy(&mut s, EnemyType::Strong, target);
        assert_eq!(s.state().enemy(enemy).map(|e| e.health), Some(4));

        // Aim right and fire until the first bolt connects
        let input = TickInput {
            direction: Vec2::new(1e-4, 0.0),
            fire: true,
        };
        let mut hits = 0;
        for _ in 0..600 {
            s.tick(&input, SIM_DT);
            let events = s.drain_events();
            for event in &events {
                if let GameEvent::EnemyHit { id, remaining_health, .. } = event {
                    assert_eq!(*id, enemy);
                    hits += 1;
                    if hits == 1 {
                        assert_eq!(*remaining_health, 3);
                        assert_eq!(s.score(), 0);
                        assert!(s.state().enemy(enemy).is_some());
                    }
                }
            }
            if hits == 4 {
                break;
            }
        }
        assert_eq!(hits, 4);
        assert!(s.state().enemy(enemy).is_none());
        assert_eq!(s.score(), 100);
    }

    #[test]
    fn test_last_life_collision_reports_score() {
        let mut s = session(DifficultyTier::Easy);
        s.tick(&TickInput::default(), SIM_DT);
        {
            let state = s.state_mut();
            state.scores.credit(EnemyType::Medium);
            state.scores.credit(EnemyType::Weak);
            while state.scores.lives() > 1 {
                state.scores.lose_life();
            }
        }
        let pos = s.state().player.pos;
        place_enemy(&mut s, EnemyType::Weak, pos);

        s.tick(&TickInput::default(), SIM_DT);
        assert_eq!(s.lives(), 0);
        assert!(s.is_over());
        let events = s.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 55 }));

        let submission = s.submission("ace", "2024-01-01 10:00:00").expect("game over");
        assert_eq!(submission.score, 55);
        assert_eq!(submission.name, "ace");

        // Nothing moves after game over
        place_enemy(&mut s, EnemyType::Weak, pos);
        s.tick(&TickInput::default(), SIM_DT);
        assert_eq!(s.lives(), 0);
        assert_eq!(s.score(), 55);
    }

    #[test]
    fn test_submission_requires_game_over() {
        let s = session(DifficultyTier::Easy);
        assert!(s.submission("me", "2024-01-01 00:00:00").is_none());
    }

    #[test]
    fn test_end_game_preserves_score_and_freezes() {
        let mut s = session(DifficultyTier::Easy);
        s.tick(&TickInput::default(), SIM_DT);
        s.state_mut().scores.credit(EnemyType::Strong);
        let id = s.state_mut().next_entity_id();
        s.state_mut()
            .bullets
            .push(Bullet::new(id, PlayerColor::Blue, Vec2::ZERO, 0.0, 800.0));

        let report = s.end_game();
        assert_eq!(report.score, 100);
        assert!(s.state().bullets.is_empty());
        assert!(!s.pause());

        let ticks = s.state().time_ticks;
        let input = TickInput {
            direction: Vec2::X,
            fire: true,
        };
        s.tick(&input, SIM_DT);
        assert_eq!(s.state().time_ticks, ticks);

        // Ending twice emits one game-over event
        s.end_game();
        let overs = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }
}
