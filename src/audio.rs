//! Sound effects driven by simulation events
//!
//! Playback is fire-and-forget: the backend may fail, the game never notices.

use std::fmt;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired a bolt
    Laser,
    /// Bolt hit a balloon that survived
    Hitmarker,
    /// Balloon popped, or one reached the player
    Explosion,
}

impl SoundEffect {
    /// Effect triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BulletFired { .. } => Some(Self::Laser),
            GameEvent::EnemyHit { .. } => Some(Self::Hitmarker),
            GameEvent::EnemyDestroyed { .. } | GameEvent::PlayerHit { .. } => {
                Some(Self::Explosion)
            }
            GameEvent::EnemySpawned { .. } | GameEvent::GameOver { .. } => None,
        }
    }

    /// Asset name a backend would load
    pub fn asset_name(&self) -> &'static str {
        match self {
            Self::Laser => "laser",
            Self::Hitmarker => "hitmarker",
            Self::Explosion => "explosion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No output device or context
    Unavailable(String),
    /// The effect could not be played
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "audio unavailable: {reason}"),
            Self::Playback(reason) => write!(f, "playback failed: {reason}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can make noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Silent backend for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::trace!("sfx {} at {:.2}", effect.asset_name(), volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Set once a game-over event is seen; cleared by `reset`
    suppressed: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            suppressed: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Re-enable effects for a new game
    pub fn reset(&mut self) {
        self.suppressed = false;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted || self.suppressed {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.backend.play(effect, vol) {
            log::warn!("Failed to play {}: {}", effect.asset_name(), e);
        }
    }

    /// Play the effects for a batch of drained events, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::GameOver { .. } = event {
                self.suppressed = true;
                continue;
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
        }
    }
}
