//! On-screen joystick reduced to per-tick input
//!
//! Touch events are queued as they arrive and applied at the start of the
//! next tick, never in the middle of one.

use std::collections::VecDeque;

use glam::Vec2;

use crate::sim::TickInput;

/// Raw touch event in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    TouchBegan(Vec2),
    TouchMoved(Vec2),
    TouchEnded,
}

/// Virtual analog stick: a round base with a draggable knob
#[derive(Debug, Clone, PartialEq)]
pub struct Joystick {
    /// Center of the base
    pub base: Vec2,
    /// Maximum knob travel from the base center
    pub radius: f32,
    /// Half size of the knob's square grab area
    pub knob_half_size: f32,
    /// Current knob position
    pub knob: Vec2,
    active: bool,
    /// Drag offset from the base, in units of `radius` (length <= 1)
    deflection: Vec2,
}

impl Default for Joystick {
    fn default() -> Self {
        // 75-unit base with a 30-unit knob, bottom-left corner
        Self::new(Vec2::new(50.0, 50.0), 37.5, 15.0)
    }
}

impl Joystick {
    pub fn new(base: Vec2, radius: f32, knob_half_size: f32) -> Self {
        Self {
            base,
            radius,
            knob_half_size,
            knob: base,
            active: false,
            deflection: Vec2::ZERO,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn knob_contains(&self, point: Vec2) -> bool {
        let d = (point - self.knob).abs();
        d.x <= self.knob_half_size && d.y <= self.knob_half_size
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::TouchBegan(point) => {
                // Only a touch that lands on the knob grabs the stick
                if self.knob_contains(point) {
                    self.active = true;
                    self.deflection = Vec2::ZERO;
                }
            }
            InputEvent::TouchMoved(point) => {
                if !self.active {
                    return;
                }
                let offset = point - self.base;
                if !offset.is_finite() || self.radius <= 0.0 {
                    return;
                }
                self.knob = self.base + offset.clamp_length_max(self.radius);
                self.deflection = (offset / self.radius).clamp_length_max(1.0);
            }
            InputEvent::TouchEnded => {
                self.active = false;
                self.knob = self.base;
                self.deflection = Vec2::ZERO;
            }
        }
    }

    /// Current stick state as tick input; firing is held while engaged
    pub fn input(&self) -> TickInput {
        TickInput {
            direction: if self.active { self.deflection } else { Vec2::ZERO },
            fire: self.active,
        }
    }
}

/// FIFO of touch events feeding one joystick
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    joystick: Joystick,
}

impl InputQueue {
    pub fn new(joystick: Joystick) -> Self {
        Self {
            events: VecDeque::new(),
            joystick,
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop pending events and release the stick
    pub fn clear(&mut self) {
        self.events.clear();
        self.joystick.apply(InputEvent::TouchEnded);
    }

    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    /// Apply every pending event in arrival order and return the input for the next tick
    pub fn poll(&mut self) -> TickInput {
        while let Some(event) = self.events.pop_front() {
            self.joystick.apply(event);
        }
        self.joystick.input()
    }
}
