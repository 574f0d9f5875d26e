//! Debounced view over the hand controller.
//!
//! The host samples the raw device once per tick; [`ResponseInput::update`]
//! must run before any engine reads the snapshot for that tick.

use crate::config::{ANALOG_THRESHOLD, DEFAULT_STICK_NEUTRAL_DEADZONE};

/// One raw device sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawControls {
    pub stick_x: f32,
    pub stick_y: f32,
    pub trigger: f32,
    pub button_a: f32,
    pub button_b: f32,
}

/// Logical controls for one tick.
///
/// `confirm`, `increment` and `decrement` are edges: true on exactly one tick
/// per press. The `*_held` stick flags and the adjust buttons are levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub confirm: bool,
    pub increment: bool,
    pub decrement: bool,
    pub increment_held: bool,
    pub decrement_held: bool,
    pub adjust_plus: bool,
    pub adjust_minus: bool,
}

impl InputSnapshot {
    pub const IDLE: Self = Self {
        confirm: false,
        increment: false,
        decrement: false,
        increment_held: false,
        decrement_held: false,
        adjust_plus: false,
        adjust_minus: false,
    };
}

#[derive(Clone, Debug)]
pub struct ResponseInput {
    neutral_deadzone: f32,
    stick_armed: bool,
    trigger_latched: bool,
    snapshot: InputSnapshot,
}

impl Default for ResponseInput {
    fn default() -> Self {
        Self::new(DEFAULT_STICK_NEUTRAL_DEADZONE)
    }
}

impl ResponseInput {
    pub fn new(neutral_deadzone: f32) -> Self {
        Self {
            neutral_deadzone,
            // The stick must visit neutral once before its first edge.
            stick_armed: false,
            trigger_latched: false,
            snapshot: InputSnapshot::IDLE,
        }
    }

    pub fn update(&mut self, raw: RawControls) -> InputSnapshot {
        let was_up = self.snapshot.increment_held;
        let was_down = self.snapshot.decrement_held;
        self.update_stick(raw.stick_x, raw.stick_y);
        self.snapshot.increment = self.snapshot.increment_held && !was_up;
        self.snapshot.decrement = self.snapshot.decrement_held && !was_down;

        if self.trigger_latched {
            self.snapshot.confirm = false;
            if raw.trigger <= ANALOG_THRESHOLD {
                self.trigger_latched = false;
            }
        } else if raw.trigger > ANALOG_THRESHOLD {
            self.snapshot.confirm = true;
            self.trigger_latched = true;
        }

        self.snapshot.adjust_plus = raw.button_a > ANALOG_THRESHOLD;
        self.snapshot.adjust_minus = raw.button_b > ANALOG_THRESHOLD;
        self.snapshot
    }

    fn update_stick(&mut self, x: f32, y: f32) {
        let neutral = x.abs() <= self.neutral_deadzone && y.abs() <= self.neutral_deadzone;
        if neutral {
            self.stick_armed = true;
            self.snapshot.increment_held = false;
            self.snapshot.decrement_held = false;
            return;
        }

        if !self.stick_armed {
            return;
        }
        if x > ANALOG_THRESHOLD {
            self.snapshot.increment_held = true;
            self.stick_armed = false;
        }
        if x < -ANALOG_THRESHOLD {
            self.snapshot.decrement_held = true;
            self.stick_armed = false;
        }
    }

    /// Drops the stick state until it next returns to neutral.
    pub fn reset(&mut self) {
        self.snapshot.increment = false;
        self.snapshot.decrement = false;
        self.snapshot.increment_held = false;
        self.snapshot.decrement_held = false;
        self.stick_armed = false;
    }

    #[inline]
    pub fn snapshot(&self) -> InputSnapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests;
