//! Session outcome and the sprint stamina resource.

use serde::{Deserialize, Serialize};

pub const MAX_STAMINA: f32 = 100.0;

/// Stamina burned per second while sprinting.
const STAMINA_DRAIN_RATE: f32 = 25.0;
/// Stamina recovered per second while not sprinting.
const STAMINA_REGEN_RATE: f32 = 15.0;

/// Player movement speed while sprinting with stamina left.
pub const SPRINT_SPEED: f32 = 8.0;
/// Player movement speed otherwise. Exhaustion has no failure state;
/// it just forces this speed.
pub const WALK_SPEED: f32 = 5.0;

/// Where the session stands. Transitions are one-way per session
/// instance; only an explicit restart returns to `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Playing,
    /// Caught by the ghost or sanity hit zero.
    Dead,
    /// Reached the exit. Carries the floored sanity percentage for the
    /// victory display.
    Won { sanity_percent: u32 },
}

impl SessionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionOutcome::Playing)
    }
}

/// Sprint stamina, clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stamina {
    pub value: f32,
}

impl Stamina {
    pub fn new() -> Self {
        Self { value: MAX_STAMINA }
    }

    /// Advance the stamina loop one tick and return the player movement
    /// speed for this frame.
    pub fn tick(&mut self, dt: f32, sprint_held: bool) -> f32 {
        if sprint_held && self.value > 0.0 {
            self.value = (self.value - STAMINA_DRAIN_RATE * dt).max(0.0);
            SPRINT_SPEED
        } else {
            self.value = (self.value + STAMINA_REGEN_RATE * dt).min(MAX_STAMINA);
            WALK_SPEED
        }
    }

    /// Stamina as a `[0, 1]` bar-fill fraction.
    pub fn fraction(&self) -> f32 {
        self.value / MAX_STAMINA
    }
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new()
    }
}
