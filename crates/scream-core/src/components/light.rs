//! Per-fixture light state for the flicker model.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Probability per tick that a lit fixture malfunctions, before the
/// ambient-fear multiplier is applied.
pub const BASE_MALFUNCTION_CHANCE: f32 = 0.02;

/// Rendered intensity of a fixture that is currently dark. Dead bulbs
/// still glow faintly.
pub const DIM_INTENSITY: f32 = 0.08;

/// State of a single light fixture. Fixtures are independent of each
/// other except for the house-wide blackout beat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    pub is_on: bool,
    /// Seconds of darkness remaining while malfunctioning.
    pub off_duration: f32,
    /// Accumulated phase driving the sine flicker.
    pub flicker_phase: f32,
    pub base_intensity: f32,
    pub malfunction_chance: f32,
}

impl LightState {
    /// Spawn a lit fixture with a randomized flicker phase so fixtures
    /// don't pulse in lockstep.
    pub fn spawn(base_intensity: f32, rng: &mut impl Rng) -> Self {
        Self {
            is_on: true,
            off_duration: 0.0,
            flicker_phase: rng.gen::<f32>() * 10.0,
            base_intensity,
            malfunction_chance: BASE_MALFUNCTION_CHANCE,
        }
    }

    /// Force the fixture dark for `duration` seconds, regardless of its
    /// current state.
    pub fn force_off(&mut self, duration: f32) {
        self.is_on = false;
        self.off_duration = duration.max(0.0);
    }
}
