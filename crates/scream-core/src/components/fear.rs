//! Fear and sanity state - the psychological pressure meter.
//!
//! Sanity only moves down during play; ambient fear and heartbeat intensity
//! rise while the ghost has the player in sight and decay back toward zero
//! otherwise. All fields are clamped to their declared ranges every tick.

use serde::{Deserialize, Serialize};

/// Sanity starts here and is clamped to `[0, MAX_SANITY]`.
pub const MAX_SANITY: f32 = 100.0;

/// Per-player fear state. Owned by the session; updated once per tick
/// from the ghost's detection output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FearState {
    /// Remaining sanity in `[0, 100]`. Zero is a death trigger.
    pub sanity: f32,
    /// House-wide dread level in `[0, 1]`. Feeds light malfunction odds.
    pub ambient_fear: f32,
    /// Heartbeat strength in `[0, 1]`. Drives the vignette pulse.
    pub heartbeat_intensity: f32,
    /// Seconds of accumulated ghost sightings, decaying while calm.
    pub ghost_seen_timer: f32,
}

impl FearState {
    pub fn new() -> Self {
        Self {
            sanity: MAX_SANITY,
            ambient_fear: 0.0,
            heartbeat_intensity: 0.0,
            ghost_seen_timer: 0.0,
        }
    }

    /// Sanity as a `[0, 1]` bar-fill fraction.
    pub fn sanity_fraction(&self) -> f32 {
        self.sanity / MAX_SANITY
    }

    /// True once sanity has bottomed out. Equivalent to a kill event.
    pub fn is_depleted(&self) -> bool {
        self.sanity <= 0.0
    }
}

impl Default for FearState {
    fn default() -> Self {
        Self::new()
    }
}
