//! Fear system - sanity drain, ambient dread, heartbeat.
//!
//! Consumes the ghost system's detection output from the same tick.
//! Returns whether sanity bottomed out, which is a death trigger.

use crate::components::FearState;

/// Sanity lost per second per unit of ghost closeness while chased.
const CHASE_DRAIN_FACTOR: f32 = 0.5;
/// Ambient fear gained per second while chased.
const AMBIENT_RISE_RATE: f32 = 0.1;
/// Ambient fear lost per second while calm.
const AMBIENT_DECAY_RATE: f32 = 0.05;
/// Heartbeat intensity lost per second while calm.
const HEARTBEAT_DECAY_RATE: f32 = 0.3;
/// Ghost-seen timer decay per second while calm.
const SEEN_TIMER_DECAY_RATE: f32 = 0.5;
/// Baseline sanity drain per second, scaled up by ambient fear. Sessions
/// cannot be stalled indefinitely.
const PASSIVE_DRAIN_RATE: f32 = 0.1;

/// Advance the fear state by one tick. Returns true when sanity reached
/// zero, which the session treats as a kill.
pub fn fear_system(
    fear: &mut FearState,
    dt: f32,
    distance_to_ghost: f32,
    is_chasing: bool,
    detection_range: f32,
) -> bool {
    if is_chasing && distance_to_ghost < detection_range {
        let closeness = detection_range - distance_to_ghost;
        fear.sanity = (fear.sanity - closeness * CHASE_DRAIN_FACTOR * dt).max(0.0);
        fear.ambient_fear = (fear.ambient_fear + AMBIENT_RISE_RATE * dt).min(1.0);
        fear.heartbeat_intensity = (closeness / detection_range).clamp(0.0, 1.0);
        fear.ghost_seen_timer += dt;
    } else {
        fear.ambient_fear = (fear.ambient_fear - AMBIENT_DECAY_RATE * dt).max(0.0);
        fear.heartbeat_intensity = (fear.heartbeat_intensity - HEARTBEAT_DECAY_RATE * dt).max(0.0);
        fear.ghost_seen_timer = (fear.ghost_seen_timer - SEEN_TIMER_DECAY_RATE * dt).max(0.0);
    }

    // Passive psychological pressure, chase or no chase.
    fear.sanity = (fear.sanity - PASSIVE_DRAIN_RATE * (1.0 + fear.ambient_fear) * dt).max(0.0);

    fear.is_depleted()
}
