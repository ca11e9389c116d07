//! Ghost state - position, behavior mode, and escalation counters.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::Vec3;

/// Freshly spawned ghosts wait this long (uniform draw) before their
/// first teleport.
const INITIAL_TELEPORT_INTERVAL_MIN: f32 = 8.0;
const INITIAL_TELEPORT_INTERVAL_MAX: f32 = 15.0;

/// What the ghost is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostMode {
    /// Walking the fixed waypoint loop.
    Patrol,
    /// Closing on the player's current position.
    Chase,
}

/// Full ghost state. Owned by the engine and mutated exactly once per tick
/// by the ghost system; everything else reads snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostState {
    pub position: Vec3,
    pub mode: GhostMode,
    /// Index of the waypoint currently being walked toward.
    pub patrol_index: usize,
    /// Grows monotonically over a session; adds to chase speed and
    /// shortens teleport intervals. Reset only on restart.
    pub aggression: f32,
    /// Seconds accumulated toward the next teleport.
    pub teleport_timer: f32,
    /// Seconds between teleports. Always positive.
    pub teleport_interval: f32,
    /// Where the player was last detected, if ever.
    pub last_seen_player_pos: Option<Vec3>,
}

impl GhostState {
    /// Spawn a ghost at the given position with a fresh teleport schedule.
    pub fn spawn(position: Vec3, rng: &mut impl Rng) -> Self {
        Self {
            position,
            mode: GhostMode::Patrol,
            patrol_index: 0,
            aggression: 0.0,
            teleport_timer: 0.0,
            teleport_interval: rng
                .gen_range(INITIAL_TELEPORT_INTERVAL_MIN..INITIAL_TELEPORT_INTERVAL_MAX),
            last_seen_player_pos: None,
        }
    }

    pub fn is_chasing(&self) -> bool {
        self.mode == GhostMode::Chase
    }

    /// Billboard opacity pulse, a pure function of the global clock.
    /// Presentation only; never feeds back into gameplay.
    pub fn alpha(sim_time: f64) -> f32 {
        0.7 + (sim_time * 3.0).sin() as f32 * 0.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_defaults() {
        let mut rng = StdRng::seed_from_u64(7);
        let ghost = GhostState::spawn(Vec3::new(20.0, 2.0, 20.0), &mut rng);
        assert_eq!(ghost.mode, GhostMode::Patrol);
        assert_eq!(ghost.patrol_index, 0);
        assert_eq!(ghost.aggression, 0.0);
        assert!(ghost.teleport_interval >= INITIAL_TELEPORT_INTERVAL_MIN);
        assert!(ghost.teleport_interval < INITIAL_TELEPORT_INTERVAL_MAX);
        assert!(ghost.last_seen_player_pos.is_none());
    }

    #[test]
    fn test_alpha_pulses_within_band() {
        for i in 0..100 {
            let t = i as f64 * 0.137;
            let a = GhostState::alpha(t);
            assert!((0.5..=0.9).contains(&a), "alpha {a} out of band at t={t}");
        }
    }
}
