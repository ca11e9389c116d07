//! Ghost system - perception, patrol/chase movement, teleportation, kill.
//!
//! Runs first in the tick order; its detection output feeds the fear
//! system in the same frame. The kill decision uses the distance measured
//! at the top of the tick, before any movement or teleport, so a teleport
//! that lands near the player can only kill on a later frame.

use rand::Rng;

use crate::components::{GhostMode, GhostState, Vec3};
use crate::config::HouseConfig;

/// Aggression gained per second, in every mode.
const AGGRESSION_RATE: f32 = 0.01;

/// Teleport interval redraw band, shrunk by aggression down to the
/// configured floor.
const TELEPORT_INTERVAL_MIN: f32 = 5.0;
const TELEPORT_INTERVAL_MAX: f32 = 12.0;

/// Base probability that a teleport lands near the player rather than on
/// a patrol waypoint. Aggression adds `0.1` per point.
const NEAR_PLAYER_TELEPORT_CHANCE: f32 = 0.3;

/// Near-player teleports land this far away, at a random bearing.
const NEAR_TELEPORT_DIST_MIN: f32 = 8.0;
const NEAR_TELEPORT_DIST_MAX: f32 = 15.0;

/// Snapshot of one ghost tick, consumed by the fear and session systems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostTick {
    pub position: Vec3,
    pub is_chasing: bool,
    /// Distance to the player measured at the top of the tick.
    pub distance_to_player: f32,
    /// True when the player was inside kill range this tick.
    pub killed: bool,
    /// True when the teleport scheduler fired this tick.
    pub teleported: bool,
}

/// Advance the ghost by one tick.
pub fn ghost_system(
    ghost: &mut GhostState,
    config: &HouseConfig,
    dt: f32,
    player_pos: Vec3,
    rng: &mut impl Rng,
) -> GhostTick {
    let distance_to_player = ghost.position.distance(&player_pos);

    // Escalation never pauses, whatever the mode.
    ghost.aggression += AGGRESSION_RATE * dt;

    // Perception: plain distance check.
    if distance_to_player < config.detection_range {
        ghost.mode = GhostMode::Chase;
        ghost.last_seen_player_pos = Some(player_pos);
    } else {
        ghost.mode = GhostMode::Patrol;
    }

    // Movement, pinned to patrol height.
    match ghost.mode {
        GhostMode::Chase => {
            let direction = (player_pos - ghost.position).normalize();
            let speed = config.chase_speed + ghost.aggression;
            ghost.position =
                (ghost.position + direction * speed * dt).at_height(config.patrol_height);
        }
        GhostMode::Patrol => {
            if let Some(&target) = config.patrol_points.get(ghost.patrol_index) {
                let direction = (target - ghost.position).normalize();
                ghost.position = (ghost.position + direction * config.patrol_speed * dt)
                    .at_height(config.patrol_height);
                if ghost.position.distance(&target) < config.waypoint_radius {
                    ghost.patrol_index = (ghost.patrol_index + 1) % config.patrol_points.len();
                }
            }
        }
    }

    // Teleport scheduler: its own timer, independent of mode.
    let mut teleported = false;
    ghost.teleport_timer += dt;
    if ghost.teleport_timer > ghost.teleport_interval {
        ghost.teleport_timer = 0.0;
        ghost.teleport_interval = (rng.gen_range(TELEPORT_INTERVAL_MIN..TELEPORT_INTERVAL_MAX)
            - ghost.aggression)
            .max(config.min_teleport_interval);
        ghost.position = pick_teleport_target(ghost, config, player_pos, rng);
        teleported = true;
    }

    GhostTick {
        position: ghost.position,
        is_chasing: ghost.is_chasing(),
        distance_to_player,
        killed: distance_to_player < config.kill_range,
        teleported,
    }
}

fn pick_teleport_target(
    ghost: &GhostState,
    config: &HouseConfig,
    player_pos: Vec3,
    rng: &mut impl Rng,
) -> Vec3 {
    let near_player_chance = NEAR_PLAYER_TELEPORT_CHANCE + ghost.aggression * 0.1;
    if rng.gen::<f32>() < near_player_chance || config.patrol_points.is_empty() {
        // Appear at a random bearing just outside comfortable distance.
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let dist = rng.gen_range(NEAR_TELEPORT_DIST_MIN..NEAR_TELEPORT_DIST_MAX);
        Vec3::new(
            player_pos.x + angle.cos() * dist,
            config.patrol_height,
            player_pos.z + angle.sin() * dist,
        )
        .clamp_horizontal(config.ghost_bound)
        .at_height(config.patrol_height)
    } else {
        config.patrol_points[rng.gen_range(0..config.patrol_points.len())]
            .at_height(config.patrol_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (GhostState, HouseConfig, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let config = HouseConfig::default();
        let ghost = GhostState::spawn(config.ghost_spawn, &mut rng);
        (ghost, config, rng)
    }

    #[test]
    fn test_far_player_keeps_patrol() {
        let (mut ghost, config, mut rng) = setup();
        let player = Vec3::new(-25.0, 2.0, -25.0); // ~63 units away
        let tick = ghost_system(&mut ghost, &config, 0.016, player, &mut rng);
        assert_eq!(ghost.mode, GhostMode::Patrol);
        assert!(!tick.is_chasing);
        assert!(!tick.killed);
        assert!(tick.distance_to_player > config.detection_range);
        assert!(ghost.last_seen_player_pos.is_none());
    }

    #[test]
    fn test_near_player_triggers_chase() {
        let (mut ghost, config, mut rng) = setup();
        let player = Vec3::new(15.0, 2.0, 20.0); // 5 units away
        let before = ghost.position.distance(&player);
        let tick = ghost_system(&mut ghost, &config, 0.1, player, &mut rng);
        assert!(tick.is_chasing);
        assert_eq!(ghost.last_seen_player_pos, Some(player));
        // Chase movement closes the gap.
        assert!(ghost.position.distance(&player) < before);
    }

    #[test]
    fn test_kill_inside_kill_range() {
        let (mut ghost, config, mut rng) = setup();
        let player = Vec3::new(20.5, 2.0, 20.0); // 0.5 units away
        let tick = ghost_system(&mut ghost, &config, 0.016, player, &mut rng);
        assert!(tick.killed);
    }

    #[test]
    fn test_aggression_monotonic() {
        let (mut ghost, config, mut rng) = setup();
        let player = Vec3::new(-25.0, 2.0, -25.0);
        let mut last = ghost.aggression;
        for _ in 0..200 {
            ghost_system(&mut ghost, &config, 0.1, player, &mut rng);
            assert!(ghost.aggression >= last);
            last = ghost.aggression;
        }
        assert!((ghost.aggression - 0.2).abs() < 0.001); // 200 * 0.1s * 0.01
    }

    #[test]
    fn test_patrol_advances_through_waypoints() {
        let (mut ghost, config, mut rng) = setup();
        // Park the player far outside detection range of every waypoint
        // so the ghost stays on its route.
        let player = Vec3::new(100.0, 2.0, 100.0);
        // Ghost spawns on waypoint 2 (20, 2, 20) but walks toward index 0.
        let mut seen = vec![false; config.patrol_points.len()];
        for _ in 0..20_000 {
            let tick = ghost_system(&mut ghost, &config, 0.05, player, &mut rng);
            if tick.teleported {
                continue;
            }
            for (i, wp) in config.patrol_points.iter().enumerate() {
                if ghost.position.distance(wp) < config.waypoint_radius {
                    seen[i] = true;
                }
            }
        }
        assert!(
            seen.iter().filter(|s| **s).count() >= config.patrol_points.len() - 1,
            "patrol loop should cover the route, saw {seen:?}"
        );
    }

    #[test]
    fn test_teleport_interval_honors_floor() {
        let (mut ghost, config, mut rng) = setup();
        ghost.aggression = 50.0; // formula goes deeply negative without the clamp
        ghost.teleport_timer = ghost.teleport_interval + 1.0;
        let player = Vec3::new(-25.0, 2.0, -25.0);
        let tick = ghost_system(&mut ghost, &config, 0.016, player, &mut rng);
        assert!(tick.teleported);
        assert!(ghost.teleport_interval >= config.min_teleport_interval);
    }

    #[test]
    fn test_teleport_stays_in_bounds_at_height() {
        let (mut ghost, config, mut rng) = setup();
        let player = Vec3::new(27.0, 2.0, 27.0); // corner, so clamps engage
        for _ in 0..50 {
            ghost.teleport_timer = ghost.teleport_interval + 1.0;
            ghost_system(&mut ghost, &config, 0.016, player, &mut rng);
            assert!(ghost.position.x.abs() <= config.ghost_bound);
            assert!(ghost.position.z.abs() <= config.ghost_bound);
            assert_eq!(ghost.position.y, config.patrol_height);
        }
    }

    #[test]
    fn test_elevation_pinned_during_chase() {
        let (mut ghost, config, mut rng) = setup();
        let player = Vec3::new(18.0, 9.0, 20.0); // player above patrol height
        for _ in 0..100 {
            ghost_system(&mut ghost, &config, 0.05, player, &mut rng);
            assert_eq!(ghost.position.y, config.patrol_height);
        }
    }
}
