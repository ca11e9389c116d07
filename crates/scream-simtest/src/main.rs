//! Scream Headless Simulation Harness
//!
//! Validates the haunt core logic and house data without a renderer.
//! Runs entirely in-process — no window, no audio, no assets.
//!
//! Usage:
//!   cargo run -p scream-simtest
//!   cargo run -p scream-simtest -- --verbose

use rand::rngs::StdRng;
use rand::SeedableRng;
use scream_core::components::{
    FearState, GhostMode, GhostState, SessionOutcome, Stamina, Vec3, MAX_SANITY, MAX_STAMINA,
};
use scream_core::config::HouseConfig;
use scream_core::engine::{FrameInput, HauntEngine};
use scream_core::systems::{fear_system, feedback_system, ghost_system, FeedbackState};

// ── House manifest (same JSON a host frontend would ship) ───────────────
const MANIFEST_JSON: &str = include_str!("../../../data/house_manifest.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Scream Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. House manifest validation
    results.extend(validate_house_manifest(verbose));

    // 2. Fear loop clamp sweep
    results.extend(validate_fear_loop(verbose));

    // 3. Ghost behavior sweep
    results.extend(validate_ghost_behavior(verbose));

    // 4. Session transition matrix
    results.extend(validate_session_transitions(verbose));

    // 5. Stamina loop
    results.extend(validate_stamina(verbose));

    // 6. Feedback scalar ranges
    results.extend(validate_feedback_ranges(verbose));

    // 7. Determinism and persistence
    results.extend(validate_determinism(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. House Manifest ───────────────────────────────────────────────────

fn validate_house_manifest(_verbose: bool) -> Vec<TestResult> {
    println!("--- House Manifest ---");
    let mut results = Vec::new();

    let config = match HouseConfig::from_manifest_json(MANIFEST_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(check(
                "manifest_parse",
                false,
                format!("manifest error: {}", e),
            ));
            return results;
        }
    };

    results.push(check(
        "manifest_parse",
        true,
        format!(
            "{} patrol points, {} fixtures",
            config.patrol_points.len(),
            config.lights.len()
        ),
    ));
    results.push(check(
        "manifest_patrol_route",
        config.patrol_points.len() == 7,
        format!("expected 7 waypoints, got {}", config.patrol_points.len()),
    ));
    results.push(check(
        "manifest_fixtures",
        config.lights.len() == 8,
        format!("expected 8 fixtures, got {}", config.lights.len()),
    ));
    results.push(check(
        "manifest_matches_defaults",
        config == HouseConfig::default(),
        "manifest mirrors HouseConfig::default()".into(),
    ));

    let spawn_inside = config.player_spawn.x.abs() <= config.player_bound
        && config.player_spawn.z.abs() <= config.player_bound;
    results.push(check(
        "manifest_spawn_in_bounds",
        spawn_inside,
        format!("player spawn {:?}", config.player_spawn),
    ));

    let exit_reachable =
        config.exit_position.x.abs() <= config.player_bound + config.exit_radius;
    results.push(check(
        "manifest_exit_reachable",
        exit_reachable,
        "exit lies within reach of the clamped player bound".into(),
    ));

    results
}

// ── 2. Fear Loop ────────────────────────────────────────────────────────

fn validate_fear_loop(_verbose: bool) -> Vec<TestResult> {
    println!("--- Fear Loop ---");
    let mut results = Vec::new();
    let range = 15.0;

    // Hammer the loop with adversarial tick sizes and distances.
    let mut fear = FearState::new();
    let mut in_range = true;
    for step in 0..5000 {
        let dt = match step % 4 {
            0 => 0.0,
            1 => 0.016,
            2 => 1.0,
            _ => 30.0,
        };
        let dist = (step % 23) as f32;
        let chasing = dist < range;
        fear_system(&mut fear, dt, dist, chasing, range);
        in_range &= (0.0..=MAX_SANITY).contains(&fear.sanity)
            && (0.0..=1.0).contains(&fear.ambient_fear)
            && (0.0..=1.0).contains(&fear.heartbeat_intensity)
            && fear.ghost_seen_timer >= 0.0;
    }
    results.push(check(
        "fear_clamps_hold",
        in_range,
        "sanity/fear/heartbeat stayed in declared ranges over 5000 ticks".into(),
    ));

    // Passive drain alone must eventually deplete sanity.
    let mut fear = FearState::new();
    let mut ticks = 0u32;
    while !fear.is_depleted() && ticks < 5000 {
        fear_system(&mut fear, 1.0, 100.0, false, range);
        ticks += 1;
    }
    results.push(check(
        "fear_passive_drain_depletes",
        fear.is_depleted() && ticks <= 1001,
        format!("depleted after {} s of passive drain", ticks),
    ));

    // Calm decay floors at zero, never below.
    let mut fear = FearState::new();
    fear.ambient_fear = 1.0;
    for _ in 0..100 {
        fear_system(&mut fear, 1.0, 100.0, false, range);
    }
    results.push(check(
        "fear_decay_floors",
        fear.ambient_fear == 0.0 && fear.heartbeat_intensity == 0.0,
        "ambient fear and heartbeat decayed to their floors".into(),
    ));

    results
}

// ── 3. Ghost Behavior ───────────────────────────────────────────────────

fn validate_ghost_behavior(_verbose: bool) -> Vec<TestResult> {
    println!("--- Ghost Behavior ---");
    let mut results = Vec::new();
    let config = HouseConfig::default();

    // Patrol when far, chase when close.
    let mut rng = StdRng::seed_from_u64(1);
    let mut ghost = GhostState::spawn(config.ghost_spawn, &mut rng);
    let far = Vec3::new(-25.0, 2.0, -25.0);
    ghost_system(&mut ghost, &config, 0.016, far, &mut rng);
    let patrols_when_far = ghost.mode == GhostMode::Patrol;

    let near = Vec3::new(15.0, 2.0, 20.0);
    ghost_system(&mut ghost, &config, 0.016, near, &mut rng);
    let chases_when_near = ghost.mode == GhostMode::Chase;
    results.push(check(
        "ghost_perception",
        patrols_when_far && chases_when_near,
        "patrol outside 15 units, chase inside".into(),
    ));

    // Teleport interval must respect the floor at absurd aggression.
    let mut rng = StdRng::seed_from_u64(2);
    let mut ghost = GhostState::spawn(config.ghost_spawn, &mut rng);
    ghost.aggression = 100.0;
    let mut min_interval = f32::MAX;
    for _ in 0..200 {
        ghost.teleport_timer = ghost.teleport_interval + 1.0;
        ghost_system(&mut ghost, &config, 0.016, far, &mut rng);
        min_interval = min_interval.min(ghost.teleport_interval);
    }
    results.push(check(
        "ghost_teleport_floor",
        min_interval >= config.min_teleport_interval,
        format!("smallest interval drawn: {:.3} s", min_interval),
    ));

    // Teleports stay inside the ghost bound and at patrol height.
    let mut rng = StdRng::seed_from_u64(3);
    let mut ghost = GhostState::spawn(config.ghost_spawn, &mut rng);
    let corner = Vec3::new(27.0, 2.0, -27.0);
    let mut in_bounds = true;
    for _ in 0..500 {
        ghost.teleport_timer = ghost.teleport_interval + 1.0;
        ghost_system(&mut ghost, &config, 0.016, corner, &mut rng);
        in_bounds &= ghost.position.x.abs() <= config.ghost_bound
            && ghost.position.z.abs() <= config.ghost_bound
            && ghost.position.y == config.patrol_height;
    }
    results.push(check(
        "ghost_teleport_bounds",
        in_bounds,
        "500 forced teleports stayed inside ±28 at height 2".into(),
    ));

    // A chasing ghost closes distance tick over tick.
    let mut rng = StdRng::seed_from_u64(4);
    let mut ghost = GhostState::spawn(config.ghost_spawn, &mut rng);
    let target = Vec3::new(12.0, 2.0, 20.0);
    let mut closed = true;
    let mut last = ghost.position.distance(&target);
    for _ in 0..20 {
        let tick = ghost_system(&mut ghost, &config, 0.05, target, &mut rng);
        if tick.teleported {
            last = ghost.position.distance(&target);
            continue;
        }
        let d = ghost.position.distance(&target);
        closed &= d <= last + 1e-4;
        last = d;
    }
    results.push(check(
        "ghost_chase_closes",
        closed,
        "chase movement monotonically closes on a stationary player".into(),
    ));

    results
}

// ── 4. Session Transitions ──────────────────────────────────────────────

fn validate_session_transitions(_verbose: bool) -> Vec<TestResult> {
    println!("--- Session Transitions ---");
    let mut results = Vec::new();
    let config = HouseConfig::default();

    // Proximity kill.
    let mut engine = HauntEngine::new(config.clone(), 10);
    let out = engine.update(0.016, &FrameInput::at(config.ghost_spawn));
    results.push(check(
        "session_proximity_kill",
        out.outcome == SessionOutcome::Dead,
        format!("outcome after contact tick: {:?}", out.outcome),
    ));

    // Win at the exit with floored sanity.
    let mut engine = HauntEngine::new(config.clone(), 11);
    let out = engine.update(0.016, &FrameInput::at(Vec3::new(-27.0, 2.0, 0.0)));
    let won_correctly = matches!(
        out.outcome,
        SessionOutcome::Won { sanity_percent } if sanity_percent == engine.fear().sanity.floor() as u32
    );
    results.push(check(
        "session_win_floored_sanity",
        won_correctly,
        format!("outcome at the exit: {:?}", out.outcome),
    ));

    // Restart round trip.
    let mut engine = HauntEngine::new(config.clone(), 12);
    engine.update(0.016, &FrameInput::at(config.ghost_spawn));
    let input = FrameInput {
        restart_requested: true,
        ..FrameInput::at(config.player_spawn)
    };
    let out = engine.update(0.016, &input);
    results.push(check(
        "session_restart",
        out.outcome == SessionOutcome::Playing
            && engine.fear().sanity > MAX_SANITY - 0.01
            && out.player_position == config.player_spawn,
        "dead -> restart -> playing with reset state".into(),
    ));

    // Restart outside terminal states must do nothing.
    let mut engine = HauntEngine::new(config.clone(), 13);
    let out = engine.update(0.016, &input);
    results.push(check(
        "session_restart_noop_while_playing",
        out.outcome == SessionOutcome::Playing && out.cues.is_empty(),
        "restart request ignored mid-session".into(),
    ));

    results
}

// ── 5. Stamina ──────────────────────────────────────────────────────────

fn validate_stamina(_verbose: bool) -> Vec<TestResult> {
    println!("--- Stamina ---");
    let mut results = Vec::new();

    let mut stamina = Stamina::new();
    // 100 / 25 per second: empty after 4 seconds of sprinting.
    let mut seconds = 0.0f32;
    while stamina.value > 0.0 && seconds < 10.0 {
        stamina.tick(0.1, true);
        seconds += 0.1;
    }
    results.push(check(
        "stamina_drains_in_4s",
        (seconds - 4.0).abs() < 0.2,
        format!("drained in {:.1} s", seconds),
    ));

    // Refills at 15/s; never overshoots.
    let mut seconds = 0.0f32;
    while stamina.value < MAX_STAMINA && seconds < 20.0 {
        stamina.tick(0.1, false);
        seconds += 0.1;
    }
    results.push(check(
        "stamina_refills",
        stamina.value == MAX_STAMINA && (seconds - 100.0 / 15.0).abs() < 0.2,
        format!("refilled in {:.1} s", seconds),
    ));

    results
}

// ── 6. Feedback Ranges ──────────────────────────────────────────────────

fn validate_feedback_ranges(_verbose: bool) -> Vec<TestResult> {
    println!("--- Feedback Ranges ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(20);
    let mut state = FeedbackState::default();
    let mut ok = true;
    for step in 0..2000 {
        let mut fear = FearState::new();
        fear.sanity = (step % 101) as f32;
        fear.heartbeat_intensity = ((step % 10) as f32) / 10.0;
        let distance = (step % 30) as f32;
        let frame = feedback_system(
            &mut state,
            0.016,
            step as f64 * 0.016,
            &fear,
            &Stamina::new(),
            distance,
            &mut rng,
        );
        ok &= (0.0..=1.0).contains(&frame.sanity_fraction)
            && (0.0..=1.0).contains(&frame.stamina_fraction)
            && (0.0..=1.0).contains(&frame.warning_intensity)
            && (0.4..=1.0).contains(&frame.breathing_volume)
            && (0.0..=1.0).contains(&frame.vignette_alpha)
            && (0.0..=1.0).contains(&frame.flash_alpha);
        if distance >= 10.0 {
            ok &= frame.warning_intensity == 0.0 && frame.breathing_volume == 0.4;
        }
    }
    results.push(check(
        "feedback_ranges",
        ok,
        "all presentation scalars stayed in range over 2000 frames".into(),
    ));

    results
}

// ── 7. Determinism & Persistence ────────────────────────────────────────

fn validate_determinism(_verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism & Persistence ---");
    let mut results = Vec::new();
    let config = HouseConfig::default();

    // Same seed, same inputs, same session.
    let mut a = HauntEngine::new(config.clone(), 1234);
    let mut b = HauntEngine::new(config.clone(), 1234);
    let spawn = config.player_spawn;
    let mut identical = true;
    for i in 0..1000 {
        let pos = Vec3::new(spawn.x + (i % 40) as f32 * 0.1, 2.0, spawn.z);
        let input = FrameInput {
            sprint_held: i % 7 == 0,
            ..FrameInput::at(pos)
        };
        let out_a = a.update(1.0 / 60.0, &input);
        let out_b = b.update(1.0 / 60.0, &input);
        identical &= out_a == out_b;
    }
    results.push(check(
        "determinism_seeded_twins",
        identical,
        "1000 frames of identical output from twin seeded engines".into(),
    ));

    // Save/load reproduces the snapshot exactly.
    let mut buffer = Vec::new();
    let snapshot_ok = match a.save(&mut buffer) {
        Ok(()) => match HauntEngine::load(&buffer[..]) {
            Ok(restored) => {
                restored.fear() == a.fear()
                    && restored.ghost() == a.ghost()
                    && restored.lights() == a.lights()
                    && restored.outcome() == a.outcome()
            }
            Err(e) => {
                results.push(check("persistence_load", false, format!("{}", e)));
                false
            }
        },
        Err(e) => {
            results.push(check("persistence_save", false, format!("{}", e)));
            false
        }
    };
    results.push(check(
        "persistence_roundtrip",
        snapshot_ok,
        format!("snapshot size: {} bytes", buffer.len()),
    ));

    // Two engines restored from the same snapshot must stay in lockstep
    // through further ticks.
    let restored_lockstep = match (HauntEngine::load(&buffer[..]), HauntEngine::load(&buffer[..])) {
        (Ok(mut ra), Ok(mut rb)) => {
            let mut identical = true;
            for i in 0..200 {
                let pos = Vec3::new(spawn.x + (i % 25) as f32 * 0.2, 2.0, spawn.z);
                let input = FrameInput {
                    sprint_held: i % 5 == 0,
                    ..FrameInput::at(pos)
                };
                identical &= ra.update(1.0 / 60.0, &input) == rb.update(1.0 / 60.0, &input);
            }
            identical
        }
        _ => false,
    };
    results.push(check(
        "persistence_restored_lockstep",
        restored_lockstep,
        "200 post-restore frames identical across restored twins".into(),
    ));

    results
}
