//! Haunt engine - the per-frame entry point for a session.
//!
//! The host frame loop feeds in player input and elapsed time; the engine
//! runs the systems in their fixed order and hands back everything the
//! presentation layer needs. The engine owns all mutable state and a
//! seeded RNG, so a session is reproducible from (config, seed, inputs).

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::{
    FearState, GhostState, LightState, SessionOutcome, Vec3, WALK_SPEED,
};
use crate::config::HouseConfig;
use crate::persistence::{read_save, write_save, SaveData, SaveError, SAVE_VERSION};
use crate::systems::{
    blackout_system, fear_system, feedback_system, flicker_system, ghost_system, light_frames,
    trigger_death, trigger_win, try_restart, Cue, CueScheduler, FeedbackFrame, FeedbackState,
    GhostTick, LightFrame,
};

/// Host-side input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub player_position: Vec3,
    pub sprint_held: bool,
    pub restart_requested: bool,
    pub quit_requested: bool,
}

impl FrameInput {
    pub fn at(player_position: Vec3) -> Self {
        Self {
            player_position,
            ..Self::default()
        }
    }
}

/// Everything the host needs to render and mix one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub outcome: SessionOutcome,
    /// Authoritative player position: the input clamped into bounds, or
    /// the spawn point on the frame a restart happened.
    pub player_position: Vec3,
    /// Movement speed the host controller should apply next frame.
    pub player_speed: f32,
    pub control_enabled: bool,
    pub ghost_position: Vec3,
    /// Billboard opacity for the ghost sprite.
    pub ghost_alpha: f32,
    /// Ghost-to-player distance after this tick's movement.
    pub ghost_distance: f32,
    pub lights: Vec<LightFrame>,
    pub feedback: FeedbackFrame,
    /// One-shot cues that fired this frame, in order.
    pub cues: Vec<Cue>,
    /// Echo of the host's quit flag; shutdown is the host's call.
    pub quit: bool,
}

/// A complete haunt session.
pub struct HauntEngine {
    config: HouseConfig,
    sim_time: f64,
    seed: u64,
    rng: StdRng,
    ghost: GhostState,
    fear: FearState,
    lights: Vec<LightState>,
    session: crate::systems::SessionState,
    cues: CueScheduler,
    feedback: FeedbackState,
    last_feedback: FeedbackFrame,
    player_position: Vec3,
}

impl HauntEngine {
    /// Start a session. The seed fixes every random draw, so identical
    /// (config, seed, input) triples produce identical sessions.
    pub fn new(config: HouseConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let ghost = GhostState::spawn(config.ghost_spawn, &mut rng);
        let lights = config
            .lights
            .iter()
            .map(|fixture| LightState::spawn(fixture.base_intensity, &mut rng))
            .collect();
        let player_position = config.player_spawn;
        Self {
            config,
            sim_time: 0.0,
            seed,
            rng,
            ghost,
            fear: FearState::new(),
            lights,
            session: crate::systems::SessionState::new(),
            cues: CueScheduler::new(),
            feedback: FeedbackState::default(),
            last_feedback: FeedbackFrame::default(),
            player_position,
        }
    }

    /// Advance the session by one frame.
    pub fn update(&mut self, dt: f32, input: &FrameInput) -> FrameOutput {
        let dt = dt.max(0.0);
        self.sim_time += dt as f64;

        let restarted = input.restart_requested && self.restart();

        let player = if restarted {
            self.config.player_spawn
        } else {
            input
                .player_position
                .clamp_horizontal(self.config.player_bound)
        };
        self.player_position = player;

        let mut player_speed = WALK_SPEED;
        if self.session.outcome == SessionOutcome::Playing {
            let ghost_tick = ghost_system(
                &mut self.ghost,
                &self.config,
                dt,
                player,
                &mut self.rng,
            );
            let depleted = fear_system(
                &mut self.fear,
                dt,
                ghost_tick.distance_to_player,
                ghost_tick.is_chasing,
                self.config.detection_range,
            );
            blackout_system(&mut self.lights, &mut self.rng);

            player_speed = self.session.stamina.tick(dt, input.sprint_held);

            self.resolve_outcome(&ghost_tick, depleted, player);

            if self.session.outcome == SessionOutcome::Playing {
                self.last_feedback = feedback_system(
                    &mut self.feedback,
                    dt,
                    self.sim_time,
                    &self.fear,
                    &self.session.stamina,
                    ghost_tick.distance_to_player,
                    &mut self.rng,
                );
            }
        }

        // Fixtures keep flickering even on the death and victory screens.
        flicker_system(&mut self.lights, dt, self.fear.ambient_fear, &mut self.rng);

        FrameOutput {
            outcome: self.session.outcome,
            player_position: player,
            player_speed,
            control_enabled: self.session.control_enabled,
            ghost_position: self.ghost.position,
            ghost_alpha: GhostState::alpha(self.sim_time),
            ghost_distance: self.ghost.position.distance(&player),
            lights: light_frames(&self.lights, &mut self.rng),
            feedback: self.last_feedback,
            cues: self.cues.collect_due(self.sim_time),
            quit: input.quit_requested,
        }
    }

    /// Apply at most one terminal transition per tick. Death takes
    /// priority when a kill and the exit coincide in the same frame.
    fn resolve_outcome(&mut self, ghost_tick: &GhostTick, sanity_depleted: bool, player: Vec3) {
        if ghost_tick.killed || sanity_depleted {
            trigger_death(&mut self.session, &mut self.cues, self.sim_time);
        } else if player.distance(&self.config.exit_position) < self.config.exit_radius {
            trigger_win(&mut self.session, &mut self.cues, self.sim_time, self.fear.sanity);
        }
    }

    /// Reset the session to its initial gameplay state. Returns false
    /// while still playing; restart is only valid from a terminal state.
    fn restart(&mut self) -> bool {
        if !try_restart(&mut self.session, &mut self.cues, self.sim_time) {
            return false;
        }
        self.ghost = GhostState::spawn(self.config.ghost_spawn, &mut self.rng);
        self.fear = FearState::new();
        self.feedback = FeedbackState::default();
        self.last_feedback = FeedbackFrame::default();
        self.player_position = self.config.player_spawn;
        true
    }

    // --- accessors -------------------------------------------------------

    pub fn config(&self) -> &HouseConfig {
        &self.config
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.session.outcome
    }

    pub fn fear(&self) -> &FearState {
        &self.fear
    }

    pub fn ghost(&self) -> &GhostState {
        &self.ghost
    }

    pub fn lights(&self) -> &[LightState] {
        &self.lights
    }

    pub fn player_position(&self) -> Vec3 {
        self.player_position
    }

    // --- persistence -----------------------------------------------------

    /// Save the session to a writer. The RNG stream itself is not
    /// serialized; the save carries the session seed and a restored
    /// session reseeds from it.
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        let data = SaveData {
            version: SAVE_VERSION,
            seed: self.seed,
            sim_time: self.sim_time,
            config: self.config.clone(),
            ghost: self.ghost.clone(),
            fear: self.fear,
            lights: self.lights.clone(),
            session: self.session.clone(),
            cues: self.cues.clone(),
            feedback: self.feedback,
            player_position: self.player_position,
        };
        write_save(writer, &data)
    }

    /// Restore a session from a reader.
    pub fn load<R: std::io::Read>(reader: R) -> Result<Self, SaveError> {
        let data = read_save(reader)?;
        Ok(Self {
            rng: StdRng::seed_from_u64(data.seed),
            config: data.config,
            sim_time: data.sim_time,
            seed: data.seed,
            ghost: data.ghost,
            fear: data.fear,
            lights: data.lights,
            session: data.session,
            cues: data.cues,
            feedback: data.feedback,
            last_feedback: FeedbackFrame::default(),
            player_position: data.player_position,
        })
    }
}
