//! Session system - death/win transitions, restart, and timed cues.
//!
//! Transitions are idempotent: once a session is terminal, repeated
//! triggers are no-ops. Presentation side effects are emitted as `Cue`
//! values on a scheduler keyed to the simulation clock, so a restart can
//! cancel anything still pending before it mutates a fresh session.

use serde::{Deserialize, Serialize};

use crate::components::{SessionOutcome, Stamina};

/// Jumpscare choreography: five red/white flash pairs, 0.1 s apart, with
/// the white frame 0.05 s after each red.
const FLASH_PAIRS: u32 = 5;
const FLASH_PAIR_SPACING: f64 = 0.1;
const FLASH_WHITE_DELAY: f64 = 0.05;
/// The defeat screen replaces the jumpscare after this long.
const DEFEAT_SCREEN_DELAY: f64 = 1.5;

/// One-shot presentation commands for the host layer. The core never
/// touches audio or UI itself; it only tells the host what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    DisablePlayerControl,
    EnablePlayerControl,
    StopAmbientAudio,
    ResumeAmbientAudio,
    PlayScareAudio,
    StopScareAudio,
    /// One frame of the jumpscare flash; alternates red and white.
    JumpscareFlash { red: bool },
    ClearJumpscare,
    ShowDefeatScreen,
    ShowVictoryScreen { sanity_percent: u32 },
    ClearScreens,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScheduledCue {
    fire_at: f64,
    cue: Cue,
}

/// Deferred cue queue. Cues fire when the simulation clock passes their
/// timestamp; a restart cancels everything still pending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CueScheduler {
    pending: Vec<ScheduledCue>,
}

impl CueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at: f64, cue: Cue) {
        self.pending.push(ScheduledCue { fire_at, cue });
    }

    /// Drop every pending cue. Stale cues must never mutate a fresh
    /// session after a restart.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return every cue due at or before `now`, in firing
    /// order. Cues sharing a timestamp keep their scheduling order.
    pub fn collect_due(&mut self, now: f64) -> Vec<Cue> {
        let mut due = Vec::new();
        let mut remaining = Vec::with_capacity(self.pending.len());
        for scheduled in self.pending.drain(..) {
            if scheduled.fire_at <= now {
                due.push(scheduled);
            } else {
                remaining.push(scheduled);
            }
        }
        self.pending = remaining;
        // Stable sort, so ties stay in insertion order.
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at));
        due.into_iter().map(|s| s.cue).collect()
    }
}

/// Session-owned state advanced by the transition functions below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub outcome: SessionOutcome,
    pub stamina: Stamina,
    pub control_enabled: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            outcome: SessionOutcome::Playing,
            stamina: Stamina::new(),
            control_enabled: true,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Playing -> Dead. Returns false (and does nothing) if the session is
/// already terminal. Ghost-proximity kills and sanity-zero kills share
/// this one path.
pub fn trigger_death(session: &mut SessionState, cues: &mut CueScheduler, now: f64) -> bool {
    if session.outcome != SessionOutcome::Playing {
        return false;
    }
    session.outcome = SessionOutcome::Dead;
    session.control_enabled = false;

    cues.schedule(now, Cue::DisablePlayerControl);
    cues.schedule(now, Cue::StopAmbientAudio);
    cues.schedule(now, Cue::PlayScareAudio);
    for i in 0..FLASH_PAIRS {
        let at = now + i as f64 * FLASH_PAIR_SPACING;
        cues.schedule(at, Cue::JumpscareFlash { red: true });
        cues.schedule(at + FLASH_WHITE_DELAY, Cue::JumpscareFlash { red: false });
    }
    cues.schedule(now + DEFEAT_SCREEN_DELAY, Cue::ClearJumpscare);
    cues.schedule(now + DEFEAT_SCREEN_DELAY, Cue::ShowDefeatScreen);
    true
}

/// Playing -> Won. The victory display carries the floored sanity
/// percentage. Returns false if the session is already terminal.
pub fn trigger_win(
    session: &mut SessionState,
    cues: &mut CueScheduler,
    now: f64,
    sanity: f32,
) -> bool {
    if session.outcome != SessionOutcome::Playing {
        return false;
    }
    let sanity_percent = sanity.max(0.0).floor() as u32;
    session.outcome = SessionOutcome::Won { sanity_percent };
    session.control_enabled = false;

    cues.schedule(now, Cue::DisablePlayerControl);
    cues.schedule(now, Cue::ShowVictoryScreen { sanity_percent });
    true
}

/// Terminal -> Playing. A restart request outside a terminal state is a
/// no-op, not an error.
pub fn try_restart(session: &mut SessionState, cues: &mut CueScheduler, now: f64) -> bool {
    if !session.outcome.is_terminal() {
        return false;
    }
    cues.cancel_all();
    session.outcome = SessionOutcome::Playing;
    session.stamina = Stamina::new();
    session.control_enabled = true;

    cues.schedule(now, Cue::StopScareAudio);
    cues.schedule(now, Cue::ResumeAmbientAudio);
    cues.schedule(now, Cue::ClearScreens);
    cues.schedule(now, Cue::EnablePlayerControl);
    true
}
