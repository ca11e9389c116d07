//! Scream Core - Haunt Simulation Engine
//!
//! A first-person horror behavior model with no engine dependencies: a
//! ghost patrols, detects, chases, teleports, and kills; a sanity and
//! ambient-fear loop escalates the pressure; flickering lights and
//! presentation scalars are computed for whatever renderer hosts it.
//! The host frame loop calls `HauntEngine::update` once per frame and
//! draws/mixes from the returned `FrameOutput`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`components`] | Plain state structs: `Vec3`, `FearState`, `GhostState`, `LightState`, stamina and outcome |
//! | [`systems`] | Per-tick logic: ghost AI, fear loop, flicker model, session transitions, feedback scalars |
//! | [`config`] | `HouseConfig` tunables, defaults, and JSON manifest loading |
//! | [`engine`] | `HauntEngine` orchestrator: strict tick order, seeded RNG, restart handling |
//! | [`persistence`] | bincode save/load of a full session snapshot |
//!
//! # Example
//!
//! ```rust,no_run
//! use scream_core::prelude::*;
//!
//! let mut engine = HauntEngine::new(HouseConfig::default(), 0xC0FFEE);
//!
//! loop {
//!     let input = FrameInput::at(engine.player_position());
//!     let frame = engine.update(1.0 / 60.0, &input);
//!     if frame.quit {
//!         break;
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::HouseConfig;
    pub use crate::engine::{FrameInput, FrameOutput, HauntEngine};
    pub use crate::systems::Cue;
}
