//! Systems - logic that advances the component state each tick.
//!
//! Strict per-frame order: ghost -> fear -> flicker -> session ->
//! feedback. Later systems consume earlier systems' outputs from the
//! same tick.

mod fear;
mod feedback;
mod flicker;
mod ghost;
mod session;

pub use fear::*;
pub use feedback::*;
pub use flicker::*;
pub use ghost::*;
pub use session::*;
