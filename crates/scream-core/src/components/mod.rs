//! Components - plain state structs advanced by the systems.

mod common;
mod fear;
mod ghost;
mod light;
mod session;

pub use common::*;
pub use fear::*;
pub use ghost::*;
pub use light::*;
pub use session::*;
