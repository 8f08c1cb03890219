//! In-memory backings for the session and cooldown traits.

pub mod cooldown;
pub mod session;

pub use cooldown::*;
pub use session::*;
