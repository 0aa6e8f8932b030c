//! The game itself: rules, the per-session state machine, and the worker
//! that drives it between two connected players.
mod game;
mod phase;
mod round;
mod rules;
mod session;

pub use game::*;
pub use phase::*;
pub use round::*;
pub use rules::*;
pub use session::*;
