//! Matchmaking: a single queue where admitted players wait to be paired.
mod queue;

pub use queue::*;
