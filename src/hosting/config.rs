use crate::war::Rules;
use std::time::Duration;

/// Per-server overrides of the crate defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub rules: Rules,
    /// Cards per shuffled deck.
    pub deck: usize,
    /// Bounded wait for each message once a player is admitted.
    pub read_timeout: Duration,
    /// Bounded wait for the opening `want_game`.
    pub handshake_timeout: Duration,
    /// Wait for `ready` from both players before turning each card.
    pub paced: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            deck: crate::DECK_SIZE,
            read_timeout: Duration::from_secs(crate::READ_TIMEOUT),
            handshake_timeout: Duration::from_secs(crate::HANDSHAKE_TIMEOUT),
            paced: true,
        }
    }
}
