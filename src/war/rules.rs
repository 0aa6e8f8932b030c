/// What a won round is worth.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    /// The winner scores one point per round; won cards leave play into
    /// the winner's captured pile. Both hands shrink in lockstep and the
    /// game ends when they run out.
    #[default]
    Tally,
    /// Classic War: won cards go to the bottom of the winner's hand and the
    /// game ends when one player holds every card.
    Capture,
}

impl std::fmt::Display for Scoring {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Tally => write!(f, "tally"),
            Self::Capture => write!(f, "capture"),
        }
    }
}

impl TryFrom<&str> for Scoring {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "tally" => Ok(Self::Tally),
            "capture" => Ok(Self::Capture),
            _ => Err(format!("invalid scoring: {}", s)),
        }
    }
}

/// Table rules shared by every session a casino hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Cards each player commits per war; the last one is turned up.
    pub war_stake: usize,
    pub scoring: Scoring,
    /// Comparisons after which the game is settled on the spot.
    pub max_rounds: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            war_stake: crate::WAR_STAKE,
            scoring: Scoring::default(),
            max_rounds: crate::MAX_ROUNDS,
        }
    }
}
