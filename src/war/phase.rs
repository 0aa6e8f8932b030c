use crate::Position;

/// How a finished game came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Winner(Position),
    Draw,
}

/// Session state machine.
///
/// ```text
/// Dealing ─► RoundCompare ─► RoundResolved ─► Finished
///                 │   ▲            │
///                 ▼   └────────────┘
///                War ─► RoundResolved
/// ```
/// Any state but `Finished` may jump to `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Dealing,
    RoundCompare,
    War,
    RoundResolved,
    Finished(Standing),
    Aborted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Aborted)
    }
    /// States that turn cards face up and need both players present.
    pub fn is_contested(&self) -> bool {
        matches!(self, Self::RoundCompare | Self::War)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Dealing => write!(f, "dealing"),
            Self::RoundCompare => write!(f, "compare"),
            Self::War => write!(f, "war"),
            Self::RoundResolved => write!(f, "resolved"),
            Self::Finished(Standing::Winner(p)) => write!(f, "finished (P{} wins)", p),
            Self::Finished(Standing::Draw) => write!(f, "finished (draw)"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}
