/// Ways a player's connection can fail a session.
///
/// Every variant is contained by the session that observes it: the
/// offending seat forfeits and the game is aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// I/O failure or the peer closed the connection.
    ConnectionLost,
    /// No message arrived within the read timeout.
    Timeout,
    /// A message arrived that could not be parsed or was out of place.
    MalformedMessage(String),
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionLost => write!(f, "connection lost"),
            Self::Timeout => write!(f, "timed out"),
            Self::MalformedMessage(s) => write!(f, "malformed message: {}", s),
        }
    }
}

impl std::error::Error for Fault {}

impl From<std::io::Error> for Fault {
    fn from(_: std::io::Error) -> Self {
        Self::ConnectionLost
    }
}
