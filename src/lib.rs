//! Matchmaking and concurrent session hosting for the card game War.
//!
//! Connections are admitted into a single FIFO [`lobby::Lobby`], paired
//! oldest-first, and each pair is handed to its own session worker under
//! the supervision of a [`hosting::Casino`]. Sessions share no state with
//! one another; the lobby and the casino registry are the only locks.
pub mod cards;
pub mod hosting;
pub mod lobby;
pub mod players;
pub mod protocol;
pub mod war;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Rounds won by a player within one session.
pub type Score = u32;
/// Seat index within a session (0 or 1).
pub type Position = usize;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Cards in a fresh deck, split evenly between both players.
pub const DECK_SIZE: usize = 52;
/// Cards each player commits to the pot per war; the last one is turned up.
pub const WAR_STAKE: usize = 1;
/// Rounds after which a capture-scored game is settled by card count.
pub const MAX_ROUNDS: usize = 10_000;

// ============================================================================
// NETWORK PARAMETERS
// ============================================================================
/// Longest wait for one inbound message during a game (seconds).
pub const READ_TIMEOUT: u64 = 30;
/// Longest wait for the opening want_game from a new connection (seconds).
pub const HANDSHAKE_TIMEOUT: u64 = 10;
/// Simultaneous games a load-testing swarm keeps open.
pub const CLIENT_CONCURRENCY: usize = 1000;
/// Pending connection backlog for the acceptor.
pub const BACKLOG: u32 = 1024;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Session lifecycles (pairings, verdicts, forfeits) go to the terminal.
/// Per-message chatter goes to `LOG_DIR/war-<unix secs>.log` as well,
/// with `LOG_DIR` defaulting to `logs`.
#[cfg(feature = "server")]
pub fn log() -> anyhow::Result<()> {
    let dir = std::env::var("LOG_DIR").unwrap_or_else(|_| String::from("logs"));
    std::fs::create_dir_all(&dir)?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let path = std::path::Path::new(&dir).join(format!("war-{}.log", secs));
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(&path)?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    log::debug!("[log] writing to {}", path.display());
    Ok(())
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("violent interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}
