use super::*;
use crate::ID;
use crate::Unique;
use crate::protocol::*;
use std::time::Duration;

/// Whether a handle can still reach its peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Connected,
    Disconnected,
}

/// One accepted player connection.
///
/// A handle has exactly one owner at a time and is moved, never shared:
/// from the acceptor into the lobby, and from the lobby into a single
/// session. It is deliberately neither `Clone` nor `Sync`.
pub struct Handle {
    id: ID<Self>,
    state: Connection,
    timeout: Duration,
    transport: Box<dyn Transport>,
}

impl Handle {
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            id: ID::default(),
            state: Connection::Connected,
            timeout: Duration::from_secs(crate::READ_TIMEOUT),
            transport: Box::new(transport),
        }
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn state(&self) -> Connection {
        self.state
    }
    pub fn is_connected(&self) -> bool {
        self.state == Connection::Connected
    }
    pub fn peer(&self) -> String {
        self.transport.peer()
    }
}

impl Handle {
    /// Deliver one message, or fail with `ConnectionLost`.
    pub async fn send(&mut self, message: &ServerMessage) -> Result<(), Fault> {
        if !self.is_connected() {
            return Err(Fault::ConnectionLost);
        }
        match self.transport.send(Protocol::encode(message)).await {
            Ok(()) => Ok(()),
            Err(e) => {
                log::debug!("[handle {}] send failed: {}", self.id, e);
                self.state = Connection::Disconnected;
                Err(Fault::ConnectionLost)
            }
        }
    }
    /// Wait at most the read timeout for the next message.
    /// A timeout or malformed message leaves the transport open so the
    /// offender can still be told the game was aborted.
    pub async fn receive(&mut self) -> Result<ClientMessage, Fault> {
        if !self.is_connected() {
            return Err(Fault::ConnectionLost);
        }
        match tokio::time::timeout(self.timeout, self.transport.recv()).await {
            Err(_) => Err(Fault::Timeout),
            Ok(Ok(Some(line))) => Protocol::decode(&line),
            Ok(Ok(None)) => {
                log::debug!("[handle {}] peer closed", self.id);
                self.state = Connection::Disconnected;
                Err(Fault::ConnectionLost)
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                Err(Fault::MalformedMessage(e.to_string()))
            }
            Ok(Err(e)) => {
                log::debug!("[handle {}] recv failed: {}", self.id, e);
                self.state = Connection::Disconnected;
                Err(Fault::ConnectionLost)
            }
        }
    }
    /// Close the transport. Safe to call more than once.
    pub async fn close(&mut self) {
        self.transport.close().await;
        self.state = Connection::Disconnected;
    }
}

impl Unique for Handle {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id)
            .field("peer", &self.transport.peer())
            .field("state", &self.state)
            .finish()
    }
}
