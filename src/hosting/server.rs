use super::*;
use crate::players::*;
use crate::protocol::*;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::net::TcpSocket;
use tokio::net::TcpStream;

/// Acceptor loop. Turns TCP connections into handles and admits each
/// one to the casino once it has asked for a game.
pub struct Server {
    casino: Arc<Casino>,
    listener: TcpListener,
}

impl Server {
    /// Bind to `addr`, or `BIND_ADDR` from the environment when None.
    pub async fn bind(addr: Option<String>, casino: Arc<Casino>) -> anyhow::Result<Self> {
        let addr = match addr {
            Some(addr) => addr,
            None => std::env::var("BIND_ADDR")
                .map_err(|_| anyhow::anyhow!("no address given and BIND_ADDR not set"))?,
        };
        let addr = tokio::net::lookup_host(&addr)
            .await?
            .next()
            .ok_or_else(|| anyhow::anyhow!("{} resolves to nothing", addr))?;
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(crate::BACKLOG)?;
        log::info!("[server] listening on {}", listener.local_addr()?);
        Ok(Self { casino, listener })
    }
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept forever. Each connection gets its own short-lived handshake
    /// task so a slow client never holds up the next accept.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let casino = Arc::clone(&self.casino);
                    tokio::spawn(Self::handshake(casino, stream, peer));
                }
                Err(e) => {
                    log::warn!("[server] accept failed: {}", e);
                    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                }
            }
        }
    }

    async fn handshake(casino: Arc<Casino>, stream: TcpStream, peer: SocketAddr) {
        let timeout = casino.config().handshake_timeout;
        let mut handle = Handle::new(Tcp::new(stream, peer)).with_timeout(timeout);
        match handle.receive().await {
            Ok(ClientMessage::WantGame) => {
                log::debug!("[server] {} wants a game", peer);
                casino.admit(handle);
            }
            Ok(other) => {
                log::debug!("[server] {} opened with {:?}", peer, other);
                handle.close().await;
            }
            Err(e) => {
                log::debug!("[server] {} dropped at handshake: {}", peer, e);
                handle.close().await;
            }
        }
    }
}
