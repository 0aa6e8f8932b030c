use super::*;
use crate::protocol::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// In-process transport backed by a pair of unbounded channels.
/// Stands in for a socket when players live in the same process:
/// local bots, simulations and tests.
pub struct Memory {
    tx: Option<UnboundedSender<String>>,
    rx: UnboundedReceiver<String>,
}

/// The far end of a [`Memory`] transport, held by whoever plays the seat.
/// Dropping it is indistinguishable from a client disconnecting.
pub struct Remote {
    tx: UnboundedSender<String>,
    rx: UnboundedReceiver<String>,
}

impl Memory {
    /// Creates a connected transport and its remote end.
    pub fn pair() -> (Self, Remote) {
        let (tx_outgoing, rx_outgoing) = unbounded_channel::<String>();
        let (tx_incoming, rx_incoming) = unbounded_channel::<String>();
        let memory = Self {
            tx: Some(tx_outgoing),
            rx: rx_incoming,
        };
        let remote = Remote {
            tx: tx_incoming,
            rx: rx_outgoing,
        };
        (memory, remote)
    }
}

#[async_trait::async_trait]
impl Transport for Memory {
    async fn send(&mut self, line: String) -> std::io::Result<()> {
        self.tx
            .as_ref()
            .ok_or(std::io::ErrorKind::NotConnected)?
            .send(line)
            .map_err(|_| std::io::ErrorKind::BrokenPipe.into())
    }
    async fn recv(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.rx.recv().await)
    }
    async fn close(&mut self) {
        self.tx.take();
        self.rx.close();
    }
    fn peer(&self) -> String {
        String::from("memory")
    }
}

impl Remote {
    pub fn send(&self, message: &ClientMessage) {
        self.send_raw(&Protocol::request(message));
    }
    pub fn send_raw(&self, line: &str) {
        let _ = self.tx.send(line.to_string());
    }
    /// Next message from the server, or None once the server hung up.
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        loop {
            match Protocol::response(&self.rx.recv().await?) {
                Ok(message) => return Some(message),
                Err(e) => log::warn!("[remote] skipping {}", e),
            }
        }
    }
    /// Answers every message with `ready` until the game is over.
    /// Returns the final verdict, or None if the server hung up first.
    pub async fn autoplay(mut self) -> Option<Verdict> {
        loop {
            match self.recv().await? {
                ServerMessage::GameOver { result, .. } => return Some(result),
                _ => self.send(&ClientMessage::Ready),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_cross_both_ways() {
        let (mut memory, mut remote) = Memory::pair();
        remote.send(&ClientMessage::WantGame);
        let line = memory.recv().await.unwrap().unwrap();
        assert_eq!(Protocol::decode(&line), Ok(ClientMessage::WantGame));
        let over = ServerMessage::game_over(Verdict::Lose);
        memory.send(Protocol::encode(&over)).await.unwrap();
        assert_eq!(remote.recv().await, Some(over));
    }

    #[tokio::test]
    async fn closed_memory_refuses_sends() {
        let (mut memory, _remote) = Memory::pair();
        memory.close().await;
        assert!(memory.send(String::from("{}")).await.is_err());
    }
}
