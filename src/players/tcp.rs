use super::*;
use std::net::SocketAddr;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::tcp::OwnedWriteHalf;

/// Longest accepted line in bytes. Protects against unbounded buffering
/// from a peer that never sends a newline.
pub const MAX_LINE: u64 = 4096;

/// Newline-delimited transport over an accepted TCP stream.
pub struct Tcp {
    peer: SocketAddr,
    reader: BufReader<OwnedReadHalf>,
    writer: Option<OwnedWriteHalf>,
}

impl Tcp {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        let _ = stream.set_nodelay(true);
        let (reader, writer) = stream.into_split();
        Self {
            peer,
            reader: BufReader::new(reader),
            writer: Some(writer),
        }
    }
}

#[async_trait::async_trait]
impl Transport for Tcp {
    async fn send(&mut self, mut line: String) -> std::io::Result<()> {
        line.push('\n');
        self.writer
            .as_mut()
            .ok_or(std::io::ErrorKind::NotConnected)?
            .write_all(line.as_bytes())
            .await
    }
    async fn recv(&mut self) -> std::io::Result<Option<String>> {
        let ref mut line = String::new();
        match (&mut self.reader).take(MAX_LINE).read_line(line).await? {
            0 => Ok(None),
            _ if line.ends_with('\n') => Ok(Some(line.trim_end().to_string())),
            n if n as u64 >= MAX_LINE => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("line exceeds {} bytes", MAX_LINE),
            )),
            _ => Ok(None),
        }
    }
    async fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.shutdown().await;
        }
    }
    fn peer(&self) -> String {
        self.peer.to_string()
    }
}
