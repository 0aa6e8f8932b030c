use crate::protocol::*;
use futures::StreamExt;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;

/// How a swarm of clients fared.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub aborted: usize,
    pub failed: usize,
}

impl Summary {
    /// Clients that reached a `game_over`.
    pub fn completed(&self) -> usize {
        self.wins + self.losses + self.draws + self.aborted
    }
    fn record(mut self, result: anyhow::Result<Verdict>) -> Self {
        match result {
            Ok(Verdict::Win) => self.wins += 1,
            Ok(Verdict::Lose) => self.losses += 1,
            Ok(Verdict::Draw) => self.draws += 1,
            Ok(Verdict::Aborted) => self.aborted += 1,
            Err(e) => {
                log::warn!("[client] {}", e);
                self.failed += 1
            }
        }
        self
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} completed ({} won, {} lost, {} drawn, {} aborted), {} failed",
            self.completed(),
            self.wins,
            self.losses,
            self.draws,
            self.aborted,
            self.failed
        )
    }
}

/// Scripted TCP player for smoke and load testing a server.
pub struct Client;

impl Client {
    /// Ask for a game and acknowledge every message until it ends.
    pub async fn play(addr: &str) -> anyhow::Result<Verdict> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();
        Self::write(&mut writer, &ClientMessage::WantGame).await?;
        while let Some(line) = lines.next_line().await? {
            match Protocol::response(&line)? {
                ServerMessage::GameOver { result, forfeit } => {
                    log::debug!("[client] game over: {:?} (forfeit: {})", result, forfeit);
                    return Ok(result);
                }
                ServerMessage::GameStart { session, cards } => {
                    log::debug!("[client] joined session {} with {} cards", session, cards.len());
                    Self::write(&mut writer, &ClientMessage::Ready).await?;
                }
                ServerMessage::RoundResult { .. } => {
                    Self::write(&mut writer, &ClientMessage::Ready).await?;
                }
            }
        }
        Err(anyhow::anyhow!("server hung up before game over"))
    }

    /// Play `n` games at once, never holding more than `limit` open.
    /// Clients are matched with each other, so an odd `n` leaves one
    /// waiting until the server pairs it with someone else.
    pub async fn swarm(addr: &str, n: usize, limit: usize) -> Summary {
        let permits = Arc::new(Semaphore::new(limit.max(1)));
        let mut tasks = futures::stream::FuturesUnordered::new();
        for _ in 0..n {
            let addr = addr.to_string();
            let permits = Arc::clone(&permits);
            tasks.push(tokio::spawn(async move {
                let _permit = permits.acquire_owned().await?;
                Self::play(&addr).await
            }));
        }
        let mut summary = Summary::default();
        while let Some(joined) = tasks.next().await {
            summary = summary.record(joined.map_err(anyhow::Error::from).and_then(|r| r));
        }
        log::info!("[client] {}", summary);
        summary
    }

    async fn write<W>(writer: &mut W, message: &ClientMessage) -> anyhow::Result<()>
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        let line = format!("{}\n", Protocol::request(message));
        Ok(writer.write_all(line.as_bytes()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn swarm_completes_every_game() {
        let casino = Arc::new(Casino::new(Config::default()));
        let server = Server::bind(Some(String::from("127.0.0.1:0")), Arc::clone(&casino))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap().to_string();
        tokio::spawn(server.run());
        let summary = Client::swarm(&addr, 40, 40).await;
        assert_eq!(summary.completed(), 40);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.aborted, 0);
        assert_eq!(summary.wins, summary.losses);
        assert_eq!(summary.draws % 2, 0);
    }

    #[tokio::test]
    async fn nothing_listening_is_a_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);
        assert!(Client::play(&addr).await.is_err());
    }

    #[test]
    fn summary_counts_completions() {
        let summary = Summary::default()
            .record(Ok(Verdict::Win))
            .record(Ok(Verdict::Draw))
            .record(Err(anyhow::anyhow!("refused")));
        assert_eq!(summary.completed(), 2);
        assert_eq!(summary.failed, 1);
    }
}
