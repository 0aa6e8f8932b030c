use super::*;
use crate::ID;
use crate::cards::*;
use crate::lobby::Lobby;
use crate::players::Handle;
use crate::war::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use tokio::task::AbortHandle;

/// Lifetime counters, read-only from the outside.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub started: usize,
    pub finished: usize,
    pub aborted: usize,
    pub unmatched: usize,
}

#[derive(Default)]
struct Counters {
    started: AtomicUsize,
    finished: AtomicUsize,
    aborted: AtomicUsize,
    unmatched: AtomicUsize,
}

/// Session supervisor.
///
/// Admits players into the lobby, launches one worker per pair, and keeps
/// a registry of live workers keyed by session. Owns no game state: each
/// worker carries its own [`Game`] and both [`Handle`]s, and hands the
/// handles back when it ends.
pub struct Casino {
    config: Config,
    dealer: Box<dyn Dealer>,
    lobby: Lobby,
    sessions: Mutex<HashMap<ID<Session>, AbortHandle>>,
    counters: Counters,
}

impl Casino {
    pub fn new(config: Config) -> Self {
        Self::with_dealer(config, Shuffle::new(config.deck))
    }
    pub fn with_dealer<D>(config: Config, dealer: D) -> Self
    where
        D: Dealer + 'static,
    {
        Self {
            config,
            dealer: Box::new(dealer),
            lobby: Lobby::default(),
            sessions: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Casino {
    /// Queue a player and start every game that can now be started.
    /// Pairing happens inline, on whichever task admits the second player.
    pub fn admit(self: &Arc<Self>, handle: Handle) {
        self.lobby
            .enqueue(handle.with_timeout(self.config.read_timeout));
        while let Some((a, b)) = self.lobby.try_pair() {
            self.launch(a, b);
        }
    }

    /// Spawn a worker for one pair and watch it until it ends.
    fn launch(self: &Arc<Self>, a: Handle, b: Handle) {
        let id = ID::default();
        let deck = Deck::from(self.dealer.new_shuffled_deck());
        let game = Game::new(deck, self.config.rules);
        let worker = tokio::spawn(Session::new(id, [a, b], game, self.config.paced).run());
        self.sessions().insert(id, worker.abort_handle());
        self.counters.started.fetch_add(1, Ordering::Relaxed);
        log::debug!("[casino] started session {}", id);
        let casino = Arc::clone(self);
        tokio::spawn(async move {
            let result = worker.await;
            casino.sessions().remove(&id);
            match result {
                Ok(report) => casino.conclude(report).await,
                Err(e) if e.is_cancelled() => {
                    casino.counters.aborted.fetch_add(1, Ordering::Relaxed);
                    log::debug!("[casino] session {} cancelled", id);
                }
                Err(e) => {
                    casino.counters.aborted.fetch_add(1, Ordering::Relaxed);
                    log::error!("[casino] session {} panicked: {}", id, e);
                }
            }
        });
    }

    /// Release both handles of a finished worker. Players stood up before
    /// the deal go back to the tail of the queue if they are still there.
    async fn conclude(self: &Arc<Self>, report: Report) {
        let Report {
            id,
            conclusion,
            seats,
            ..
        } = report;
        match conclusion {
            Conclusion::Finished(_) => self.counters.finished.fetch_add(1, Ordering::Relaxed),
            Conclusion::Aborted { .. } => self.counters.aborted.fetch_add(1, Ordering::Relaxed),
            Conclusion::Unmatched => self.counters.unmatched.fetch_add(1, Ordering::Relaxed),
        };
        for mut seat in seats {
            match conclusion {
                Conclusion::Unmatched if seat.is_connected() => {
                    log::debug!("[casino] requeue {} from session {}", seat.peer(), id);
                    self.admit(seat);
                }
                _ => seat.close().await,
            }
        }
        log::debug!("[casino] session {} cleaned up", id);
    }
}

impl Casino {
    /// Sessions currently running.
    pub fn active(&self) -> usize {
        self.sessions().len()
    }
    /// Players waiting for an opponent.
    pub fn waiting(&self) -> usize {
        self.lobby.waiting()
    }
    pub fn stats(&self) -> Stats {
        Stats {
            started: self.counters.started.load(Ordering::Relaxed),
            finished: self.counters.finished.load(Ordering::Relaxed),
            aborted: self.counters.aborted.load(Ordering::Relaxed),
            unmatched: self.counters.unmatched.load(Ordering::Relaxed),
        }
    }
    /// Cancel every running worker. Their handles are dropped with them,
    /// which closes the connections; the registry drains as each one ends.
    pub fn shutdown(&self) {
        let sessions = self.sessions();
        log::info!("[casino] shutting down {} sessions", sessions.len());
        sessions.values().for_each(AbortHandle::abort);
    }
    fn sessions(&self) -> MutexGuard<'_, HashMap<ID<Session>, AbortHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::*;
    use crate::protocol::*;
    use std::time::Duration;

    fn cards(s: &[&str]) -> Vec<Card> {
        s.iter().map(|s| Card::try_from(*s).unwrap()).collect()
    }

    fn seat() -> (Handle, Remote) {
        let (memory, remote) = Memory::pair();
        (Handle::new(memory), remote)
    }

    /// Poll until `done` holds, failing the test after a few seconds.
    async fn eventually<F>(done: F)
    where
        F: Fn() -> bool,
    {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn plays_the_scenario_and_cleans_up() {
        let deck = Stacked::hands(&cards(&["2c", "7c", "Kc", "4c"]), &cards(&["5d", "7d", "3d", "Ad"]));
        let casino = Arc::new(Casino::with_dealer(Config::default(), deck));
        let (h0, r0) = seat();
        let (h1, r1) = seat();
        casino.admit(h0);
        assert_eq!(casino.waiting(), 1);
        assert_eq!(casino.active(), 0);
        casino.admit(h1);
        assert_eq!(casino.waiting(), 0);
        let (v0, v1) = tokio::join!(r0.autoplay(), r1.autoplay());
        assert_eq!(v0, Some(Verdict::Lose));
        assert_eq!(v1, Some(Verdict::Win));
        eventually(|| casino.active() == 0).await;
        eventually(|| casino.stats().finished == 1).await;
        assert_eq!(casino.stats().started, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn disconnect_forfeits_and_frees_registry() {
        let casino = Arc::new(Casino::new(Config::default()));
        let (h0, mut r0) = seat();
        let (h1, r1) = seat();
        casino.admit(h0);
        casino.admit(h1);
        let survivor = tokio::spawn(r1.autoplay());
        assert!(matches!(r0.recv().await, Some(ServerMessage::GameStart { .. })));
        assert_eq!(casino.active(), 1);
        r0.send(&ClientMessage::Ready);
        assert!(matches!(r0.recv().await, Some(ServerMessage::RoundResult { .. })));
        drop(r0);
        assert_eq!(survivor.await.unwrap(), Some(Verdict::Win));
        eventually(|| casino.active() == 0).await;
        eventually(|| casino.stats().aborted == 1).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn survivor_of_failed_deal_is_requeued() {
        let casino = Arc::new(Casino::new(Config::default()));
        let (h0, r0) = seat();
        let (h1, r1) = seat();
        drop(r0);
        casino.admit(h0);
        casino.admit(h1);
        eventually(|| casino.stats().unmatched == 1).await;
        eventually(|| casino.waiting() == 1 && casino.active() == 0).await;
        let (h2, r2) = seat();
        casino.admit(h2);
        let (v1, v2) = tokio::join!(r1.autoplay(), r2.autoplay());
        assert!(matches!(
            (v1, v2),
            (Some(Verdict::Win), Some(Verdict::Lose))
                | (Some(Verdict::Lose), Some(Verdict::Win))
                | (Some(Verdict::Draw), Some(Verdict::Draw))
        ));
        eventually(|| casino.active() == 0).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn walkout_before_first_round_requeues_opponent() {
        let casino = Arc::new(Casino::new(Config::default()));
        let (h0, mut r0) = seat();
        let (h1, r1) = seat();
        casino.admit(h0);
        casino.admit(h1);
        assert!(matches!(r0.recv().await, Some(ServerMessage::GameStart { .. })));
        drop(r0);
        r1.send(&ClientMessage::Ready);
        eventually(|| casino.stats().unmatched == 1).await;
        eventually(|| casino.waiting() == 1 && casino.active() == 0).await;
        assert_eq!(casino.stats().aborted, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn thousand_players_fill_five_hundred_tables() {
        let casino = Arc::new(Casino::new(Config::default()));
        let mut remotes = Vec::new();
        for _ in 0..1000 {
            let (handle, remote) = seat();
            casino.admit(handle);
            remotes.push(remote);
        }
        assert_eq!(casino.active(), 500);
        assert_eq!(casino.waiting(), 0);
        for remote in remotes.iter_mut() {
            assert!(matches!(remote.recv().await, Some(ServerMessage::GameStart { .. })));
        }
        assert_eq!(casino.active(), 500);
        drop(remotes);
        eventually(|| casino.active() == 0).await;
        eventually(|| casino.stats().unmatched == 500).await;
        assert_eq!(casino.waiting(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn identical_decks_play_identical_games() {
        let deck = Stacked::hands(&cards(&["2c", "9c", "Jc", "Qc"]), &cards(&["5d", "9d", "3d", "Kd"]));
        let casino = Arc::new(Casino::with_dealer(Config::default(), deck));
        let mut remotes = Vec::new();
        for _ in 0..64 {
            let (handle, remote) = seat();
            casino.admit(handle);
            remotes.push(remote);
        }
        let verdicts = futures::future::join_all(remotes.into_iter().map(Remote::autoplay)).await;
        for pair in verdicts.chunks(2) {
            assert_eq!(pair, [Some(Verdict::Lose), Some(Verdict::Win)]);
        }
        eventually(|| casino.stats().finished == 32).await;
        assert_eq!(casino.active(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn shutdown_cancels_every_session() {
        let casino = Arc::new(Casino::new(Config::default()));
        let mut remotes = Vec::new();
        for _ in 0..20 {
            let (handle, remote) = seat();
            casino.admit(handle);
            remotes.push(remote);
        }
        assert_eq!(casino.active(), 10);
        casino.shutdown();
        eventually(|| casino.active() == 0).await;
        for mut remote in remotes {
            while remote.recv().await.is_some() {}
        }
        eventually(|| casino.stats().aborted == 10).await;
    }
}
