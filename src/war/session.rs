use super::*;
use crate::ID;
use crate::Position;
use crate::Unique;
use crate::players::Handle;
use crate::protocol::*;

/// How a session worker ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    /// Played to the end.
    Finished(Standing),
    /// Cut short by a fault; the seats marked as culprits forfeit.
    Aborted { culprits: [bool; 2], fault: Fault },
    /// A seat was gone before the first card was turned.
    /// Connected seats are fit to be matched again.
    Unmatched,
}

/// What a worker hands back to its supervisor.
#[derive(Debug)]
pub struct Report {
    pub id: ID<Session>,
    pub conclusion: Conclusion,
    pub rounds: usize,
    pub seats: [Handle; 2],
}

/// One running game between two players.
///
/// Owns both handles and the [`Game`] for its whole lifetime; nothing else
/// can observe or mutate either while it runs. Suspends only while waiting
/// on its own two players.
pub struct Session {
    id: ID<Self>,
    game: Game,
    seats: [Handle; 2],
    paced: bool,
}

impl Session {
    pub fn new(id: ID<Self>, seats: [Handle; 2], game: Game, paced: bool) -> Self {
        Self {
            id,
            game,
            seats,
            paced,
        }
    }
}

impl Session {
    /// Run the state machine to a terminal state. Never fails: every
    /// fault is resolved here and reported in the [`Conclusion`].
    pub async fn run(mut self) -> Report {
        log::debug!(
            "[session {}] {} vs {}",
            self.id,
            self.seats[0].peer(),
            self.seats[1].peer()
        );
        let conclusion = match self.deal().await {
            Err(()) => {
                self.game.abort();
                Conclusion::Unmatched
            }
            Ok(()) => match self.play().await {
                Ok(standing) => self.finish(standing).await,
                Err((culprits, fault)) if self.stood_up(&fault) => self.unmatch(culprits).await,
                Err((culprits, fault)) => self.abort(culprits, fault).await,
            },
        };
        log::debug!("[session {}] {:?} after {} rounds", self.id, conclusion, self.game.rounds());
        Report {
            id: self.id,
            rounds: self.game.rounds(),
            conclusion,
            seats: self.seats,
        }
    }

    /// Show each player their dealt hand. Any unreachable seat voids the match.
    async fn deal(&mut self) -> Result<(), ()> {
        let session = self.id.to_string();
        let mut reached = [false; 2];
        for seat in 0..2 {
            let cards = self.game.hand(seat).iter().copied().collect();
            let message = ServerMessage::game_start(&session, cards);
            reached[seat] = self.seats[seat].send(&message).await.is_ok();
        }
        match reached {
            [true, true] => Ok(()),
            _ => {
                log::info!("[session {}] player gone before deal", self.id);
                Err(())
            }
        }
    }

    async fn play(&mut self) -> Result<Standing, ([bool; 2], Fault)> {
        loop {
            match self.game.phase() {
                Phase::Finished(standing) => return Ok(standing),
                Phase::Aborted => unreachable!("only the session aborts its game"),
                phase if phase.is_contested() && self.paced => self.ready().await?,
                _ => {}
            }
            if let Some(round) = self.game.advance() {
                log::trace!("[session {}] {:?}", self.id, round);
                self.tell(round).await?;
            }
        }
    }

    /// Wait for both players to acknowledge before turning cards.
    async fn ready(&mut self) -> Result<(), ([bool; 2], Fault)> {
        let [a, b] = &mut self.seats;
        let (a, b) = tokio::join!(a.receive(), b.receive());
        match (Self::expect_ready(a), Self::expect_ready(b)) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(fault), Ok(())) => Err(([true, false], fault)),
            (Ok(()), Err(fault)) => Err(([false, true], fault)),
            (Err(fault), Err(_)) => Err(([true, true], fault)),
        }
    }

    fn expect_ready(received: Result<ClientMessage, Fault>) -> Result<(), Fault> {
        match received? {
            ClientMessage::Ready => Ok(()),
            other => Err(Fault::MalformedMessage(format!("unexpected {:?}", other))),
        }
    }

    async fn tell(&mut self, round: Round) -> Result<(), ([bool; 2], Fault)> {
        let mut culprits = [false; 2];
        for seat in 0..2 {
            culprits[seat] = self.seats[seat].send(&round.view(seat)).await.is_err();
        }
        match culprits {
            [false, false] => Ok(()),
            _ => Err((culprits, Fault::ConnectionLost)),
        }
    }

    async fn finish(&mut self, standing: Standing) -> Conclusion {
        log::debug!("[session {}] {}", self.id, self.game.phase());
        for seat in 0..2 {
            let verdict = match standing {
                Standing::Draw => Verdict::Draw,
                Standing::Winner(p) if p == seat => Verdict::Win,
                Standing::Winner(_) => Verdict::Lose,
            };
            let _ = self.seats[seat].send(&ServerMessage::game_over(verdict)).await;
        }
        Conclusion::Finished(standing)
    }

    /// Gone or silent before any card was turned. A write to a closed
    /// socket can still succeed, so the first read is where this shows.
    fn stood_up(&self, fault: &Fault) -> bool {
        self.game.rounds() == 0 && matches!(fault, Fault::ConnectionLost | Fault::Timeout)
    }

    async fn unmatch(&mut self, culprits: [bool; 2]) -> Conclusion {
        self.game.abort();
        log::info!("[session {}] player gone before first round", self.id);
        for seat in 0..2 {
            if culprits[seat] {
                self.seats[seat].close().await;
            }
        }
        Conclusion::Unmatched
    }

    async fn abort(&mut self, culprits: [bool; 2], fault: Fault) -> Conclusion {
        self.game.abort();
        log::info!("[session {}] aborted: {} ({:?})", self.id, fault, culprits);
        for seat in 0..2 {
            let message = match culprits[seat] {
                true => ServerMessage::game_over(Verdict::Aborted),
                false => ServerMessage::forfeit_win(),
            };
            let _ = self.seats[seat].send(&message).await;
        }
        Conclusion::Aborted { culprits, fault }
    }
}

impl Unique for Session {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Conclusion {
    /// The seat credited with the win, if any.
    pub fn winner(&self) -> Option<Position> {
        match self {
            Self::Finished(Standing::Winner(p)) => Some(*p),
            Self::Aborted {
                culprits: [true, false],
                ..
            } => Some(1),
            Self::Aborted {
                culprits: [false, true],
                ..
            } => Some(0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::*;
    use crate::players::*;
    use std::time::Duration;

    fn cards(s: &[&str]) -> Vec<Card> {
        s.iter().map(|s| Card::try_from(*s).unwrap()).collect()
    }

    fn table(a: &[&str], b: &[&str], paced: bool) -> (Session, Remote, Remote) {
        let (m0, r0) = Memory::pair();
        let (m1, r1) = Memory::pair();
        let game = Game::from_hands(Hand::from(cards(a)), Hand::from(cards(b)), Rules::default());
        let seats = [Handle::new(m0), Handle::new(m1)];
        (Session::new(ID::default(), seats, game, paced), r0, r1)
    }

    #[tokio::test]
    async fn scenario_over_the_wire() {
        let (session, r0, mut r1) = table(&["2c", "7c", "Kc", "4c"], &["5d", "7d", "3d", "Ad"], true);
        let first = tokio::spawn(r0.autoplay());
        let worker = tokio::spawn(session.run());
        let mut seen = Vec::new();
        loop {
            match r1.recv().await.unwrap() {
                over @ ServerMessage::GameOver { .. } => break seen.push(over),
                message => seen.push(message),
            }
            r1.send(&ClientMessage::Ready);
        }
        let report = worker.await.unwrap();
        assert_eq!(report.conclusion, Conclusion::Finished(Standing::Winner(1)));
        assert_eq!(report.rounds, 4);
        assert_eq!(first.await.unwrap(), Some(Verdict::Lose));
        assert_eq!(seen.len(), 6);
        assert_eq!(
            seen[0],
            ServerMessage::game_start(&report.id.to_string(), cards(&["5d", "7d", "3d", "Ad"]))
        );
        assert_eq!(
            seen[3],
            ServerMessage::round_result(cards(&["3d"])[0], cards(&["Kc"])[0], Outcome::Lose, 1, 1)
        );
        assert_eq!(seen[5], ServerMessage::game_over(Verdict::Win));
    }

    #[tokio::test]
    async fn disconnect_mid_game_forfeits() {
        let (session, mut r0, r1) = table(&["2c", "3c", "4c"], &["5d", "6d", "7d"], true);
        let worker = tokio::spawn(session.run());
        let survivor = tokio::spawn(r1.autoplay());
        assert!(matches!(r0.recv().await, Some(ServerMessage::GameStart { .. })));
        r0.send(&ClientMessage::Ready);
        assert!(matches!(r0.recv().await, Some(ServerMessage::RoundResult { .. })));
        drop(r0);
        let report = worker.await.unwrap();
        assert_eq!(
            report.conclusion,
            Conclusion::Aborted {
                culprits: [true, false],
                fault: Fault::ConnectionLost
            }
        );
        assert_eq!(report.conclusion.winner(), Some(1));
        assert_eq!(report.rounds, 1);
        assert_eq!(survivor.await.unwrap(), Some(Verdict::Win));
    }

    #[tokio::test]
    async fn malformed_message_forfeits_offender() {
        let (session, mut r0, r1) = table(&["2c"], &["5d"], true);
        let worker = tokio::spawn(session.run());
        let survivor = tokio::spawn(r1.autoplay());
        assert!(matches!(r0.recv().await, Some(ServerMessage::GameStart { .. })));
        r0.send(&ClientMessage::WantGame);
        let report = worker.await.unwrap();
        assert!(matches!(
            report.conclusion,
            Conclusion::Aborted {
                culprits: [true, false],
                fault: Fault::MalformedMessage(_)
            }
        ));
        assert_eq!(r0.recv().await, Some(ServerMessage::game_over(Verdict::Aborted)));
        assert_eq!(survivor.await.unwrap(), Some(Verdict::Win));
        assert_eq!(report.rounds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_player_times_out() {
        let (m0, mut r0) = Memory::pair();
        let (m1, r1) = Memory::pair();
        let game = Game::from_hands(
            Hand::from(cards(&["2c", "3c"])),
            Hand::from(cards(&["5d", "6d"])),
            Rules::default(),
        );
        let seats = [
            Handle::new(m0).with_timeout(Duration::from_secs(1)),
            Handle::new(m1).with_timeout(Duration::from_secs(1)),
        ];
        let worker = tokio::spawn(Session::new(ID::default(), seats, game, true).run());
        let survivor = tokio::spawn(r1.autoplay());
        assert!(matches!(r0.recv().await, Some(ServerMessage::GameStart { .. })));
        r0.send(&ClientMessage::Ready);
        assert!(matches!(r0.recv().await, Some(ServerMessage::RoundResult { .. })));
        let report = worker.await.unwrap();
        assert_eq!(
            report.conclusion,
            Conclusion::Aborted {
                culprits: [true, false],
                fault: Fault::Timeout
            }
        );
        assert_eq!(survivor.await.unwrap(), Some(Verdict::Win));
    }

    #[tokio::test]
    async fn gone_before_deal_is_unmatched() {
        let (session, r0, r1) = table(&["2c"], &["5d"], true);
        drop(r1);
        let report = session.run().await;
        assert_eq!(report.conclusion, Conclusion::Unmatched);
        assert!(report.seats[0].is_connected());
        assert!(!report.seats[1].is_connected());
        drop(r0);
    }

    #[tokio::test]
    async fn gone_before_first_round_is_unmatched() {
        let (session, mut r0, mut r1) = table(&["2c", "3c"], &["5d", "6d"], true);
        let worker = tokio::spawn(session.run());
        assert!(matches!(r0.recv().await, Some(ServerMessage::GameStart { .. })));
        assert!(matches!(r1.recv().await, Some(ServerMessage::GameStart { .. })));
        drop(r0);
        r1.send(&ClientMessage::Ready);
        let report = worker.await.unwrap();
        assert_eq!(report.conclusion, Conclusion::Unmatched);
        assert_eq!(report.rounds, 0);
        assert!(!report.seats[0].is_connected());
        assert!(report.seats[1].is_connected());
        let pending = tokio::time::timeout(Duration::from_millis(10), r1.recv()).await;
        assert!(pending.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn silent_before_first_round_is_unmatched() {
        let (m0, _r0) = Memory::pair();
        let (m1, r1) = Memory::pair();
        let game = Game::from_hands(Hand::from(cards(&["2c"])), Hand::from(cards(&["5d"])), Rules::default());
        let seats = [
            Handle::new(m0).with_timeout(Duration::from_secs(1)),
            Handle::new(m1).with_timeout(Duration::from_secs(1)),
        ];
        r1.send(&ClientMessage::Ready);
        let report = Session::new(ID::default(), seats, game, true).run().await;
        assert_eq!(report.conclusion, Conclusion::Unmatched);
        assert!(!report.seats[0].is_connected());
        assert!(report.seats[1].is_connected());
    }

    #[tokio::test]
    async fn cut_short_war_reports_final_score() {
        let (m0, mut r0) = Memory::pair();
        let (m1, _r1) = Memory::pair();
        let rules = Rules {
            war_stake: 3,
            scoring: Scoring::Capture,
            ..Rules::default()
        };
        let game = Game::from_hands(
            Hand::from(cards(&["7c", "2c"])),
            Hand::from(cards(&["7d", "3d", "4d", "5d", "6d"])),
            rules,
        );
        let seats = [Handle::new(m0), Handle::new(m1)];
        let report = Session::new(ID::default(), seats, game, false).run().await;
        assert_eq!(report.conclusion, Conclusion::Finished(Standing::Winner(1)));
        let mut seen = Vec::new();
        while let Ok(Some(message)) = tokio::time::timeout(Duration::from_millis(10), r0.recv()).await {
            seen.push(message);
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(
            seen[2],
            ServerMessage::round_result(cards(&["2c"])[0], cards(&["5d"])[0], Outcome::Lose, 0, 1)
        );
        assert_eq!(seen[3], ServerMessage::game_over(Verdict::Lose));
    }

    #[tokio::test]
    async fn unpaced_session_needs_no_input() {
        let (session, mut r0, mut r1) = table(&["Ac", "Kc"], &["2d", "3d"], false);
        let report = session.run().await;
        assert_eq!(report.conclusion, Conclusion::Finished(Standing::Winner(0)));
        let mut last = None;
        while let Ok(message) = tokio::time::timeout(Duration::from_millis(10), r0.recv()).await {
            last = message;
        }
        assert_eq!(last, Some(ServerMessage::game_over(Verdict::Win)));
        let mut count = 0;
        while let Ok(Some(_)) = tokio::time::timeout(Duration::from_millis(10), r1.recv()).await {
            count += 1;
        }
        assert_eq!(count, 4);
    }
}
