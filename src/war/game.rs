use super::*;
use crate::Position;
use crate::Score;
use crate::cards::*;
use crate::protocol::Outcome;

/// Functional core of one War session.
///
/// Holds both hands, the pot, captured piles and scores, and advances one
/// state transition at a time. Knows nothing about players or sockets; the
/// session worker drives it and relays each [`Round`] to the seats.
///
/// Every card dealt is always in exactly one of: a hand, the pot, or a
/// captured pile. See [`Game::cards`].
#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    phase: Phase,
    hands: [Hand; 2],
    piles: [Vec<Card>; 2],
    pot: Vec<Card>,
    shown: Option<[Card; 2]>,
    scores: [Score; 2],
    rounds: usize,
}

impl Game {
    pub fn new(deck: Deck, rules: Rules) -> Self {
        let (a, b) = deck.split();
        Self::from_hands(a, b, rules)
    }
    pub fn from_hands(a: Hand, b: Hand, rules: Rules) -> Self {
        Self {
            rules,
            phase: Phase::Dealing,
            hands: [a, b],
            piles: [Vec::new(), Vec::new()],
            pot: Vec::new(),
            shown: None,
            scores: [0, 0],
            rounds: 0,
        }
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn hand(&self, seat: Position) -> &Hand {
        &self.hands[seat]
    }
    pub fn pot(&self) -> &[Card] {
        &self.pot
    }
    pub fn scores(&self) -> [Score; 2] {
        self.scores
    }
    /// Face-up comparisons so far. A war cut short by an empty hand
    /// is reported but not counted.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
    /// Total cards across hands, pot and captured piles.
    /// Constant for the lifetime of a game.
    pub fn cards(&self) -> usize {
        self.hands.iter().map(Hand::size).sum::<usize>()
            + self.piles.iter().map(Vec::len).sum::<usize>()
            + self.pot.len()
    }
    /// Jump to the terminal `Aborted` state. Has no effect once finished.
    pub fn abort(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = Phase::Aborted;
        }
    }
}

impl Game {
    /// Perform one transition. Returns the round if cards were turned up.
    pub fn advance(&mut self) -> Option<Round> {
        match self.phase {
            Phase::Dealing => self.dealing(),
            Phase::RoundCompare => self.compare(),
            Phase::War => self.war(),
            Phase::RoundResolved => self.resolve(),
            Phase::Finished(_) | Phase::Aborted => None,
        }
    }

    fn dealing(&mut self) -> Option<Round> {
        self.phase = match self.hands.iter().all(|h| !h.is_empty()) {
            true => Phase::RoundCompare,
            false => Phase::RoundResolved,
        };
        None
    }

    fn compare(&mut self) -> Option<Round> {
        let (a, b) = match (self.hands[0].draw(), self.hands[1].draw()) {
            (Some(a), Some(b)) => (a, b),
            (a, b) => {
                // both hands are checked before every compare; keep any drawn card in play
                self.pot.extend(a.into_iter().chain(b));
                self.phase = Phase::RoundResolved;
                return None;
            }
        };
        self.rounds += 1;
        self.pot.push(a);
        self.pot.push(b);
        Some(self.settle(a, b))
    }

    fn war(&mut self) -> Option<Round> {
        let tied = self.shown?;
        match (self.stake(0), self.stake(1)) {
            (Ok(a), Ok(b)) => {
                self.rounds += 1;
                Some(self.settle(a, b))
            }
            (Ok(a), Err(b)) => {
                log::trace!("[game] P1 exhausted during war");
                self.award(0);
                Some(self.cut_short([a, b.unwrap_or(tied[1])], Outcome::Win))
            }
            (Err(a), Ok(b)) => {
                log::trace!("[game] P0 exhausted during war");
                self.award(1);
                Some(self.cut_short([a.unwrap_or(tied[0]), b], Outcome::Lose))
            }
            (Err(a), Err(b)) => {
                log::trace!("[game] both exhausted during war");
                let cards = [a.unwrap_or(tied[0]), b.unwrap_or(tied[1])];
                Some(self.cut_short(cards, Outcome::Draw))
            }
        }
    }

    fn resolve(&mut self) -> Option<Round> {
        let empty = [self.hands[0].is_empty(), self.hands[1].is_empty()];
        self.phase = match empty {
            [false, true] => Phase::Finished(Standing::Winner(0)),
            [true, false] => Phase::Finished(Standing::Winner(1)),
            [true, true] => Phase::Finished(self.leader(self.scores)),
            [false, false] if self.rounds >= self.rules.max_rounds => {
                Phase::Finished(self.leader(self.tiebreak()))
            }
            [false, false] => Phase::RoundCompare,
        };
        None
    }
}

impl Game {
    /// Commit up to `war_stake` cards to the pot. Returns the turned card,
    /// or the last card committed if the hand ran out first.
    fn stake(&mut self, seat: Position) -> Result<Card, Option<Card>> {
        let mut turned = None;
        for _ in 0..self.rules.war_stake.max(1) {
            match self.hands[seat].draw() {
                Some(card) => {
                    self.pot.push(card);
                    turned = Some(card);
                }
                None => return Err(turned),
            }
        }
        turned.ok_or(None)
    }

    /// Compare two face-up cards already in the pot.
    fn settle(&mut self, a: Card, b: Card) -> Round {
        self.shown = Some([a, b]);
        let outcome = if a.ties(&b) {
            self.phase = Phase::War;
            Outcome::War
        } else if a.beats(&b) {
            self.award(0);
            self.phase = Phase::RoundResolved;
            Outcome::Win
        } else {
            self.award(1);
            self.phase = Phase::RoundResolved;
            Outcome::Lose
        };
        Round {
            cards: [a, b],
            outcome,
            scores: self.scores,
        }
    }

    /// A war that ended because a hand ran dry before its turned card.
    fn cut_short(&mut self, cards: [Card; 2], outcome: Outcome) -> Round {
        self.phase = Phase::RoundResolved;
        Round {
            cards,
            outcome,
            scores: self.scores,
        }
    }

    /// Hand the whole pot to `seat` and credit the round.
    fn award(&mut self, seat: Position) {
        let pot = std::mem::take(&mut self.pot);
        match self.rules.scoring {
            Scoring::Tally => self.piles[seat].extend(pot),
            Scoring::Capture => self.hands[seat].bury(pot),
        }
        self.scores[seat] += 1;
    }

    /// What settles a game cut short by the round limit.
    fn tiebreak(&self) -> [Score; 2] {
        match self.rules.scoring {
            Scoring::Tally => self.scores,
            Scoring::Capture => [self.hands[0].size() as Score, self.hands[1].size() as Score],
        }
    }

    fn leader(&self, metric: [Score; 2]) -> Standing {
        match metric[0].cmp(&metric[1]) {
            std::cmp::Ordering::Greater => Standing::Winner(0),
            std::cmp::Ordering::Less => Standing::Winner(1),
            std::cmp::Ordering::Equal => Standing::Draw,
        }
    }
}
