use crate::Position;
use crate::Score;
use crate::cards::Card;
use crate::protocol::Outcome;
use crate::protocol::ServerMessage;

/// A face-up comparison and the scores it left behind.
/// Seat-relative fields are stored from P0's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub cards: [Card; 2],
    pub outcome: Outcome,
    pub scores: [Score; 2],
}

impl Round {
    /// The round as told to the player sitting at `seat`.
    pub fn view(&self, seat: Position) -> ServerMessage {
        let them = 1 - seat;
        let outcome = match seat {
            0 => self.outcome,
            _ => self.outcome.flip(),
        };
        ServerMessage::round_result(
            self.cards[seat],
            self.cards[them],
            outcome,
            self.scores[seat],
            self.scores[them],
        )
    }
}
