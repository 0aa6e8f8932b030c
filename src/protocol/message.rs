use crate::Score;
use crate::cards::Card;
use serde::Deserialize;
use serde::Serialize;

/// Outcome of one round from the receiving player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Lose,
    War,
    Draw,
}

impl Outcome {
    /// The same round seen from the other seat.
    pub fn flip(self) -> Self {
        match self {
            Self::Win => Self::Lose,
            Self::Lose => Self::Win,
            Self::War => Self::War,
            Self::Draw => Self::Draw,
        }
    }
}

/// Final result of a session from the receiving player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Win,
    Lose,
    Draw,
    Aborted,
}

/// Messages sent from server to client, one JSON object per line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Paired with an opponent; these are your cards, top first.
    GameStart { session: String, cards: Vec<Card> },
    /// A round was compared.
    RoundResult {
        your_card: Card,
        opponent_card: Card,
        outcome: Outcome,
        your_score: Score,
        opponent_score: Score,
    },
    /// The session ended.
    GameOver {
        result: Verdict,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        forfeit: bool,
    },
}

impl ServerMessage {
    pub fn game_start(session: &str, cards: Vec<Card>) -> Self {
        Self::GameStart {
            session: session.to_string(),
            cards,
        }
    }
    pub fn round_result(
        your_card: Card,
        opponent_card: Card,
        outcome: Outcome,
        your_score: Score,
        opponent_score: Score,
    ) -> Self {
        Self::RoundResult {
            your_card,
            opponent_card,
            outcome,
            your_score,
            opponent_score,
        }
    }
    pub fn game_over(result: Verdict) -> Self {
        Self::GameOver {
            result,
            forfeit: false,
        }
    }
    pub fn forfeit_win() -> Self {
        Self::GameOver {
            result: Verdict::Win,
            forfeit: true,
        }
    }
}

/// Messages sent from client to server, one JSON object per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Opening request to be matched with an opponent.
    WantGame,
    /// Acknowledges the previous message and paces the next round.
    Ready,
}
