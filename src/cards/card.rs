use super::rank::Rank;
use super::suit::Suit;
use std::fmt::Display;
use std::fmt::Formatter;

/// An immutable playing card.
///
/// Ordering compares rank first, so a plain `cmp` between two cards
/// decides a War round. Suit only breaks ties for sorting, never for
/// outcomes; use [`Card::beats`] and [`Card::ties`] for game logic.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
    pub fn beats(&self, other: &Self) -> bool {
        self.rank > other.rank
    }
    pub fn ties(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

/// u8 isomorphism
/// each card is mapped to its location in a sorted deck 0-51
/// Ts
/// 35
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        u8::from(c.suit) + u8::from(c.rank) * 4
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4 % 13),
            suit: Suit::from(n % 4),
        }
    }
}

/// str isomorphism
/// rank followed by suit, e.g. "Ts" or "7h"
impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        match s.char_indices().last() {
            Some((i, _)) if i > 0 => Ok(Self {
                rank: Rank::try_from(&s[..i])?,
                suit: Suit::try_from(&s[i..])?,
            }),
            _ => Err(format!("invalid card str: {}", s)),
        }
    }
}
impl TryFrom<String> for Card {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}
impl From<Card> for String {
    fn from(c: Card) -> Self {
        c.to_string()
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_u8() {
        (0..52u8).for_each(|n| assert_eq!(n, u8::from(Card::from(n))));
    }

    #[test]
    fn parses_display() {
        let card = Card::new(Rank::Ten, Suit::S);
        assert_eq!(card.to_string(), "Ts");
        assert_eq!(Card::try_from("Ts"), Ok(card));
        assert_eq!(Card::try_from("10s"), Ok(card));
        assert!(Card::try_from("s").is_err());
        assert!(Card::try_from("").is_err());
    }

    #[test]
    fn suit_never_decides() {
        let a = Card::new(Rank::Seven, Suit::C);
        let b = Card::new(Rank::Seven, Suit::S);
        assert!(a.ties(&b));
        assert!(!a.beats(&b));
        assert!(!b.beats(&a));
    }

    #[test]
    fn serde_as_string() {
        let card = Card::new(Rank::Ace, Suit::H);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"Ah\"");
        assert_eq!(serde_json::from_str::<Card>(&json).unwrap(), card);
    }
}
