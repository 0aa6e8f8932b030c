use super::card::Card;
use std::collections::VecDeque;

/// Hand is an ordered pile of cards, played from the top and
/// replenished from the bottom. Unlike a deck it is never shuffled.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Hand(VecDeque<Card>);

impl Hand {
    pub fn empty() -> Self {
        Self(VecDeque::new())
    }
    pub fn size(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// remove the top card
    pub fn draw(&mut self) -> Option<Card> {
        self.0.pop_front()
    }
    /// place cards face down at the bottom, preserving their order
    pub fn bury<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.0.extend(cards);
    }
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.0.iter()
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards.into())
    }
}
impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.0.into()
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{}", c))
    }
}
