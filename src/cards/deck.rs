use super::card::Card;
use super::hand::Hand;
use rand::seq::SliceRandom;

/// Supplies the opening deck for every new session.
///
/// Implementations must be shareable across session workers; each call
/// returns a fresh, independently owned deck so no two sessions ever
/// hold the same card values by reference.
pub trait Dealer: Send + Sync {
    fn new_shuffled_deck(&self) -> Vec<Card>;
}

/// Ordered deck of cards. Sequential removal via ::split(), which hands
/// the first half to the first player and the remainder to the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck(Vec<Card>);

impl Deck {
    /// A sorted deck of `n` cards, cycling through as many packs as needed.
    pub fn sorted(n: usize) -> Self {
        Self((0..n).map(|i| Card::from((i % 52) as u8)).collect())
    }
    pub fn shuffled(n: usize) -> Self {
        let mut deck = Self::sorted(n);
        deck.0.shuffle(&mut rand::rng());
        deck
    }
    pub fn size(&self) -> usize {
        self.0.len()
    }
    /// The odd card of an odd-sized deck lands with the second player.
    pub fn split(self) -> (Hand, Hand) {
        let mut cards = self.0;
        let rest = cards.split_off(cards.len() / 2);
        (Hand::from(cards), Hand::from(rest))
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}
impl From<Deck> for Vec<Card> {
    fn from(deck: Deck) -> Self {
        deck.0
    }
}

/// Uniformly shuffled decks of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct Shuffle(usize);

impl Shuffle {
    pub fn new(size: usize) -> Self {
        Self(size)
    }
}

impl Default for Shuffle {
    fn default() -> Self {
        Self(crate::DECK_SIZE)
    }
}

impl Dealer for Shuffle {
    fn new_shuffled_deck(&self) -> Vec<Card> {
        Deck::shuffled(self.0).into()
    }
}

/// The same predetermined deck for every session.
/// Useful for replaying a known game or testing session isolation.
#[derive(Debug, Clone)]
pub struct Stacked(Vec<Card>);

impl Stacked {
    /// Lays out the two opening hands back to back, so that
    /// [`Deck::split`] hands them back unchanged when they are equal length.
    pub fn hands(first: &[Card], second: &[Card]) -> Self {
        Self(first.iter().chain(second.iter()).copied().collect())
    }
}

impl Dealer for Stacked {
    fn new_shuffled_deck(&self) -> Vec<Card> {
        self.0.clone()
    }
}
