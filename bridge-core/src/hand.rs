use crate::{Card, Suit};

/// The cards one seat currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Create a new empty hand
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    /// Create a hand from a vector of cards
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Hand { cards }
    }

    /// Add a card to the hand
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove a card, returning false if it was not held
    pub fn remove_card(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Get all cards in the hand
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Get the number of cards in the hand
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the hand is empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Count cards of a specific suit
    pub fn suit_length(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|c| c.suit == suit).count()
    }

    /// Whether the hand still holds any card of `suit`
    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit == suit)
    }

    /// Get all cards of a specific suit, high to low
    pub fn cards_in_suit(&self, suit: Suit) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.suit == suit)
            .copied()
            .collect();
        cards.sort_by(|a, b| b.rank.cmp(&a.rank));
        cards
    }

    /// Check if hand contains a specific card
    pub fn has_card(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Sort the hand by suit (spades first) and rank (high to low)
    pub fn sort(&mut self) {
        self.cards.sort_by_key(|c| c.display_key());
    }

    /// Get a sorted copy of the hand
    pub fn sorted(&self) -> Hand {
        let mut hand = self.clone();
        hand.sort();
        hand
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}
