use bridge_core::{Card, Position, Suit};
use std::fmt;

use crate::rules::trick_winner;

/// Who chose a played card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    UserPlayed,
    EnginePlayed,
}

/// One card on the table, tagged with the seat that played it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedCard {
    pub player: Position,
    pub card: Card,
    pub provenance: Provenance,
}

impl PlayedCard {
    pub fn new(player: Position, card: Card, provenance: Provenance) -> Self {
        Self {
            player,
            card,
            provenance,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.provenance == Provenance::UserPlayed
    }
}

impl fmt::Display for PlayedCard {
    /// Seat then card, e.g. "N♥8"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.player, self.card)
    }
}

/// Up to four cards in play order; complete at four
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trick {
    entries: Vec<PlayedCard>,
}

impl Trick {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(4),
        }
    }

    pub fn from_entries(entries: Vec<PlayedCard>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PlayedCard] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() == 4
    }

    /// Seat that played the first card
    pub fn leader(&self) -> Option<Position> {
        self.entries.first().map(|e| e.player)
    }

    pub fn led_suit(&self) -> Option<Suit> {
        self.entries.first().map(|e| e.card.suit)
    }

    /// True when the user chose at least one of the cards
    pub fn is_manual(&self) -> bool {
        self.entries.iter().any(PlayedCard::is_manual)
    }

    pub fn cards(&self) -> Vec<Card> {
        self.entries.iter().map(|e| e.card).collect()
    }

    pub(crate) fn push(&mut self, entry: PlayedCard) {
        self.entries.push(entry);
    }

    pub(crate) fn pop(&mut self) -> Option<PlayedCard> {
        self.entries.pop()
    }

    /// Winner of a complete trick
    pub fn winner(&self, trump: Option<Suit>) -> Option<Position> {
        if !self.is_complete() {
            return None;
        }
        trick_winner(&self.entries, trump)
    }
}

impl fmt::Display for Trick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.entries.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("  "))
    }
}
