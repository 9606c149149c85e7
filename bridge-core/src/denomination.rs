use crate::Suit;
use std::fmt;

/// A trump suit, or no-trump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denomination {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    NoTrump,
}

impl Denomination {
    /// All five denominations
    pub const ALL: [Denomination; 5] = [
        Denomination::Clubs,
        Denomination::Diamonds,
        Denomination::Hearts,
        Denomination::Spades,
        Denomination::NoTrump,
    ];

    /// Convert from Suit
    pub fn from_suit(suit: Suit) -> Self {
        match suit {
            Suit::Clubs => Denomination::Clubs,
            Suit::Diamonds => Denomination::Diamonds,
            Suit::Hearts => Denomination::Hearts,
            Suit::Spades => Denomination::Spades,
        }
    }

    /// Trump suit (NoTrump returns None)
    pub fn trump(&self) -> Option<Suit> {
        match self {
            Denomination::Clubs => Some(Suit::Clubs),
            Denomination::Diamonds => Some(Suit::Diamonds),
            Denomination::Hearts => Some(Suit::Hearts),
            Denomination::Spades => Some(Suit::Spades),
            Denomination::NoTrump => None,
        }
    }

    /// Convert to character representation
    pub fn to_char(&self) -> char {
        match self {
            Denomination::Clubs => 'C',
            Denomination::Diamonds => 'D',
            Denomination::Hearts => 'H',
            Denomination::Spades => 'S',
            Denomination::NoTrump => 'N',
        }
    }

    /// Short label used in tables: a suit symbol, or "NT"
    pub fn label(&self) -> &'static str {
        match self {
            Denomination::Clubs => "♣",
            Denomination::Diamonds => "♦",
            Denomination::Hearts => "♥",
            Denomination::Spades => "♠",
            Denomination::NoTrump => "NT",
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denomination::NoTrump => write!(f, "NT"),
            suited => write!(f, "{}", suited.to_char()),
        }
    }
}
