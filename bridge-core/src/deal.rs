use crate::{Card, Hand};
use std::fmt;

/// Represents the four positions at a bridge table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Position {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Position {
    /// All positions in clockwise order starting from North
    pub const ALL: [Position; 4] = [
        Position::North,
        Position::East,
        Position::South,
        Position::West,
    ];

    /// Convert from index (0-3)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Position::North),
            1 => Some(Position::East),
            2 => Some(Position::South),
            3 => Some(Position::West),
            _ => None,
        }
    }

    /// Parse a seat letter (N, E, S, W), any case
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Position::North),
            'E' => Some(Position::East),
            'S' => Some(Position::South),
            'W' => Some(Position::West),
            _ => None,
        }
    }

    /// Get position as a character (N, E, S, W)
    pub fn to_char(&self) -> char {
        match self {
            Position::North => 'N',
            Position::East => 'E',
            Position::South => 'S',
            Position::West => 'W',
        }
    }

    /// Get partner position
    pub fn partner(&self) -> Position {
        match self {
            Position::North => Position::South,
            Position::South => Position::North,
            Position::East => Position::West,
            Position::West => Position::East,
        }
    }

    /// Next seat clockwise (left-hand opponent)
    pub fn next(&self) -> Position {
        self.rotate(1)
    }

    /// Previous seat clockwise (right-hand opponent)
    pub fn previous(&self) -> Position {
        self.rotate(3)
    }

    /// Seat `steps` places clockwise from this one
    pub fn rotate(&self, steps: usize) -> Position {
        Position::ALL[(*self as usize + steps) % 4]
    }

    /// The four seats clockwise starting from this one
    pub fn clockwise(&self) -> [Position; 4] {
        [self.rotate(0), self.rotate(1), self.rotate(2), self.rotate(3)]
    }

    pub fn partnership(&self) -> Partnership {
        match self {
            Position::North | Position::South => Partnership::NorthSouth,
            Position::East | Position::West => Partnership::EastWest,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The two sides whose tricks are scored jointly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partnership {
    NorthSouth,
    EastWest,
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partnership::NorthSouth => write!(f, "NS"),
            Partnership::EastWest => write!(f, "EW"),
        }
    }
}

/// Four holdings, one per seat. Hands need not be full: a deal captured
/// part-way through play holds fewer than 13 cards per seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub north: Hand,
    pub east: Hand,
    pub south: Hand,
    pub west: Hand,
}

impl Deal {
    /// Create a new empty deal
    pub fn new() -> Self {
        Deal {
            north: Hand::new(),
            east: Hand::new(),
            south: Hand::new(),
            west: Hand::new(),
        }
    }

    /// Get a reference to a hand by position
    pub fn hand(&self, position: Position) -> &Hand {
        match position {
            Position::North => &self.north,
            Position::East => &self.east,
            Position::South => &self.south,
            Position::West => &self.west,
        }
    }

    /// Get a mutable reference to a hand by position
    pub fn hand_mut(&mut self, position: Position) -> &mut Hand {
        match position {
            Position::North => &mut self.north,
            Position::East => &mut self.east,
            Position::South => &mut self.south,
            Position::West => &mut self.west,
        }
    }

    /// Number of cards held by each seat, indexed N, E, S, W
    pub fn hand_sizes(&self) -> [usize; 4] {
        Position::ALL.map(|p| self.hand(p).len())
    }

    /// Total number of cards still held
    pub fn card_count(&self) -> usize {
        self.hand_sizes().iter().sum()
    }

    /// True once every seat has run out of cards
    pub fn is_empty(&self) -> bool {
        self.card_count() == 0
    }

    /// Seat currently holding `card`, if any
    pub fn holder(&self, card: Card) -> Option<Position> {
        Position::ALL
            .into_iter()
            .find(|&p| self.hand(p).has_card(card))
    }

    /// Every card held, in N, E, S, W order
    pub fn all_cards(&self) -> Vec<Card> {
        Position::ALL
            .iter()
            .flat_map(|&p| self.hand(p).cards().iter().copied())
            .collect()
    }

    /// Move every hand one seat clockwise (N's cards go to E, and so on)
    pub fn rotate_clockwise(&mut self) {
        let old = self.clone();
        for pos in Position::ALL {
            *self.hand_mut(pos.next()) = old.hand(pos).clone();
        }
    }

    /// Move every hand one seat counter-clockwise (N's cards go to W)
    pub fn rotate_counter_clockwise(&mut self) {
        let old = self.clone();
        for pos in Position::ALL {
            *self.hand_mut(pos.previous()) = old.hand(pos).clone();
        }
    }

    /// Sort all hands in the deal
    pub fn sort_all_hands(&mut self) {
        self.north.sort();
        self.east.sort();
        self.south.sort();
        self.west.sort();
    }
}

impl Default for Deal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    fn one_card_deal() -> Deal {
        let mut deal = Deal::new();
        deal.north.add_card(Card::new(Suit::Spades, Rank::Ace));
        deal.east.add_card(Card::new(Suit::Spades, Rank::King));
        deal.south.add_card(Card::new(Suit::Spades, Rank::Queen));
        deal.west.add_card(Card::new(Suit::Spades, Rank::Jack));
        deal
    }

    #[test]
    fn test_partner_positions() {
        assert_eq!(Position::North.partner(), Position::South);
        assert_eq!(Position::South.partner(), Position::North);
        assert_eq!(Position::East.partner(), Position::West);
        assert_eq!(Position::West.partner(), Position::East);
    }

    #[test]
    fn test_clockwise_rotation() {
        assert_eq!(Position::North.next(), Position::East);
        assert_eq!(Position::West.next(), Position::North);
        assert_eq!(Position::North.previous(), Position::West);
        assert_eq!(Position::South.rotate(6), Position::North);
        assert_eq!(
            Position::West.clockwise(),
            [Position::West, Position::North, Position::East, Position::South]
        );
    }

    #[test]
    fn test_partnerships() {
        assert_eq!(Position::North.partnership(), Partnership::NorthSouth);
        assert_eq!(Position::South.partnership(), Partnership::NorthSouth);
        assert_eq!(Position::East.partnership(), Partnership::EastWest);
        assert_eq!(Position::West.partnership(), Partnership::EastWest);
    }

    #[test]
    fn test_holder_and_counts() {
        let deal = one_card_deal();
        assert_eq!(deal.hand_sizes(), [1, 1, 1, 1]);
        assert_eq!(deal.card_count(), 4);
        assert_eq!(
            deal.holder(Card::new(Suit::Spades, Rank::Queen)),
            Some(Position::South)
        );
        assert_eq!(deal.holder(Card::new(Suit::Hearts, Rank::Queen)), None);
    }

    #[test]
    fn test_rotation_round_trip() {
        let original = one_card_deal();
        let mut deal = original.clone();
        deal.rotate_clockwise();
        assert!(deal.east.has_card(Card::new(Suit::Spades, Rank::Ace)));
        assert!(deal.north.has_card(Card::new(Suit::Spades, Rank::Jack)));
        deal.rotate_counter_clockwise();
        assert_eq!(deal, original);
    }
}
