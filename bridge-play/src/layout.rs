use bridge_core::{Card, Deal, Position, Rank, Suit};
use bridge_pbn::{format_hands, parse_hands};
use tracing::debug;

use crate::engine::PlayEngine;
use crate::oracle::Oracle;
use crate::render::suit_line;
use crate::PlayError;

const FULL_HAND: usize = 13;

/// Cards placed by [`Layout::auto_fill`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoFill {
    pub player: Position,
    pub cards: Vec<Card>,
}

/// An editable hand layout, possibly incomplete, from before play starts.
///
/// Every edit that places cards also tries [`Layout::auto_fill`], so a
/// layout one seat short of completion fills itself in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    deal: Deal,
    first_seat: Position,
}

impl Layout {
    /// An empty layout, written from North
    pub fn new() -> Self {
        Self {
            deal: Deal::new(),
            first_seat: Position::North,
        }
    }

    /// Read a layout from hand notation; hands may be incomplete
    pub fn from_notation(text: &str) -> Result<Self, PlayError> {
        let parsed = parse_hands(text)?;
        for player in Position::ALL {
            let len = parsed.deal.hand(player).len();
            if len > FULL_HAND {
                return Err(PlayError::HandTooLong { player, len });
            }
        }
        Ok(Self {
            deal: parsed.deal,
            first_seat: parsed.first_seat,
        })
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    /// Give `card` to `player`
    pub fn add(&mut self, card: Card, player: Position) -> Result<Option<AutoFill>, PlayError> {
        match self.deal.holder(card) {
            Some(holder) if holder == player => return Ok(None),
            Some(holder) => {
                return Err(PlayError::CardAlreadyPlaced {
                    card,
                    player: holder,
                })
            }
            None => {}
        }
        self.check_room(player)?;
        let hand = self.deal.hand_mut(player);
        hand.add_card(card);
        hand.sort();
        debug!(%card, %player, "card added to layout");
        Ok(self.auto_fill())
    }

    /// Move `card` from whichever seat holds it to `player`
    pub fn move_card(&mut self, card: Card, player: Position) -> Result<Option<AutoFill>, PlayError> {
        let source = self.deal.holder(card).ok_or(PlayError::CardNotPlaced(card))?;
        if source == player {
            return Ok(None);
        }
        self.check_room(player)?;
        self.deal.hand_mut(source).remove_card(card);
        let hand = self.deal.hand_mut(player);
        hand.add_card(card);
        hand.sort();
        debug!(%card, from = %source, to = %player, "card moved in layout");
        Ok(self.auto_fill())
    }

    /// Take `card` out of the layout, returning the seat that held it
    pub fn remove(&mut self, card: Card) -> Result<Position, PlayError> {
        let holder = self.deal.holder(card).ok_or(PlayError::CardNotPlaced(card))?;
        self.deal.hand_mut(holder).remove_card(card);
        Ok(holder)
    }

    pub fn rotate_clockwise(&mut self) {
        self.deal.rotate_clockwise();
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.deal.rotate_counter_clockwise();
    }

    fn check_room(&self, player: Position) -> Result<(), PlayError> {
        let len = self.deal.hand(player).len();
        if len >= FULL_HAND {
            return Err(PlayError::HandTooLong { player, len });
        }
        Ok(())
    }

    /// Cards in no hand, spades first, high to low
    pub fn missing_cards(&self) -> Vec<Card> {
        let mut missing = Vec::new();
        for &suit in &Suit::DISPLAY_ORDER {
            for &rank in Rank::ALL.iter().rev() {
                let card = Card::new(suit, rank);
                if self.deal.holder(card).is_none() {
                    missing.push(card);
                }
            }
        }
        missing
    }

    /// Place the missing cards when they can only belong to one seat: the
    /// only short seat, short by exactly the number of missing cards
    pub fn auto_fill(&mut self) -> Option<AutoFill> {
        let missing = self.missing_cards();
        if missing.is_empty() {
            return None;
        }
        let short: Vec<(Position, usize)> = Position::ALL
            .iter()
            .map(|&p| (p, FULL_HAND.saturating_sub(self.deal.hand(p).len())))
            .filter(|&(_, need)| need > 0)
            .collect();

        match short.as_slice() {
            [(player, need)] if *need == missing.len() => {
                let hand = self.deal.hand_mut(*player);
                for &card in &missing {
                    hand.add_card(card);
                }
                hand.sort();
                debug!(player = %player, cards = missing.len(), "layout auto-filled");
                Some(AutoFill {
                    player: *player,
                    cards: missing,
                })
            }
            _ => None,
        }
    }

    /// Hand notation, clockwise from the seat the layout was read from
    pub fn to_notation(&self) -> String {
        format_hands(&self.deal, self.first_seat)
    }

    /// Per-seat summary with card counts and the cards still missing
    pub fn preview(&self) -> String {
        let mut lines = vec!["Layout:".to_string()];
        for player in self.first_seat.clockwise() {
            let hand = self.deal.hand(player);
            let suits: Vec<String> = Suit::DISPLAY_ORDER
                .iter()
                .map(|&s| suit_line(hand, s))
                .collect();
            lines.push(format!(
                "{} ({}/{}): {}",
                player,
                hand.len(),
                FULL_HAND,
                suits.join(" ")
            ));
        }
        lines.push(String::new());
        let missing = self.missing_cards();
        if missing.is_empty() {
            lines.push("All cards placed.".to_string());
        } else {
            let cards: Vec<String> = missing.iter().map(|c| c.to_string()).collect();
            lines.push(format!("Missing: {}", cards.join(" ")));
        }
        lines.join("\n")
    }

    /// Start play tracking on this layout
    pub fn into_engine<O: Oracle>(self, oracle: O) -> Result<PlayEngine<O>, PlayError> {
        PlayEngine::new(self.deal, oracle)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DdsOracle;

    const FULL: &str = "N:KQ4.QJ982..AKQ43 J653.A73.985.J97 9.K54.KQT732.652 AT872.T6.AJ64.T8";

    fn card(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn test_auto_fill_single_short_seat() {
        let mut layout = Layout::from_notation(FULL).unwrap();
        layout.remove(card(Suit::Spades, Rank::King)).unwrap();
        layout.remove(card(Suit::Clubs, Rank::Ace)).unwrap();
        assert_eq!(
            layout.missing_cards(),
            vec![card(Suit::Spades, Rank::King), card(Suit::Clubs, Rank::Ace)]
        );

        let filled = layout.auto_fill().unwrap();
        assert_eq!(filled.player, Position::North);
        assert_eq!(filled.cards.len(), 2);
        assert!(layout.missing_cards().is_empty());
        assert_eq!(layout.to_notation(), FULL);
    }

    #[test]
    fn test_no_auto_fill_with_two_short_seats() {
        let mut layout = Layout::from_notation(FULL).unwrap();
        layout.remove(card(Suit::Spades, Rank::King)).unwrap();
        layout.remove(card(Suit::Spades, Rank::Jack)).unwrap();
        assert_eq!(layout.auto_fill(), None);
        assert_eq!(layout.missing_cards().len(), 2);

        // Giving the jack back leaves North as the only short seat
        let filled = layout.add(card(Suit::Spades, Rank::Jack), Position::East).unwrap();
        assert_eq!(
            filled,
            Some(AutoFill {
                player: Position::North,
                cards: vec![card(Suit::Spades, Rank::King)]
            })
        );
    }

    #[test]
    fn test_add_and_move_errors() {
        let mut layout = Layout::from_notation(FULL).unwrap();
        let ace = card(Suit::Spades, Rank::Ace);
        assert_eq!(
            layout.add(ace, Position::North),
            Err(PlayError::CardAlreadyPlaced {
                card: ace,
                player: Position::West
            })
        );
        assert_eq!(
            layout.move_card(ace, Position::North),
            Err(PlayError::HandTooLong {
                player: Position::North,
                len: 13
            })
        );
        layout.remove(ace).unwrap();
        assert_eq!(
            layout.move_card(ace, Position::North),
            Err(PlayError::CardNotPlaced(ace))
        );
    }

    #[test]
    fn test_move_between_short_hands() {
        let mut layout = Layout::from_notation("N:AK... Q... J... T...").unwrap();
        let king = card(Suit::Spades, Rank::King);
        assert_eq!(layout.move_card(king, Position::East).unwrap(), None);
        assert_eq!(layout.deal().hand_sizes(), [1, 2, 1, 1]);
        assert_eq!(layout.to_notation(), "N:A... KQ... J... T...");
    }

    #[test]
    fn test_rotation() {
        let mut layout = Layout::from_notation("N:A... K... Q... J...").unwrap();
        layout.rotate_clockwise();
        assert!(layout.deal().east.has_card(card(Suit::Spades, Rank::Ace)));
        layout.rotate_counter_clockwise();
        layout.rotate_counter_clockwise();
        assert!(layout.deal().west.has_card(card(Suit::Spades, Rank::Ace)));
    }

    #[test]
    fn test_preview_and_engine() {
        let layout = Layout::from_notation("N:A... K... Q... J...").unwrap();
        let preview = layout.preview();
        assert!(preview.starts_with("Layout:\nN (1/13): ♠A ♥– ♦– ♣–\n"));
        assert!(preview.contains("Missing: ♠T ♠9"));

        let engine = layout.into_engine(DdsOracle).unwrap();
        assert_eq!(engine.history().unknown_prehistory(), 12);
    }

    #[test]
    fn test_rejects_overlong_hand() {
        assert!(matches!(
            Layout::from_notation("N:AKQJT98765432.A.. - - -"),
            Err(PlayError::InvalidDealNotation(_))
        ));
        assert_eq!(
            Layout::from_notation("N:AKQJT98765432.A.. ... ... ..."),
            Err(PlayError::HandTooLong {
                player: Position::North,
                len: 14
            })
        );
    }
}
