use bridge_core::{Card, Deal, Hand, Position, Rank, Suit};
use thiserror::Error;

use crate::tokens::parse_position;

/// Error type for notation parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid card notation: {0}")]
    InvalidCardNotation(String),
    #[error("invalid player: {0} (expected one of N/E/S/W)")]
    InvalidPlayer(String),
    #[error("invalid contract format: {0} (expected e.g. 3NT, NT, 4S, S)")]
    InvalidContractFormat(String),
    #[error("invalid hand notation: {0}")]
    InvalidHandNotation(String),
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
}

/// A deal read from hand notation, with the seat the notation started from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbnDeal {
    pub first_seat: Position,
    pub deal: Deal,
}

/// Parse four hands in hand notation.
///
/// Format: `[<Seat>:]<hand> <hand> <hand> <hand>`, each hand being
/// `Spades.Hearts.Diamonds.Clubs` with ranks `AKQJT98765432`. Hands are
/// assigned clockwise from the seat prefix, or from North without one.
/// A void is written as an empty group (or `-`). Hands may hold fewer
/// than 13 cards; equal lengths are checked by the play engine.
pub fn parse_hands(input: &str) -> Result<PbnDeal, ParseError> {
    let trimmed = input.trim();
    let (first_seat, body) = match trimmed.split_once(':') {
        Some((seat, rest)) => (parse_position(seat)?, rest),
        None => (Position::North, trimmed),
    };

    let hands_str: Vec<&str> = body.split_whitespace().collect();
    if hands_str.len() != 4 {
        return Err(ParseError::InvalidHandNotation(format!(
            "expected 4 hands, got {}",
            hands_str.len()
        )));
    }

    let mut deal = Deal::new();
    let mut seen = 0u64;
    for (i, hand_str) in hands_str.into_iter().enumerate() {
        let hand = parse_hand(hand_str)?;
        for card in hand.cards() {
            if seen & card.bit() != 0 {
                return Err(ParseError::DuplicateCard(*card));
            }
            seen |= card.bit();
        }
        *deal.hand_mut(first_seat.rotate(i)) = hand;
    }
    deal.sort_all_hands();

    Ok(PbnDeal { first_seat, deal })
}

/// Format a deal as hand notation, clockwise from `first_seat`
pub fn format_hands(deal: &Deal, first_seat: Position) -> String {
    let hands: Vec<String> = first_seat
        .clockwise()
        .iter()
        .map(|&pos| format_hand(deal.hand(pos)))
        .collect();
    format!("{}:{}", first_seat.to_char(), hands.join(" "))
}

/// Parse a PBN [Deal "..."] tag
pub fn parse_deal_tag(input: &str) -> Result<PbnDeal, ParseError> {
    let trimmed = input.trim();

    let content = trimmed
        .strip_prefix("[Deal \"")
        .and_then(|rest| rest.strip_suffix("\"]"))
        .ok_or_else(|| {
            ParseError::InvalidHandNotation("expected [Deal \"...\"] format".to_string())
        })?;

    parse_hands(content)
}

/// Format a Deal as a PBN [Deal "..."] tag
pub fn format_deal_tag(deal: &Deal, first_seat: Position) -> String {
    format!("[Deal \"{}\"]", format_hands(deal, first_seat))
}

/// Parse a hand in PBN format: Spades.Hearts.Diamonds.Clubs
fn parse_hand(s: &str) -> Result<Hand, ParseError> {
    let suits_str: Vec<&str> = s.split('.').collect();
    if suits_str.len() != 4 {
        return Err(ParseError::InvalidHandNotation(format!(
            "expected 4 suits separated by dots in {:?}, got {}",
            s,
            suits_str.len()
        )));
    }

    let mut hand = Hand::new();
    for (&suit, &suit_str) in Suit::DISPLAY_ORDER.iter().zip(suits_str.iter()) {
        if suit_str == "-" {
            continue;
        }
        let normalized = suit_str.replace("10", "T");
        for c in normalized.chars() {
            let rank = Rank::from_char(c).ok_or_else(|| {
                ParseError::InvalidHandNotation(format!("invalid rank character {:?}", c))
            })?;
            hand.add_card(Card::new(suit, rank));
        }
    }

    Ok(hand)
}

/// Format a hand in PBN format, ranks high to low within each suit
pub fn format_hand(hand: &Hand) -> String {
    let suits: Vec<String> = Suit::DISPLAY_ORDER
        .iter()
        .map(|&suit| {
            hand.cards_in_suit(suit)
                .iter()
                .map(|c| c.rank.to_char())
                .collect()
        })
        .collect();
    suits.join(".")
}
