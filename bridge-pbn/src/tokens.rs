use bridge_core::{Card, Denomination, Position, Rank, Suit};
use regex::Regex;
use std::sync::OnceLock;

use crate::ParseError;

/// Parse a card token: one rank and one suit in either order, any case.
///
/// Accepts `AS`, `as`, `SA`, `A♠`, `♠A` and `10s` (ten of spades).
/// The emoji variation selector some keyboards append is ignored.
pub fn parse_card(token: &str) -> Result<Card, ParseError> {
    let normalized: Vec<char> = token
        .trim()
        .replace("10", "T")
        .chars()
        .filter(|&c| c != '\u{fe0f}')
        .collect();

    if normalized.len() != 2 {
        return Err(ParseError::InvalidCardNotation(token.to_string()));
    }

    let (a, b) = (normalized[0], normalized[1]);
    let parsed = match (Rank::from_char(a), Suit::from_char(b)) {
        (Some(rank), Some(suit)) => Some(Card::new(suit, rank)),
        _ => match (Suit::from_char(a), Rank::from_char(b)) {
            (Some(suit), Some(rank)) => Some(Card::new(suit, rank)),
            _ => None,
        },
    };

    parsed.ok_or_else(|| ParseError::InvalidCardNotation(token.to_string()))
}

/// Parse whitespace-separated card tokens
pub fn parse_cards(input: &str) -> Result<Vec<Card>, ParseError> {
    input.split_whitespace().map(parse_card).collect()
}

/// Parse a seat: a letter (N/E/S/W) or the full name, any case
pub fn parse_position(s: &str) -> Result<Position, ParseError> {
    let trimmed = s.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "n" | "north" => Ok(Position::North),
        "e" | "east" => Ok(Position::East),
        "s" | "south" => Ok(Position::South),
        "w" | "west" => Ok(Position::West),
        _ => Err(ParseError::InvalidPlayer(trimmed.to_string())),
    }
}

fn contract_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([1-7]?)(NT|N|[SHDC])$").expect("contract pattern is valid")
    })
}

/// Parse contract text into its denomination.
///
/// Accepts `3NT`, `NT`, `4S`, `s`, `7 c`; an optional level 1-7 is
/// validated and then dropped, since only the denomination matters for play.
pub fn parse_denomination(text: &str) -> Result<Denomination, ParseError> {
    let normalized: String = text
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let caps = contract_pattern()
        .captures(&normalized)
        .ok_or_else(|| ParseError::InvalidContractFormat(text.trim().to_string()))?;

    match &caps[2] {
        "NT" | "N" => Ok(Denomination::NoTrump),
        "S" => Ok(Denomination::Spades),
        "H" => Ok(Denomination::Hearts),
        "D" => Ok(Denomination::Diamonds),
        "C" => Ok(Denomination::Clubs),
        _ => Err(ParseError::InvalidContractFormat(text.trim().to_string())),
    }
}
