//! Text views of a deal in play: history, table diagram, trick table,
//! move options and single hands.

use bridge_core::{Card, Deal, Denomination, Hand, Position, Suit};
use bridge_dds::DoubleDummyResult;

use crate::history::History;
use crate::trick::{PlayedCard, Trick};

const CENTRE_WIDTH: usize = 13;
const SIDE_GAP: usize = 3;

/// One suit of a hand: symbol then ranks high to low, `–` when void
pub fn suit_line(hand: &Hand, suit: Suit) -> String {
    let ranks: String = hand
        .cards_in_suit(suit)
        .iter()
        .map(|c| c.rank.to_char())
        .collect();
    if ranks.is_empty() {
        format!("{}–", suit.symbol())
    } else {
        format!("{}{}", suit.symbol(), ranks)
    }
}

/// The hand of `player`, one suit per line
pub fn render_hand(player: Position, hand: &Hand) -> String {
    let mut lines = vec![format!("Hand {}:", player)];
    lines.extend(Suit::DISPLAY_ORDER.iter().map(|&s| suit_line(hand, s)));
    lines.join("\n")
}

fn marked(entry: &PlayedCard, perspective: Option<Position>) -> bool {
    match perspective {
        Some(seat) => entry.player == seat,
        None => entry.is_manual(),
    }
}

/// Numbered play history with a marker line under tricks the user played
/// and the running score.
///
/// Untracked tricks show as `—`. Markers sit under the perspective seat's
/// cards when one is set, otherwise under the user's own cards.
pub fn render_history(
    history: &History,
    trump: Option<Suit>,
    perspective: Option<Position>,
) -> String {
    let mut out = vec![String::new(), "Play history:".to_string()];
    let unknown = history.unknown_prehistory();
    for n in 1..=unknown {
        out.push(format!("{:2}: —", n));
    }

    for (idx, trick) in history.all_tricks().iter().enumerate() {
        out.push(format!("{:2}: {}", unknown + idx + 1, trick));
        if trick.is_manual() {
            let markers: Vec<&str> = trick
                .entries()
                .iter()
                .map(|e| if marked(e, perspective) { "^^^" } else { "   " })
                .collect();
            let line = markers.join("  ");
            let line = line.trim_end();
            if !line.is_empty() {
                out.push(format!("    {}", line));
            }
        }
    }

    out.push(String::new());
    out.push(format!("Score: {}", history.score(trump)));
    out.join("\n")
}

fn arrow(seat: Position) -> char {
    match seat {
        Position::North => '↑',
        Position::East => '→',
        Position::South => '↓',
        Position::West => '←',
    }
}

fn centre_row(seat: Position) -> usize {
    match seat {
        Position::North => 0,
        Position::East => 1,
        Position::West => 2,
        Position::South => 3,
    }
}

fn place(seat: Position, token: &str) -> String {
    match seat {
        Position::West => format!("{:<w$}", token, w = CENTRE_WIDTH),
        Position::East => format!("{:>w$} ", token, w = CENTRE_WIDTH - 1),
        _ => format!("{:^w$}", token, w = CENTRE_WIDTH),
    }
}

/// Table diagram: North on top, West and East either side of the current
/// trick, South below. An arrow marks the seat on move.
///
/// `west_width` fixes the West column so the layout does not shift as
/// cards leave the hand; pass the widest West suit line of the original
/// deal.
pub fn render_table(
    hands: &Deal,
    current: &Trick,
    to_play: Option<Position>,
    west_width: usize,
) -> String {
    let mut centre = vec![" ".repeat(CENTRE_WIDTH); 4];
    for entry in current.entries() {
        let token = match entry.player {
            Position::West => format!("{}{}", arrow(entry.player), entry.card),
            _ => format!("{}{}", entry.card, arrow(entry.player)),
        };
        centre[centre_row(entry.player)] = place(entry.player, &token);
    }
    if let Some(seat) = to_play {
        centre[centre_row(seat)] = place(seat, &arrow(seat).to_string());
    }

    let indent = " ".repeat(west_width + SIDE_GAP + (CENTRE_WIDTH - 3) / 2);
    let gap = " ".repeat(SIDE_GAP);
    let mut lines = Vec::new();

    for &suit in &Suit::DISPLAY_ORDER {
        lines.push(format!("{}{}", indent, suit_line(&hands.north, suit)));
    }
    lines.push(String::new());
    for (row, &suit) in Suit::DISPLAY_ORDER.iter().enumerate() {
        lines.push(format!(
            "{:<w$}{}{}{}{}",
            suit_line(&hands.west, suit),
            gap,
            centre[row],
            gap,
            suit_line(&hands.east, suit),
            w = west_width
        ));
    }
    lines.push(String::new());
    for &suit in &Suit::DISPLAY_ORDER {
        lines.push(format!("{}{}", indent, suit_line(&hands.south, suit)));
    }
    lines.join("\n")
}

/// Widest West suit line of a deal, in characters
pub fn west_width(deal: &Deal) -> usize {
    Suit::DISPLAY_ORDER
        .iter()
        .map(|&s| suit_line(&deal.west, s).chars().count())
        .max()
        .unwrap_or(0)
}

/// Trick table: rows N, S, E, W; columns ♣ ♦ ♥ ♠ NT
pub fn render_dd_table(table: &DoubleDummyResult) -> String {
    let header: Vec<String> = Denomination::ALL
        .iter()
        .map(|d| format!("{:>2}", d.label()))
        .collect();
    let mut lines = vec![format!(" {}", header.join(" "))];

    for seat in [Position::North, Position::South, Position::East, Position::West] {
        let cells: Vec<String> = Denomination::ALL
            .iter()
            .map(|&d| format!("{:>2}", table.get_tricks(d, seat)))
            .collect();
        lines.push(format!("{} {}", seat, cells.join(" ")));
    }
    lines.join("\n")
}

/// Move options grouped by suit (spades first), best cards first
pub fn render_move_options(player: Position, options: &[(Card, u8)]) -> String {
    let mut lines = vec![format!("Options for {}:", player)];
    for &suit in &Suit::DISPLAY_ORDER {
        let mut moves: Vec<(Card, u8)> = options
            .iter()
            .filter(|(c, _)| c.suit == suit)
            .copied()
            .collect();
        if moves.is_empty() {
            continue;
        }
        moves.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.rank.cmp(&a.0.rank)));
        if lines.len() > 1 {
            lines.push(String::new());
        }
        lines.extend(moves.iter().map(|(card, tricks)| format!("{}: {}", card, tricks)));
    }
    lines.join("\n")
}
