use bridge_core::{Card, Deal, Denomination, Position};
use chrono::{Datelike, Local};

use crate::format_hands;

/// Everything needed to write one played board as a PBN record
#[derive(Debug, Clone)]
pub struct PlayRecord<'a> {
    /// The deal as it stood when tracking began
    pub deal: &'a Deal,
    pub denomination: Option<Denomination>,
    pub opening_leader: Option<Position>,
    /// Tricks in play order; the last one may be incomplete
    pub tricks: Vec<Vec<(Position, Card)>>,
    pub event: Option<&'a str>,
}

/// Format a played board as a PBN record.
///
/// Output includes:
/// - Event, Site and Date tags
/// - Deal string, clockwise from North
/// - Declarer (right-hand opponent of the opening leader) and Contract
/// - Play section, one line per trick, columns clockwise from the
///   opening leader and `-` for cards not yet played
pub fn format_play_record(record: &PlayRecord) -> String {
    let mut result = String::new();

    result.push_str(&format!(
        "[Event \"{}\"]\n",
        record.event.unwrap_or("Play analysis")
    ));
    result.push_str("[Site \"-\"]\n");

    // Current date in PBN format (YYYY.MM.DD)
    let now = Local::now();
    result.push_str(&format!(
        "[Date \"{:04}.{:02}.{:02}\"]\n",
        now.year(),
        now.month(),
        now.day()
    ));

    result.push_str(&format!(
        "[Deal \"{}\"]\n",
        format_hands(record.deal, Position::North)
    ));

    let (denomination, leader) = match (record.denomination, record.opening_leader) {
        (Some(denomination), Some(leader)) => (denomination, leader),
        _ => {
            result.push_str("[Declarer \"\"]\n");
            result.push_str("[Contract \"\"]\n");
            return result;
        }
    };

    result.push_str(&format!("[Declarer \"{}\"]\n", leader.previous().to_char()));
    result.push_str(&format!("[Contract \"{}\"]\n", denomination));
    result.push_str(&format!("[Play \"{}\"]\n", leader.to_char()));

    let columns = leader.clockwise();
    for trick in &record.tricks {
        let cells: Vec<String> = columns
            .iter()
            .map(|&seat| {
                trick
                    .iter()
                    .find(|(player, _)| *player == seat)
                    .map(|(_, card)| format!("{}{}", card.suit.to_char(), card.rank.to_char()))
                    .unwrap_or_else(|| "-".to_string())
            })
            .collect();
        result.push_str(&cells.join(" "));
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_hands;
    use bridge_core::{Rank, Suit};

    #[test]
    fn test_record_with_play_section() {
        let deal = parse_hands("N:A2... K3... Q4... J5...").unwrap().deal;
        let spade = |rank| Card::new(Suit::Spades, rank);
        let record = PlayRecord {
            deal: &deal,
            denomination: Some(Denomination::NoTrump),
            opening_leader: Some(Position::East),
            tricks: vec![
                vec![
                    (Position::East, spade(Rank::King)),
                    (Position::South, spade(Rank::Queen)),
                    (Position::West, spade(Rank::Jack)),
                    (Position::North, spade(Rank::Ace)),
                ],
                vec![(Position::North, spade(Rank::Two))],
            ],
            event: None,
        };

        let text = format_play_record(&record);
        assert!(text.contains("[Deal \"N:A2... K3... Q4... J5...\"]\n"));
        assert!(text.contains("[Declarer \"N\"]\n"));
        assert!(text.contains("[Contract \"NT\"]\n"));
        assert!(text.contains("[Play \"E\"]\nSK SQ SJ SA\n- - - S2\n"));
        assert!(text.lines().any(|l| l.starts_with("[Date \"")));
    }

    #[test]
    fn test_record_without_contract_has_no_play() {
        let deal = parse_hands("N:A... K... Q... J...").unwrap().deal;
        let record = PlayRecord {
            deal: &deal,
            denomination: None,
            opening_leader: None,
            tricks: Vec::new(),
            event: Some("Board 7"),
        };

        let text = format_play_record(&record);
        assert!(text.starts_with("[Event \"Board 7\"]\n"));
        assert!(text.contains("[Contract \"\"]\n"));
        assert!(!text.contains("[Play"));
    }
}
