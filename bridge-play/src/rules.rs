//! Follow-suit legality and trick winners.
//!
//! These are pure functions over hands and tricks; the engine calls them
//! both when accepting a play and when replaying recorded tricks.

use bridge_core::{Card, Hand, Position, Suit};

use crate::trick::{PlayedCard, Trick};
use crate::PlayError;

/// Cards a hand may play to a trick led in `led` (or lead, when `None`).
/// Returned spades first, high to low.
pub fn legal_cards(hand: &Hand, led: Option<Suit>) -> Vec<Card> {
    let sorted = hand.sorted();
    match led {
        Some(suit) if hand.has_suit(suit) => sorted
            .cards()
            .iter()
            .filter(|c| c.suit == suit)
            .copied()
            .collect(),
        _ => sorted.cards().to_vec(),
    }
}

/// Legal cards for the player on move
pub fn legal_moves(hand: &Hand, current: &Trick) -> Vec<Card> {
    legal_cards(hand, current.led_suit())
}

/// Seat to play: `played` places clockwise from the trick's leader
pub fn current_player(leader: Position, played: usize) -> Position {
    leader.rotate(played)
}

/// Check that `player` may play `card` from `hand` to a trick led in `led`
pub fn check_play(
    hand: &Hand,
    player: Position,
    card: Card,
    led: Option<Suit>,
) -> Result<(), PlayError> {
    if !hand.has_card(card) {
        return Err(PlayError::CardNotInHand { card, player });
    }
    if let Some(led) = led {
        if card.suit != led && hand.has_suit(led) {
            return Err(PlayError::FollowSuitViolation { player, led });
        }
    }
    Ok(())
}

/// Winner of a trick: trumps beat the led suit, which beats discards;
/// within a band the higher rank wins.
pub fn trick_winner(trick: &[PlayedCard], trump: Option<Suit>) -> Option<Position> {
    let led = trick.first()?.card.suit;
    let band = |card: Card| -> u8 {
        if Some(card.suit) == trump {
            2
        } else if card.suit == led {
            1
        } else {
            0
        }
    };
    trick
        .iter()
        .max_by_key(|entry| (band(entry.card), entry.card.rank))
        .map(|entry| entry.player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Provenance;
    use bridge_core::Rank;

    fn trick(leader: Position, cards: [(Suit, Rank); 4]) -> Vec<PlayedCard> {
        cards
            .iter()
            .enumerate()
            .map(|(i, &(suit, rank))| {
                PlayedCard::new(
                    leader.rotate(i),
                    Card::new(suit, rank),
                    Provenance::UserPlayed,
                )
            })
            .collect()
    }

    #[test]
    fn test_highest_of_led_suit_wins_at_notrump() {
        let t = trick(
            Position::West,
            [
                (Suit::Hearts, Rank::Ten),
                (Suit::Spades, Rank::Ace),
                (Suit::Hearts, Rank::Queen),
                (Suit::Hearts, Rank::Two),
            ],
        );
        assert_eq!(trick_winner(&t, None), Some(Position::East));
    }

    #[test]
    fn test_single_trump_beats_everything() {
        // Trump two against the led ace and a discard
        let t = trick(
            Position::North,
            [
                (Suit::Clubs, Rank::Ace),
                (Suit::Hearts, Rank::Two),
                (Suit::Diamonds, Rank::King),
                (Suit::Clubs, Rank::Five),
            ],
        );
        assert_eq!(trick_winner(&t, Some(Suit::Hearts)), Some(Position::East));
    }

    #[test]
    fn test_higher_trump_overruffs() {
        let t = trick(
            Position::North,
            [
                (Suit::Clubs, Rank::Ace),
                (Suit::Spades, Rank::Two),
                (Suit::Spades, Rank::Nine),
                (Suit::Clubs, Rank::Five),
            ],
        );
        assert_eq!(trick_winner(&t, Some(Suit::Spades)), Some(Position::South));
    }

    #[test]
    fn test_legal_cards_follow_suit() {
        let hand = Hand::from_cards(vec![
            Card::new(Suit::Clubs, Rank::Two),
            Card::new(Suit::Hearts, Rank::King),
            Card::new(Suit::Hearts, Rank::Four),
        ]);
        assert_eq!(
            legal_cards(&hand, Some(Suit::Hearts)),
            vec![
                Card::new(Suit::Hearts, Rank::King),
                Card::new(Suit::Hearts, Rank::Four)
            ]
        );
        assert_eq!(legal_cards(&hand, Some(Suit::Spades)).len(), 3);
        assert_eq!(legal_cards(&hand, None).len(), 3);
    }

    #[test]
    fn test_check_play_errors() {
        let hand = Hand::from_cards(vec![
            Card::new(Suit::Clubs, Rank::Two),
            Card::new(Suit::Hearts, Rank::King),
        ]);
        let ace = Card::new(Suit::Spades, Rank::Ace);
        assert_eq!(
            check_play(&hand, Position::South, ace, None),
            Err(PlayError::CardNotInHand {
                card: ace,
                player: Position::South
            })
        );
        assert_eq!(
            check_play(
                &hand,
                Position::South,
                Card::new(Suit::Clubs, Rank::Two),
                Some(Suit::Hearts)
            ),
            Err(PlayError::FollowSuitViolation {
                player: Position::South,
                led: Suit::Hearts
            })
        );
        assert!(check_play(
            &hand,
            Position::South,
            Card::new(Suit::Clubs, Rank::Two),
            Some(Suit::Diamonds)
        )
        .is_ok());
    }

    #[test]
    fn test_current_player_rotates() {
        assert_eq!(current_player(Position::West, 0), Position::West);
        assert_eq!(current_player(Position::West, 3), Position::South);
    }
}
