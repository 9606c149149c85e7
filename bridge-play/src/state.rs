use bridge_core::{Card, Deal, Position, Suit};

use crate::PlayError;

/// The live holdings of one deal, the cards already played from them and
/// the seat leading the current trick.
///
/// Cards only ever move between a hand and the played list, so the union
/// of both stays equal to the deal the state was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealState {
    hands: Deal,
    played: Vec<Card>,
    leader: Position,
    trump: Option<Suit>,
}

impl DealState {
    pub fn new(deal: Deal, trump: Option<Suit>, leader: Position) -> Self {
        Self {
            hands: deal,
            played: Vec::new(),
            leader,
            trump,
        }
    }

    pub fn hands(&self) -> &Deal {
        &self.hands
    }

    /// Cards played since tracking began, in play order
    pub fn played(&self) -> &[Card] {
        &self.played
    }

    pub fn leader(&self) -> Position {
        self.leader
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub(crate) fn set_leader(&mut self, leader: Position) {
        self.leader = leader;
    }

    /// Cards still held by each seat
    pub fn cards_left(&self) -> usize {
        self.hands.card_count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.hands.is_empty()
    }

    /// Move `card` from `player`'s hand to the played list
    pub(crate) fn take(&mut self, player: Position, card: Card) -> Result<(), PlayError> {
        if !self.hands.hand_mut(player).remove_card(card) {
            return Err(PlayError::CardNotInHand { card, player });
        }
        self.played.push(card);
        Ok(())
    }

    /// Return a played card to `player`'s hand
    pub(crate) fn restore(&mut self, player: Position, card: Card) {
        if let Some(idx) = self.played.iter().rposition(|&c| c == card) {
            self.played.remove(idx);
        }
        let hand = self.hands.hand_mut(player);
        if !hand.has_card(card) {
            hand.add_card(card);
            hand.sort();
        }
    }

    /// Bit set of every card the state accounts for, held or played
    pub fn card_universe(&self) -> u64 {
        self.hands
            .all_cards()
            .iter()
            .chain(self.played.iter())
            .fold(0u64, |acc, card| acc | card.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::{Hand, Rank};

    #[test]
    fn test_take_and_restore_keep_universe() {
        let ace = Card::new(Suit::Spades, Rank::Ace);
        let mut deal = Deal::new();
        deal.north = Hand::from_cards(vec![ace, Card::new(Suit::Hearts, Rank::Two)]);
        let mut state = DealState::new(deal, None, Position::North);
        let universe = state.card_universe();

        state.take(Position::North, ace).unwrap();
        assert_eq!(state.played(), &[ace]);
        assert!(!state.hands().north.has_card(ace));
        assert_eq!(state.card_universe(), universe);

        assert_eq!(
            state.take(Position::North, ace),
            Err(PlayError::CardNotInHand {
                card: ace,
                player: Position::North
            })
        );

        state.restore(Position::North, ace);
        assert!(state.played().is_empty());
        assert_eq!(state.hands().north.cards()[0], ace);
        assert_eq!(state.card_universe(), universe);
    }
}
