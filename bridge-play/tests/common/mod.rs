#![allow(dead_code)]

use bridge_core::{Card, Deal};
use bridge_play::rules::legal_cards;
use bridge_play::{DoubleDummyResult, Oracle, OracleError, PlayPosition};
use std::cell::Cell;

/// Offers every legal card at the same value, so the lowest one is chosen
#[derive(Debug, Clone, Copy, Default)]
pub struct Lowest;

impl Oracle for Lowest {
    fn move_options(&self, position: &PlayPosition) -> Result<Vec<(Card, u8)>, OracleError> {
        let hand = position.deal.hand(position.to_play());
        let led = position.trick.first().map(|c| c.suit);
        Ok(legal_cards(hand, led).into_iter().map(|c| (c, 0)).collect())
    }

    fn dd_table(&self, _: &Deal) -> Result<DoubleDummyResult, OracleError> {
        Err(OracleError::Unavailable("no trick table".to_string()))
    }
}

/// Always fails, like a solver service that is down
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Oracle for Offline {
    fn move_options(&self, _: &PlayPosition) -> Result<Vec<(Card, u8)>, OracleError> {
        Err(OracleError::Unavailable("solver offline".to_string()))
    }

    fn dd_table(&self, _: &Deal) -> Result<DoubleDummyResult, OracleError> {
        Err(OracleError::Unavailable("solver offline".to_string()))
    }
}

/// Answers `budget` calls like [`Lowest`], then fails
#[derive(Debug, Default)]
pub struct Flaky {
    pub budget: Cell<usize>,
}

impl Oracle for Flaky {
    fn move_options(&self, position: &PlayPosition) -> Result<Vec<(Card, u8)>, OracleError> {
        let left = self.budget.get();
        if left == 0 {
            return Err(OracleError::Unavailable("timed out".to_string()));
        }
        self.budget.set(left - 1);
        Lowest.move_options(position)
    }

    fn dd_table(&self, deal: &Deal) -> Result<DoubleDummyResult, OracleError> {
        Lowest.dd_table(deal)
    }
}

/// Offers the cards of the seat after the one on move, as a misbehaving
/// solver might
#[derive(Debug, Clone, Copy, Default)]
pub struct WrongSeat;

impl Oracle for WrongSeat {
    fn move_options(&self, position: &PlayPosition) -> Result<Vec<(Card, u8)>, OracleError> {
        let hand = position.deal.hand(position.to_play().next());
        Ok(hand.cards().iter().map(|&c| (c, 1)).collect())
    }

    fn dd_table(&self, _: &Deal) -> Result<DoubleDummyResult, OracleError> {
        Err(OracleError::Unavailable("no trick table".to_string()))
    }
}

/// Each seat holds one full suit: N spades, E hearts, S diamonds, W clubs
pub const ONE_SUIT_EACH: &str =
    "N:AKQJT98765432... .AKQJT98765432.. ..AKQJT98765432. ...AKQJT98765432";

/// N: ♠AK  E: ♠QJ  S: ♠32  W: ♥32
pub const TWO_CARD: &str = "N:AK... QJ... 32... .32..";
