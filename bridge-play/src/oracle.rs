use bridge_core::{Card, Deal};
use bridge_dds::{analyze, DoubleDummyResult, DoubleDummySolver, PlayPosition, SolveError};
use thiserror::Error;

/// Failures reported by a double-dummy oracle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Solver(#[from] SolveError),
    #[error("trick table needs 13 cards in every hand, found {0:?}")]
    IncompleteDeal([usize; 4]),
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    #[error("oracle offered no card to play")]
    NoCandidates,
    #[error("oracle chose {0}, which cannot be played now")]
    IllegalCard(Card),
}

/// Double-dummy analysis the engine delegates to.
///
/// Calls block until the analysis is done. The engine never retries a
/// failed call.
pub trait Oracle {
    /// Tricks the side on move takes, from the current trick onward, after
    /// each legal card
    fn move_options(&self, position: &PlayPosition) -> Result<Vec<(Card, u8)>, OracleError>;

    /// Tricks available to each declarer in each denomination
    fn dd_table(&self, deal: &Deal) -> Result<DoubleDummyResult, OracleError>;

    /// The card to play. Ties on trick count go to the lowest rank, then
    /// to the lowest suit (clubs, diamonds, hearts, spades).
    fn best_card(&self, position: &PlayPosition) -> Result<Card, OracleError> {
        let options = self.move_options(position)?;
        let best = options
            .iter()
            .map(|&(_, tricks)| tricks)
            .max()
            .ok_or(OracleError::NoCandidates)?;
        options
            .into_iter()
            .filter(|&(_, tricks)| tricks == best)
            .map(|(card, _)| card)
            .min_by_key(|card| (card.rank, card.suit))
            .ok_or(OracleError::NoCandidates)
    }
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn move_options(&self, position: &PlayPosition) -> Result<Vec<(Card, u8)>, OracleError> {
        (**self).move_options(position)
    }

    fn dd_table(&self, deal: &Deal) -> Result<DoubleDummyResult, OracleError> {
        (**self).dd_table(deal)
    }

    fn best_card(&self, position: &PlayPosition) -> Result<Card, OracleError> {
        (**self).best_card(position)
    }
}

/// Oracle backed by the in-workspace double-dummy solver
#[derive(Debug, Clone, Copy, Default)]
pub struct DdsOracle;

impl Oracle for DdsOracle {
    fn move_options(&self, position: &PlayPosition) -> Result<Vec<(Card, u8)>, OracleError> {
        Ok(analyze(position)?)
    }

    fn dd_table(&self, deal: &Deal) -> Result<DoubleDummyResult, OracleError> {
        let sizes = deal.hand_sizes();
        if sizes.iter().any(|&n| n != 13) {
            return Err(OracleError::IncompleteDeal(sizes));
        }
        Ok(DoubleDummySolver::new(deal.clone()).solve_all()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::{Position, Rank, Suit};
    use bridge_pbn::parse_hands;

    struct Fixed(Vec<(Card, u8)>);

    impl Oracle for Fixed {
        fn move_options(&self, _: &PlayPosition) -> Result<Vec<(Card, u8)>, OracleError> {
            Ok(self.0.clone())
        }

        fn dd_table(&self, _: &Deal) -> Result<DoubleDummyResult, OracleError> {
            Err(OracleError::Unavailable("fixed".to_string()))
        }
    }

    fn position() -> PlayPosition {
        PlayPosition {
            deal: parse_hands("N:A.2.. .A..2 2.3.. ...43").unwrap().deal,
            trump: None,
            leader: Position::North,
            trick: Vec::new(),
        }
    }

    #[test]
    fn test_best_card_tie_break() {
        let oracle = Fixed(vec![
            (Card::new(Suit::Spades, Rank::Three), 2),
            (Card::new(Suit::Hearts, Rank::Three), 2),
            (Card::new(Suit::Hearts, Rank::Two), 1),
            (Card::new(Suit::Clubs, Rank::Four), 2),
        ]);
        assert_eq!(
            oracle.best_card(&position()).unwrap(),
            Card::new(Suit::Hearts, Rank::Three)
        );
        assert_eq!(
            Fixed(Vec::new()).best_card(&position()),
            Err(OracleError::NoCandidates)
        );
    }

    #[test]
    fn test_dds_oracle_best_card() {
        assert_eq!(
            DdsOracle.best_card(&position()).unwrap(),
            Card::new(Suit::Spades, Rank::Ace)
        );
    }

    #[test]
    fn test_dds_oracle_table_needs_full_hands() {
        let deal = parse_hands("N:A.2.. .A..2 2.3.. ...43").unwrap().deal;
        assert_eq!(
            DdsOracle.dd_table(&deal),
            Err(OracleError::IncompleteDeal([2, 2, 2, 2]))
        );
    }
}
