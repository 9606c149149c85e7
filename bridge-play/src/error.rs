use bridge_core::{Card, Position, Suit};
use bridge_pbn::ParseError;
use thiserror::Error;

use crate::oracle::OracleError;

/// Everything that can reject an engine operation.
///
/// Every variant is raised before any state changes, so a failed
/// operation leaves the deal exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("invalid card notation: {0}")]
    InvalidCardNotation(String),
    #[error("{player} does not hold {card}")]
    CardNotInHand { card: Card, player: Position },
    #[error("hands must be the same size, got {0:?}")]
    UnequalInitialHandSizes([usize; 4]),
    #[error("card {0} is dealt more than once")]
    DuplicateCard(Card),
    #[error("invalid hand notation: {0}")]
    InvalidDealNotation(String),
    #[error("invalid player: {0} (expected one of N/E/S/W)")]
    InvalidPlayer(String),
    #[error("invalid contract format: {0} (expected e.g. 3NT, NT, 4S, S)")]
    InvalidContractFormat(String),
    #[error("a trick needs exactly 4 cards, got {0}")]
    MalformedTrickInput(usize),
    #[error("{player} must follow {led}")]
    FollowSuitViolation { player: Position, led: Suit },
    #[error("set a contract first")]
    NoContractSet,
    #[error("load a deal first")]
    NoDeal,
    #[error("start a layout first")]
    NoLayout,
    #[error("trick {0} was played before tracking began and cannot be revisited")]
    UnknownTrickReference(usize),
    #[error("trick {0} has not been completed yet")]
    TrickIndexOutOfRange(usize),
    #[error("card position {0} is out of range")]
    CardIndexOutOfRange(usize),
    #[error(transparent)]
    OracleUnavailable(#[from] OracleError),
    #[error("finish the trick in progress first")]
    TrickInProgress,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("no auto-played tricks to abandon")]
    NoPendingPlan,
    #[error("the deal is already complete")]
    DealComplete,
    #[error("{card} is already held by {player}")]
    CardAlreadyPlaced { card: Card, player: Position },
    #[error("{0} is not in any hand")]
    CardNotPlaced(Card),
    #[error("{player} already holds {len} cards")]
    HandTooLong { player: Position, len: usize },
    #[error("unknown command: {0} (try help)")]
    UnknownCommand(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ParseError> for PlayError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidCardNotation(s) => PlayError::InvalidCardNotation(s),
            ParseError::InvalidPlayer(s) => PlayError::InvalidPlayer(s),
            ParseError::InvalidContractFormat(s) => PlayError::InvalidContractFormat(s),
            ParseError::InvalidHandNotation(s) => PlayError::InvalidDealNotation(s),
            ParseError::DuplicateCard(card) => PlayError::DuplicateCard(card),
        }
    }
}
