use bridge_core::{Denomination, Position, Suit};
use bridge_pbn::{parse_denomination, parse_position};
use std::fmt;

use crate::PlayError;

/// What the play needs to know about a contract: the trump suit (if any)
/// and the seat that leads to the first tracked trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub denomination: Denomination,
    pub leader: Position,
}

impl Contract {
    pub fn new(denomination: Denomination, leader: Position) -> Self {
        Self {
            denomination,
            leader,
        }
    }

    /// Parse contract text (`3NT`, `4S`, `h`) and a leading seat
    pub fn parse(contract: &str, leader: &str) -> Result<Self, PlayError> {
        Ok(Self::new(
            parse_denomination(contract)?,
            parse_position(leader)?,
        ))
    }

    pub fn trump(&self) -> Option<Suit> {
        self.denomination.trump()
    }

    /// Declarer sits to the right of the opening leader
    pub fn declarer(&self) -> Position {
        self.leader.previous()
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} on lead", self.denomination.label(), self.leader)
    }
}
