//! Card-play tracking for a single bridge deal.
//!
//! A [`PlayEngine`] takes four equal hands and a contract, then follows the
//! play card by card: it checks follow-suit, decides trick winners, keeps a
//! history tagged with who chose each card, and can undo or rewind to any
//! earlier point by replaying the original deal. A double-dummy [`Oracle`]
//! supplies best cards on request.

pub mod command;
mod contract;
mod engine;
mod error;
mod history;
mod layout;
mod oracle;
pub mod render;
mod replay;
pub mod rules;
mod state;
mod trick;

pub use command::{Command, Session};
pub use contract::Contract;
pub use engine::{CompletedTrick, PlayEngine, PlayOutcome};
pub use error::PlayError;
pub use history::{History, Score};
pub use layout::{AutoFill, Layout};
pub use oracle::{DdsOracle, Oracle, OracleError};
pub use replay::{replay, unknown_prehistory, Checkpoint};
pub use state::DealState;
pub use trick::{PlayedCard, Provenance, Trick};

pub use bridge_dds::{DoubleDummyResult, PlayPosition};
