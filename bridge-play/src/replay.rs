//! Rebuilding a deal at an earlier point of the play.
//!
//! The state is never rewound by inverse edits. Instead the original deal
//! is replayed forward through the recorded tricks up to the requested
//! point, using the same take/commit steps as normal play.

use bridge_core::{Deal, Position, Suit};
use tracing::debug;

use crate::history::History;
use crate::state::DealState;
use crate::trick::Trick;
use crate::PlayError;

/// A point in the play: just before card `card` (1-4) of the trick at
/// `trick` (0-based among the recorded tricks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub trick: usize,
    pub card: usize,
}

impl Checkpoint {
    pub fn new(trick: usize, card: usize) -> Self {
        Self { trick, card }
    }
}

/// Tricks played before tracking began, from the starting hand size
pub fn unknown_prehistory(original: &Deal) -> usize {
    13usize.saturating_sub(original.hand_sizes()[0])
}

/// Rebuild the state and history at `checkpoint` from the original deal.
///
/// `tricks` is the full recorded play; only the last entry may be
/// incomplete. Every trick before the target is replayed and committed
/// with its provenance intact, and the first `card - 1` entries of the
/// target are replayed into the open trick.
pub fn replay(
    original: &Deal,
    trump: Option<Suit>,
    first_leader: Position,
    tricks: &[Trick],
    checkpoint: Checkpoint,
) -> Result<(DealState, History), PlayError> {
    if !(1..=4).contains(&checkpoint.card) {
        return Err(PlayError::CardIndexOutOfRange(checkpoint.card));
    }
    let target = tricks
        .get(checkpoint.trick)
        .ok_or(PlayError::TrickIndexOutOfRange(checkpoint.trick))?;
    if checkpoint.card > target.len() + 1 {
        return Err(PlayError::CardIndexOutOfRange(checkpoint.card));
    }

    let mut state = DealState::new(original.clone(), trump, first_leader);
    let mut history = History::new(unknown_prehistory(original));

    for trick in &tricks[..checkpoint.trick] {
        for entry in trick.entries() {
            state.take(entry.player, entry.card)?;
        }
        if let Some(winner) = trick.winner(trump) {
            state.set_leader(winner);
        }
        history.commit(trick.clone());
    }

    if let Some(leader) = target.leader() {
        state.set_leader(leader);
    }
    for entry in target.entries().iter().take(checkpoint.card - 1) {
        state.take(entry.player, entry.card)?;
        history.push_current(*entry);
    }

    debug!(
        trick = checkpoint.trick,
        card = checkpoint.card,
        leader = %state.leader(),
        "replayed to checkpoint"
    );

    Ok((state, history))
}
