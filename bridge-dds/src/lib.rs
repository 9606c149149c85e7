//! Double Dummy Solver for Bridge
//!
//! This crate provides double-dummy analysis for bridge positions: the
//! number of tricks each side can take when all four hands are visible.
//! Positions may be taken at any point of the play: hands of any equal
//! length, with or without a trick in progress.

mod order;
mod search;
mod state;

use bridge_core::{Card, Deal, Denomination, Position, Suit};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use search::{guess_tricks, Search};
use state::GameState;

/// Errors raised for positions the solver cannot analyze
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("hand sizes {0:?} do not fit a position with {1} card(s) played to the current trick")]
    InconsistentHands([usize; 4], usize),
    #[error("a trick in progress cannot hold {0} cards")]
    OverfullTrick(usize),
    #[error("no cards left to play")]
    NothingToPlay,
}

/// Result of double-dummy analysis for a single denomination and declarer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickResult {
    pub denomination: Denomination,
    pub declarer: Position,
    pub tricks: u8,
}

/// Complete double-dummy analysis result for all denominations and declarers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleDummyResult {
    /// Tricks by denomination and declarer
    /// Index: [denomination][declarer]
    tricks: [[u8; 4]; 5],
}

impl DoubleDummyResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self {
            tricks: [[0; 4]; 5],
        }
    }

    /// Set tricks for a specific denomination and declarer
    pub fn set_tricks(&mut self, denomination: Denomination, declarer: Position, tricks: u8) {
        self.tricks[denomination as usize][declarer as usize] = tricks;
    }

    /// Get tricks for a specific denomination and declarer
    pub fn get_tricks(&self, denomination: Denomination, declarer: Position) -> u8 {
        self.tricks[denomination as usize][declarer as usize]
    }

    /// Get all results as a vector of TrickResult
    pub fn all_results(&self) -> Vec<TrickResult> {
        let mut results = Vec::new();
        for denom in Denomination::ALL {
            for position in Position::ALL {
                results.push(TrickResult {
                    denomination: denom,
                    declarer: position,
                    tricks: self.get_tricks(denom, position),
                });
            }
        }
        results
    }
}

impl Default for DoubleDummyResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A position to analyze: the cards still held, the trump suit, and the
/// trick in progress (cards in play order, starting with `leader`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayPosition {
    pub deal: Deal,
    pub trump: Option<Suit>,
    pub leader: Position,
    pub trick: Vec<Card>,
}

impl PlayPosition {
    /// Seat to play next
    pub fn to_play(&self) -> Position {
        self.leader.rotate(self.trick.len())
    }
}

/// Tricks the side on move takes, from the current trick onward, after
/// each of its legal cards. Cards come spades first, high to low.
pub fn analyze(position: &PlayPosition) -> Result<Vec<(Card, u8)>, SolveError> {
    let side = position.to_play().partnership();
    let state = GameState::from_position(position, side)?;
    if state.tricks_left() == 0 {
        return Err(SolveError::NothingToPlay);
    }

    let mut search = Search::new();
    let guess = guess_tricks(&state);
    let grouped = state.grouped_moves();
    let mut values: Vec<u8> = Vec::with_capacity(grouped.len());
    for (idx, &(card, rep)) in grouped.iter().enumerate() {
        let value = if rep == idx {
            let mut child = state;
            let bonus = u8::from(child.play(card) == Some(true));
            bonus + search.exact(&child, guess.saturating_sub(bonus))
        } else {
            values[rep]
        };
        values.push(value);
    }

    debug!(
        to_play = %position.to_play(),
        nodes = search.nodes,
        options = grouped.len(),
        "analyzed position"
    );

    Ok(grouped
        .into_iter()
        .zip(values)
        .filter_map(|((card, _), value)| Card::from_index(card).map(|card| (card, value)))
        .collect())
}

/// Tricks the side on move takes from the current trick onward
pub fn solve_position(position: &PlayPosition) -> Result<u8, SolveError> {
    let state = GameState::from_position(position, position.to_play().partnership())?;
    let mut search = Search::new();
    let tricks = search.exact(&state, guess_tricks(&state));
    debug!(nodes = search.nodes, tricks, "solved position");
    Ok(tricks)
}

/// Solver for double-dummy analysis of a whole deal
pub struct DoubleDummySolver {
    deal: Deal,
}

impl DoubleDummySolver {
    /// Create a new solver for the given deal
    pub fn new(deal: Deal) -> Self {
        Self { deal }
    }

    /// Solve for all denominations and all declarers.
    /// The twenty cells are searched in parallel on the rayon pool.
    pub fn solve_all(&self) -> Result<DoubleDummyResult, SolveError> {
        let cells: Vec<(Denomination, Position)> = Denomination::ALL
            .iter()
            .flat_map(|&denom| Position::ALL.map(|declarer| (denom, declarer)))
            .collect();

        let solved: Vec<(Denomination, Position, u8)> = cells
            .into_par_iter()
            .map(|(denom, declarer)| {
                self.solve(denom, declarer)
                    .map(|tricks| (denom, declarer, tricks))
            })
            .collect::<Result<_, _>>()?;

        let mut result = DoubleDummyResult::new();
        for (denom, declarer, tricks) in solved {
            result.set_tricks(denom, declarer, tricks);
        }
        Ok(result)
    }

    /// Tricks declarer's side takes in `denomination`, with declarer's
    /// left-hand opponent on lead
    pub fn solve(&self, denomination: Denomination, declarer: Position) -> Result<u8, SolveError> {
        let position = PlayPosition {
            deal: self.deal.clone(),
            trump: denomination.trump(),
            leader: declarer.next(),
            trick: Vec::new(),
        };
        let state = GameState::from_position(&position, declarer.partnership())?;
        let mut search = Search::new();
        let tricks = search.exact(&state, guess_tricks(&state));
        debug!(
            denomination = %denomination,
            declarer = %declarer,
            nodes = search.nodes,
            tricks,
            "solved contract"
        );
        Ok(tricks)
    }
}
