use bridge_core::{Partnership, Suit};
use std::fmt;

use crate::trick::{PlayedCard, Trick};

/// Tricks won by each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub ns: usize,
    pub ew: usize,
}

impl Score {
    pub fn total(&self) -> usize {
        self.ns + self.ew
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NS – {}, EW – {}", self.ns, self.ew)
    }
}

/// The play record of one deal.
///
/// Complete tricks are either committed or pending. Pending tricks come
/// from the most recent auto-play request and always follow the committed
/// ones; they stay provisional until the next action flushes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    committed: Vec<Trick>,
    pending: Vec<Trick>,
    current: Trick,
    /// Cards already on the table when the pending plan started
    plan_offset: usize,
    /// Tricks played before tracking began
    unknown: usize,
}

impl History {
    pub fn new(unknown: usize) -> Self {
        Self {
            unknown,
            ..Self::default()
        }
    }

    pub fn committed(&self) -> &[Trick] {
        &self.committed
    }

    pub fn pending(&self) -> &[Trick] {
        &self.pending
    }

    /// The trick in progress (empty between tricks)
    pub fn current(&self) -> &Trick {
        &self.current
    }

    pub fn unknown_prehistory(&self) -> usize {
        self.unknown
    }

    pub fn plan_offset(&self) -> usize {
        self.plan_offset
    }

    /// Complete tricks, committed then pending
    pub fn complete_tricks(&self) -> impl Iterator<Item = &Trick> {
        self.committed.iter().chain(self.pending.iter())
    }

    pub fn completed_count(&self) -> usize {
        self.committed.len() + self.pending.len()
    }

    /// Every known trick in order, the one in progress last if started
    pub fn all_tricks(&self) -> Vec<Trick> {
        let mut tricks: Vec<Trick> = self.complete_tricks().cloned().collect();
        if !self.current.is_empty() {
            tricks.push(self.current.clone());
        }
        tricks
    }

    pub fn score(&self, trump: Option<Suit>) -> Score {
        let mut score = Score::default();
        for trick in self.complete_tricks() {
            match trick.winner(trump).map(|p| p.partnership()) {
                Some(Partnership::NorthSouth) => score.ns += 1,
                Some(Partnership::EastWest) => score.ew += 1,
                None => {}
            }
        }
        score
    }

    /// Move every pending trick into committed history.
    /// Returns how many were moved.
    pub(crate) fn flush_pending(&mut self) -> usize {
        let moved = self.pending.len();
        self.committed.append(&mut self.pending);
        self.plan_offset = 0;
        moved
    }

    /// Start a new pending plan from the current table
    pub(crate) fn begin_plan(&mut self) {
        if self.pending.is_empty() {
            self.plan_offset = self.current.len();
        }
    }

    pub(crate) fn push_current(&mut self, entry: PlayedCard) {
        self.current.push(entry);
    }

    pub(crate) fn pop_current(&mut self) -> Option<PlayedCard> {
        self.current.pop()
    }

    pub(crate) fn take_current(&mut self) -> Trick {
        std::mem::take(&mut self.current)
    }

    pub(crate) fn commit(&mut self, trick: Trick) {
        self.committed.push(trick);
    }

    pub(crate) fn push_pending(&mut self, trick: Trick) {
        self.pending.push(trick);
    }

    /// Remove the most recent complete trick, pending ones first
    pub(crate) fn pop_complete(&mut self) -> Option<Trick> {
        self.pending.pop().or_else(|| self.committed.pop())
    }
}
