use bridge_core::{Card, Deal, Position};
use bridge_dds::{DoubleDummyResult, PlayPosition};
use bridge_pbn::{format_play_record, parse_card, parse_cards, parse_hands, PlayRecord};
use std::fmt;
use tracing::{debug, info, warn};

use crate::contract::Contract;
use crate::history::{History, Score};
use crate::oracle::{Oracle, OracleError};
use crate::replay::{replay, unknown_prehistory, Checkpoint};
use crate::rules::{check_play, current_player, legal_moves};
use crate::state::DealState;
use crate::trick::{PlayedCard, Provenance, Trick};
use crate::PlayError;

/// A trick that has just been completed, with the seat that won it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTrick {
    pub trick: Trick,
    pub winner: Position,
}

/// Result of playing one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    pub played: PlayedCard,
    /// Set when the card was the fourth of its trick
    pub completed: Option<CompletedTrick>,
}

impl fmt::Display for PlayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.played)?;
        if let Some(done) = &self.completed {
            write!(f, ", trick won by {}", done.winner)?;
        }
        Ok(())
    }
}

/// Play tracking for a single deal.
///
/// The engine owns the deal as it stood when tracking began, the live
/// state, and the play record. Every mutation either fully succeeds or
/// leaves all three untouched.
pub struct PlayEngine<O> {
    original: Deal,
    contract: Option<Contract>,
    state: DealState,
    history: History,
    perspective: Option<Position>,
    oracle: O,
}

impl<O: Oracle> PlayEngine<O> {
    /// Start tracking a deal. All four hands must hold the same number of
    /// cards; fewer than 13 means tricks were played before tracking began.
    pub fn new(mut deal: Deal, oracle: O) -> Result<Self, PlayError> {
        let sizes = deal.hand_sizes();
        if sizes.iter().any(|&n| n != sizes[0]) {
            return Err(PlayError::UnequalInitialHandSizes(sizes));
        }
        let mut seen = 0u64;
        for card in deal.all_cards() {
            if seen & card.bit() != 0 {
                return Err(PlayError::DuplicateCard(card));
            }
            seen |= card.bit();
        }
        deal.sort_all_hands();

        debug!(cards_per_hand = sizes[0], "deal accepted");
        Ok(Self {
            state: DealState::new(deal.clone(), None, Position::North),
            history: History::new(unknown_prehistory(&deal)),
            original: deal,
            contract: None,
            perspective: None,
            oracle,
        })
    }

    /// Start tracking a deal given in hand notation
    pub fn from_notation(notation: &str, oracle: O) -> Result<Self, PlayError> {
        Self::new(parse_hands(notation)?.deal, oracle)
    }

    /// Seat whose plays the history marks
    pub fn with_perspective(mut self, seat: Option<Position>) -> Self {
        self.perspective = seat;
        self
    }

    pub fn set_perspective(&mut self, seat: Option<Position>) {
        self.perspective = seat;
    }

    pub fn perspective(&self) -> Option<Position> {
        self.perspective
    }

    /// The deal as it stood when tracking began
    pub fn original(&self) -> &Deal {
        &self.original
    }

    pub fn contract(&self) -> Option<Contract> {
        self.contract
    }

    pub fn state(&self) -> &DealState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Fix trump and the opening leader, restarting the play from the
    /// original deal
    pub fn set_contract(&mut self, contract: Contract) {
        self.state = DealState::new(self.original.clone(), contract.trump(), contract.leader);
        self.history = History::new(unknown_prehistory(&self.original));
        self.contract = Some(contract);
        info!(%contract, "contract set");
    }

    fn require_contract(&self) -> Result<Contract, PlayError> {
        self.contract.ok_or(PlayError::NoContractSet)
    }

    pub fn current_player(&self) -> Result<Position, PlayError> {
        self.require_contract()?;
        Ok(current_player(
            self.state.leader(),
            self.history.current().len(),
        ))
    }

    pub fn legal_moves(&self) -> Result<Vec<Card>, PlayError> {
        let player = self.current_player()?;
        Ok(legal_moves(
            self.state.hands().hand(player),
            self.history.current(),
        ))
    }

    /// Tricks won so far by each side, pending ones included
    pub fn score(&self) -> Score {
        self.history.score(self.state.trump())
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Trick number as shown to users, counting untracked tricks
    pub fn trick_number(&self, index: usize) -> usize {
        self.history.unknown_prehistory() + index + 1
    }

    fn check_next(&self, card: Card) -> Result<Position, PlayError> {
        let player = self.current_player()?;
        if self.state.is_exhausted() {
            return Err(PlayError::DealComplete);
        }
        check_play(
            self.state.hands().hand(player),
            player,
            card,
            self.history.current().led_suit(),
        )?;
        Ok(player)
    }

    fn flush_pending(&mut self) {
        let moved = self.history.flush_pending();
        if moved > 0 {
            debug!(tricks = moved, "pending auto-play committed");
        }
    }

    fn apply(
        &mut self,
        player: Position,
        card: Card,
        provenance: Provenance,
    ) -> Result<PlayOutcome, PlayError> {
        self.state.take(player, card)?;
        let played = PlayedCard::new(player, card, provenance);
        self.history.push_current(played);
        debug!(%played, ?provenance, "card played");

        let mut completed = None;
        if self.history.current().is_complete() {
            let trick = self.history.take_current();
            if let Some(winner) = trick.winner(self.state.trump()) {
                self.state.set_leader(winner);
                debug!(%trick, %winner, "trick completed");
                completed = Some(CompletedTrick {
                    trick: trick.clone(),
                    winner,
                });
            }
            match provenance {
                Provenance::UserPlayed => self.history.commit(trick),
                Provenance::EnginePlayed => self.history.push_pending(trick),
            }
        }

        Ok(PlayOutcome { played, completed })
    }

    /// Play one card for the seat on move
    pub fn play_card(&mut self, card: Card) -> Result<PlayOutcome, PlayError> {
        let player = self.check_next(card)?;
        self.flush_pending();
        self.apply(player, card, Provenance::UserPlayed)
    }

    /// Play one card given as a token such as `AS` or `♠A`
    pub fn play_token(&mut self, token: &str) -> Result<PlayOutcome, PlayError> {
        self.play_card(parse_card(token)?)
    }

    /// Play a whole trick, cards in order clockwise from the leader
    pub fn play_trick(&mut self, cards: &[Card]) -> Result<CompletedTrick, PlayError> {
        self.require_contract()?;
        if cards.len() != 4 {
            return Err(PlayError::MalformedTrickInput(cards.len()));
        }
        if !self.history.current().is_empty() {
            return Err(PlayError::TrickInProgress);
        }
        if self.state.is_exhausted() {
            return Err(PlayError::DealComplete);
        }

        let leader = self.state.leader();
        let led = cards[0].suit;
        for (offset, &card) in cards.iter().enumerate() {
            let seat = leader.rotate(offset);
            check_play(
                self.state.hands().hand(seat),
                seat,
                card,
                (offset > 0).then_some(led),
            )?;
        }

        self.flush_pending();
        let mut last = None;
        for (offset, &card) in cards.iter().enumerate() {
            last = Some(self.apply(leader.rotate(offset), card, Provenance::UserPlayed)?);
        }
        last.and_then(|outcome| outcome.completed)
            .ok_or(PlayError::MalformedTrickInput(cards.len()))
    }

    /// Play a whole trick given as four whitespace-separated tokens
    pub fn play_trick_tokens(&mut self, tokens: &str) -> Result<CompletedTrick, PlayError> {
        let count = tokens.split_whitespace().count();
        if count != 4 {
            return Err(PlayError::MalformedTrickInput(count));
        }
        self.play_trick(&parse_cards(tokens)?)
    }

    /// Take back the last card played, whichever trick it belongs to
    pub fn undo_last_card(&mut self) -> Result<PlayedCard, PlayError> {
        self.require_contract()?;
        if let Some(entry) = self.history.pop_current() {
            self.state.restore(entry.player, entry.card);
            debug!(%entry, "card taken back");
            return Ok(entry);
        }

        let trick = self
            .history
            .pop_complete()
            .ok_or(PlayError::NothingToUndo)?;
        for entry in trick.entries().iter().rev() {
            self.state.restore(entry.player, entry.card);
        }
        if let Some(leader) = trick.leader() {
            self.state.set_leader(leader);
        }

        let (last, reopened) = trick
            .entries()
            .split_last()
            .ok_or(PlayError::NothingToUndo)?;
        for entry in reopened {
            self.state.take(entry.player, entry.card)?;
            self.history.push_current(*entry);
        }
        debug!(entry = %last, "card taken back, trick reopened");
        Ok(*last)
    }

    /// Take back the last complete trick; only between tricks
    pub fn undo_last_trick(&mut self) -> Result<Trick, PlayError> {
        self.require_contract()?;
        if !self.history.current().is_empty() {
            return Err(PlayError::TrickInProgress);
        }
        let trick = self
            .history
            .pop_complete()
            .ok_or(PlayError::NothingToUndo)?;
        for entry in trick.entries().iter().rev() {
            self.state.restore(entry.player, entry.card);
        }
        if let Some(leader) = trick.leader() {
            self.state.set_leader(leader);
        }
        debug!(%trick, "trick taken back");
        Ok(trick)
    }

    /// Rewind to just before card `card_no` (1-4) of trick `trick_no`.
    /// Tricks are numbered as in the history view, untracked ones
    /// included; only complete tricks can be targeted.
    pub fn goto_checkpoint(&mut self, trick_no: usize, card_no: usize) -> Result<(), PlayError> {
        let contract = self.require_contract()?;
        if !(1..=4).contains(&card_no) {
            return Err(PlayError::CardIndexOutOfRange(card_no));
        }
        let unknown = self.history.unknown_prehistory();
        if trick_no <= unknown {
            return Err(PlayError::UnknownTrickReference(trick_no));
        }
        let tricks: Vec<Trick> = self.history.complete_tricks().cloned().collect();
        let idx = trick_no - unknown - 1;
        if idx >= tricks.len() {
            return Err(PlayError::TrickIndexOutOfRange(trick_no));
        }

        let (state, history) = replay(
            &self.original,
            contract.trump(),
            contract.leader,
            &tricks,
            Checkpoint::new(idx, card_no),
        )?;
        self.state = state;
        self.history = history;
        debug!(trick_no, card_no, "moved to checkpoint");
        Ok(())
    }

    /// Rewind to the start of trick `trick_no`
    pub fn goto_trick(&mut self, trick_no: usize) -> Result<(), PlayError> {
        self.goto_checkpoint(trick_no, 1)
    }

    /// Discard the tricks of the last auto-play request as a block,
    /// returning how many complete tricks were dropped
    pub fn abandon_auto_plan(&mut self) -> Result<usize, PlayError> {
        let contract = self.require_contract()?;
        let discarded = self.history.pending().len();
        if discarded == 0 {
            return Err(PlayError::NoPendingPlan);
        }

        let checkpoint = Checkpoint::new(
            self.history.committed().len(),
            self.history.plan_offset() + 1,
        );
        let (state, history) = replay(
            &self.original,
            contract.trump(),
            contract.leader,
            &self.history.all_tricks(),
            checkpoint,
        )?;
        self.state = state;
        self.history = history;
        info!(tricks = discarded, "auto-play abandoned");
        Ok(discarded)
    }

    fn position(&self) -> PlayPosition {
        PlayPosition {
            deal: self.state.hands().clone(),
            trump: self.state.trump(),
            leader: self.state.leader(),
            trick: self.history.current().cards(),
        }
    }

    fn ready_for_oracle(&self) -> Result<PlayPosition, PlayError> {
        self.require_contract()?;
        if self.state.is_exhausted() {
            return Err(PlayError::DealComplete);
        }
        Ok(self.position())
    }

    /// The card the oracle would play, without playing it
    pub fn optimal_move(&self) -> Result<Card, PlayError> {
        self.ready_for_oracle()?;
        self.oracle_choice().map(|(_, card)| card)
    }

    /// Tricks the side on move takes after each legal card
    pub fn move_options(&self) -> Result<Vec<(Card, u8)>, PlayError> {
        let position = self.ready_for_oracle()?;
        from_oracle(self.oracle.move_options(&position))
    }

    /// Trick table of the original deal
    pub fn dd_table(&self) -> Result<DoubleDummyResult, PlayError> {
        from_oracle(self.oracle.dd_table(&self.original))
    }

    fn start_auto(&mut self) -> Result<(), PlayError> {
        self.ready_for_oracle()?;
        self.flush_pending();
        self.history.begin_plan();
        Ok(())
    }

    /// The oracle's card and the seat it is for, checked against the rules
    fn oracle_choice(&self) -> Result<(Position, Card), PlayError> {
        let card = from_oracle(self.oracle.best_card(&self.position()))?;
        let player = self.check_next(card).map_err(|err| {
            warn!(%card, %err, "oracle chose an unplayable card");
            PlayError::OracleUnavailable(OracleError::IllegalCard(card))
        })?;
        Ok((player, card))
    }

    fn auto_step(&mut self) -> Result<PlayOutcome, PlayError> {
        let (player, card) = self.oracle_choice()?;
        self.apply(player, card, Provenance::EnginePlayed)
    }

    fn auto_trick(&mut self) -> Result<CompletedTrick, PlayError> {
        loop {
            if let Some(done) = self.auto_step()?.completed {
                return Ok(done);
            }
        }
    }

    /// Play the oracle's card for the seat on move
    pub fn play_optimal_card(&mut self) -> Result<PlayOutcome, PlayError> {
        self.start_auto()?;
        self.auto_step()
    }

    /// Play oracle cards until the current trick is complete
    pub fn play_optimal_trick(&mut self) -> Result<CompletedTrick, PlayError> {
        self.start_auto()?;
        self.auto_trick()
    }

    /// Play up to `n` tricks with oracle cards, stopping early when the
    /// hands run out
    pub fn play_optimal_tricks(&mut self, n: usize) -> Result<Vec<CompletedTrick>, PlayError> {
        self.start_auto()?;
        let mut done = Vec::with_capacity(n);
        while done.len() < n && !self.state.is_exhausted() {
            done.push(self.auto_trick()?);
        }
        info!(tricks = done.len(), "auto-played tricks");
        Ok(done)
    }

    /// Play the rest of the deal with oracle cards
    pub fn play_to_end(&mut self) -> Result<Vec<CompletedTrick>, PlayError> {
        self.start_auto()?;
        let mut done = Vec::new();
        while !self.state.is_exhausted() {
            done.push(self.auto_trick()?);
        }
        info!(tricks = done.len(), "auto-played to the end");
        Ok(done)
    }

    /// The original deal and the play so far as a PBN record
    pub fn export_pbn(&self, event: Option<&str>) -> String {
        let tricks = self
            .history
            .all_tricks()
            .iter()
            .map(|trick| {
                trick
                    .entries()
                    .iter()
                    .map(|entry| (entry.player, entry.card))
                    .collect()
            })
            .collect();
        format_play_record(&PlayRecord {
            deal: &self.original,
            denomination: self.contract.map(|c| c.denomination),
            opening_leader: self.contract.map(|c| c.leader),
            tricks,
            event,
        })
    }
}

fn from_oracle<T>(result: Result<T, OracleError>) -> Result<T, PlayError> {
    result.map_err(|err| {
        warn!(%err, "oracle call failed");
        PlayError::from(err)
    })
}
