//! Bitboard position used by the search.
//!
//! A card is the bit `suit * 13 + (rank - 2)` of a `u64`, with suits in
//! the order clubs, diamonds, hearts, spades. Seats are indexed N, E, S, W,
//! so `seat % 2` is the partnership (0 for North-South).

use bridge_core::{Card, Partnership, Position};

use crate::{PlayPosition, SolveError};

pub(crate) type Cards = u64;

const SUIT_BITS: Cards = 0x1FFF;

#[inline]
pub(crate) fn bit(card: u8) -> Cards {
    1u64 << card
}

#[inline]
pub(crate) fn suit_of(card: u8) -> usize {
    card as usize / 13
}

#[inline]
pub(crate) fn suit_cards(cards: Cards, suit: usize) -> Cards {
    cards & (SUIT_BITS << (suit * 13))
}

/// Highest card of a non-empty set
#[inline]
pub(crate) fn top(cards: Cards) -> u8 {
    63 - cards.leading_zeros() as u8
}

/// Lowest card of a non-empty set
#[inline]
pub(crate) fn bottom(cards: Cards) -> u8 {
    cards.trailing_zeros() as u8
}

#[inline]
pub(crate) fn count(cards: Cards) -> usize {
    cards.count_ones() as usize
}

/// Cards of `cards` ranked above `card`; only meaningful within one suit
#[inline]
pub(crate) fn above(cards: Cards, card: u8) -> Cards {
    cards & (!0u64 << (card + 1))
}

/// Card positions strictly between `low` and `high`
#[inline]
pub(crate) fn between(low: u8, high: u8) -> Cards {
    (bit(high) - 1) & !(bit(low + 1) - 1)
}

/// Cards of a set, highest first
pub(crate) fn descending(mut cards: Cards) -> impl Iterator<Item = u8> {
    std::iter::from_fn(move || {
        if cards == 0 {
            return None;
        }
        let card = top(cards);
        cards &= !bit(card);
        Some(card)
    })
}

/// Cards of a set, lowest first
pub(crate) fn ascending(mut cards: Cards) -> impl Iterator<Item = u8> {
    std::iter::from_fn(move || {
        if cards == 0 {
            return None;
        }
        let card = bottom(cards);
        cards &= !bit(card);
        Some(card)
    })
}

pub(crate) fn to_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Cards {
    cards
        .into_iter()
        .fold(0, |acc, card| acc | bit(card.to_index()))
}

pub(crate) fn side_index(side: Partnership) -> usize {
    match side {
        Partnership::NorthSouth => 0,
        Partnership::EastWest => 1,
    }
}

/// Transposition key: each seat's holding in relative ranks, and the leader
pub(crate) type TtKey = ([Cards; 4], u8);

#[derive(Clone, Copy, Debug)]
pub(crate) struct GameState {
    pub hands: [Cards; 4],
    pub trump: Option<usize>,
    pub leader: usize,
    pub trick: [u8; 4],
    pub played: usize,
    /// Partnership whose tricks the search counts
    pub max_side: usize,
}

impl GameState {
    pub fn from_position(position: &PlayPosition, max_side: Partnership) -> Result<Self, SolveError> {
        let played = position.trick.len();
        if played >= 4 {
            return Err(SolveError::OverfullTrick(played));
        }

        let sizes = position.deal.hand_sizes();
        let base = sizes[position.to_play() as usize];
        for (offset, seat) in position.leader.clockwise().iter().enumerate() {
            let expected = if offset < played { base.checked_sub(1) } else { Some(base) };
            if expected != Some(sizes[*seat as usize]) {
                return Err(SolveError::InconsistentHands(sizes, played));
            }
        }

        let mut hands = [0; 4];
        for pos in Position::ALL {
            hands[pos as usize] = to_cards(position.deal.hand(pos).cards());
        }
        let mut trick = [0u8; 4];
        for (slot, card) in trick.iter_mut().zip(&position.trick) {
            *slot = card.to_index();
        }

        Ok(Self {
            hands,
            trump: position.trump.map(|suit| suit as usize),
            leader: position.leader as usize,
            trick,
            played,
            max_side: side_index(max_side),
        })
    }

    #[inline]
    pub fn to_play(&self) -> usize {
        (self.leader + self.played) % 4
    }

    #[inline]
    pub fn counts(&self, seat: usize) -> bool {
        seat % 2 == self.max_side
    }

    /// Tricks still to be decided, the one in progress included
    pub fn tricks_left(&self) -> usize {
        count(self.hands[self.leader]) + usize::from(self.played > 0)
    }

    pub fn all_held(&self) -> Cards {
        self.hands.iter().fold(0, |acc, hand| acc | hand)
    }

    /// Held cards plus the cards on the table
    pub fn live(&self) -> Cards {
        self.trick[..self.played]
            .iter()
            .fold(self.all_held(), |acc, &card| acc | bit(card))
    }

    pub fn led_suit(&self) -> Option<usize> {
        (self.played > 0).then(|| suit_of(self.trick[0]))
    }

    pub fn legal(&self) -> Cards {
        let hand = self.hands[self.to_play()];
        match self.led_suit() {
            Some(suit) if suit_cards(hand, suit) != 0 => suit_cards(hand, suit),
            _ => hand,
        }
    }

    /// Whether `card` beats `winning`, the best card so far of a trick led in `led`
    pub fn beats(&self, card: u8, winning: u8, led: usize) -> bool {
        let (suit, winning_suit) = (suit_of(card), suit_of(winning));
        if suit == winning_suit {
            return card > winning;
        }
        Some(suit) == self.trump || (suit == led && Some(winning_suit) != self.trump)
    }

    /// Seat and card currently winning the trick in progress
    pub fn winning(&self) -> (usize, u8) {
        let led = suit_of(self.trick[0]);
        let mut best = (self.leader, self.trick[0]);
        for offset in 1..self.played {
            let card = self.trick[offset];
            if self.beats(card, best.1, led) {
                best = ((self.leader + offset) % 4, card);
            }
        }
        best
    }

    /// Play a card for the seat on move. Returns `Some(won)` when the card
    /// completes a trick, `won` telling whether the counted side took it.
    pub fn play(&mut self, card: u8) -> Option<bool> {
        let seat = self.to_play();
        self.hands[seat] &= !bit(card);
        self.trick[self.played] = card;
        self.played += 1;

        if self.played < 4 {
            return None;
        }
        let (winner, _) = self.winning();
        self.leader = winner;
        self.played = 0;
        Some(self.counts(winner))
    }

    fn holder(&self, card: u8) -> usize {
        (0..4)
            .find(|&seat| self.hands[seat] & bit(card) != 0)
            .unwrap_or(0)
    }

    /// Key in relative ranks, meaningful only between tricks: positions that
    /// differ only in which small cards are gone share a key
    pub fn key(&self) -> TtKey {
        let all = self.all_held();
        let mut key = [0; 4];
        for suit in 0..4 {
            let mut rank = 13u8;
            for card in descending(suit_cards(all, suit)) {
                rank -= 1;
                key[self.holder(card)] |= bit(suit as u8 * 13 + rank);
            }
        }
        (key, self.leader as u8)
    }

    /// Legal moves spades first, high to low, each paired with the index of
    /// the first card it is interchangeable with
    pub fn grouped_moves(&self) -> Vec<(u8, usize)> {
        let legal = self.legal();
        let live = self.live();
        let mine = self.hands[self.to_play()];

        let mut grouped: Vec<(u8, usize)> = Vec::with_capacity(count(legal));
        for suit in (0..4).rev() {
            for card in descending(suit_cards(legal, suit)) {
                let idx = grouped.len();
                let rep = match grouped.last() {
                    Some(&(prev, prev_rep))
                        if suit_of(prev) == suit && live & between(card, prev) & !mine == 0 =>
                    {
                        prev_rep
                    }
                    _ => idx,
                };
                grouped.push((card, rep));
            }
        }
        grouped
    }
}
