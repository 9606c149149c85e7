//! Move ordering: likely best cards first so cutoffs come early

use crate::state::{
    above, ascending, bit, bottom, count, descending, suit_cards, suit_of, top, Cards, GameState,
};

/// Cards of one seat in the order the search tries them
pub(crate) struct Moves {
    cards: [u8; 13],
    len: usize,
    added: Cards,
}

impl Moves {
    fn new() -> Self {
        Self {
            cards: [0; 13],
            len: 0,
            added: 0,
        }
    }

    fn push(&mut self, card: u8) {
        if self.added & bit(card) == 0 && self.len < self.cards.len() {
            self.added |= bit(card);
            self.cards[self.len] = card;
            self.len += 1;
        }
    }

    fn push_descending(&mut self, cards: Cards) {
        descending(cards).for_each(|card| self.push(card));
    }

    fn push_ascending(&mut self, cards: Cards) {
        ascending(cards).for_each(|card| self.push(card));
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cards[..self.len]
    }
}

/// Legal moves of the seat on move, best guesses first
pub(crate) fn order_moves(state: &GameState) -> Moves {
    let legal = state.legal();
    let mut moves = Moves::new();
    if state.played == 0 {
        order_leads(state, legal, &mut moves);
    } else {
        order_follows(state, legal, &mut moves);
    }
    moves.push_descending(legal);
    moves
}

fn order_leads(state: &GameState, legal: Cards, moves: &mut Moves) {
    let seat = state.to_play();
    let hands = &state.hands;
    let (lho, pd, rho) = (hands[(seat + 1) % 4], hands[(seat + 2) % 4], hands[(seat + 3) % 4]);
    let ours = hands[seat] | pd;
    let all = state.all_held();

    let (mut ruffs, mut finesses, mut high, mut normal, mut bad, mut trumps) = (0, 0, 0, 0, 0, 0);
    for suit in 0..4 {
        let mine = suit_cards(legal, suit);
        if mine == 0 {
            continue;
        }
        if Some(suit) == state.trump {
            trumps |= bit(top(mine)) | bit(bottom(mine));
            continue;
        }
        if let Some(trump) = state.trump {
            let ruffed = |hand: Cards| suit_cards(hand, suit) == 0 && suit_cards(hand, trump) != 0;
            if ruffed(lho) || ruffed(rho) {
                continue;
            }
        }

        let (pd_s, lho_s, rho_s) = (suit_cards(pd, suit), suit_cards(lho, suit), suit_cards(rho, suit));
        let ends = bit(top(mine)) | bit(bottom(mine));
        let mut honors = [0; 5];
        for (slot, card) in honors.iter_mut().zip(descending(suit_cards(all, suit))) {
            *slot = bit(card);
        }
        let [a, k, q, j, t] = honors;
        let has = |hand: Cards, card: Cards| card != 0 && hand & card != 0;
        let both = |hand: Cards, x: Cards, y: Cards| has(hand, x) && has(hand, y);

        if count(pd_s) >= 2
            && count(lho_s) >= 2
            && ((has(pd_s, k) && has(lho_s, a))
                || (has(pd_s, a) && has(lho_s, k) && (has(pd_s, q) || both(ours, q, j)))
                || (has(pd_s, k) && has(lho_s, q) && (has(pd_s, j) || both(ours, j, t))))
        {
            finesses |= ends;
            continue;
        }
        if count(mine) >= 2
            && count(rho_s) >= 2
            && ((has(mine, a) && has(rho_s, k)) || (has(mine, k) && has(rho_s, a) && !has(ours, q)))
        {
            if state.trump.is_some() {
                bad |= ends;
            }
            continue;
        }
        if lho_s != 0 && rho_s != 0 && count(ours & (a | k | q)) >= 2 {
            high |= ends;
            continue;
        }
        if let Some(trump) = state.trump {
            let pd_trumps = count(suit_cards(pd, trump));
            if pd_s == 0
                && lho_s != 0
                && rho_s != 0
                && pd_trumps > 0
                && pd_trumps <= count(suit_cards(legal, trump))
                && bit(bottom(mine)) != a
            {
                ruffs |= bit(bottom(mine));
                continue;
            }
        }
        normal |= ends;
    }

    for group in [ruffs, finesses, high, normal, bad, trumps] {
        moves.push_descending(group);
    }
}

fn order_follows(state: &GameState, legal: Cards, moves: &mut Moves) {
    let seat = state.to_play();
    let (pd, lho) = ((seat + 2) % 4, (seat + 1) % 4);
    let led = state.led_suit().unwrap_or(0);
    let (win_seat, win_card) = state.winning();
    let pd_s = suit_cards(state.hands[pd], led);
    let lho_s = suit_cards(state.hands[lho], led);
    let last = state.played == 3;
    let second = state.played == 1;

    let mine = suit_cards(legal, led);
    if mine != 0 {
        let my_top = top(mine);
        if !state.beats(my_top, win_card, led) {
            moves.push_ascending(legal);
            return;
        }
        if win_seat == pd
            && (last
                || lho_s == 0
                || win_card > top(lho_s)
                || above(lho_s, win_card) == above(lho_s, my_top))
        {
            moves.push_ascending(legal);
            return;
        }
        if second && pd_s != 0 && top(pd_s) > win_card {
            let ours = pd_s | mine;
            if lho_s != 0
                && top(lho_s) > top(ours)
                && above(lho_s, top(pd_s)) == above(lho_s, my_top)
            {
                moves.push_ascending(legal);
                return;
            }
            if lho_s == 0 || top(pd_s) > top(lho_s) {
                moves.push_ascending(legal);
                return;
            }
        }
        let higher = above(mine, win_card);
        if last || lho_s == 0 || bottom(higher) > top(lho_s) {
            moves.push_ascending(higher);
        } else {
            moves.push_descending(higher);
        }
        moves.push_ascending(mine & !higher);
        return;
    }

    if let Some(trump) = state.trump {
        let my_trumps = suit_cards(legal, trump);
        if my_trumps != 0 {
            let lho_ruffs = suit_cards(state.hands[lho], trump) != 0;
            let partner_safe = win_seat == pd
                && (last || (lho_s != 0 && !state.beats(top(lho_s), win_card, led)));
            if partner_safe {
                add_discards(state, legal, moves);
                return;
            }
            if suit_of(win_card) == trump {
                if win_seat != pd && top(my_trumps) > win_card {
                    let higher = above(my_trumps, win_card);
                    moves.push_ascending(higher);
                    add_discards(state, legal & !higher, moves);
                    return;
                }
            } else if last || lho_s != 0 || !lho_ruffs {
                moves.push(bottom(my_trumps));
                add_discards(state, legal, moves);
                return;
            } else {
                moves.push_ascending(my_trumps);
                add_discards(state, legal & !my_trumps, moves);
                return;
            }
        }
    }
    add_discards(state, legal, moves);
}

/// Lowest card of each side suit, longest suit first
fn add_discards(state: &GameState, cards: Cards, moves: &mut Moves) {
    let mut lows = [(0usize, 0u8); 4];
    let mut len = 0;
    for suit in (0..4).filter(|&suit| Some(suit) != state.trump) {
        let held = suit_cards(cards, suit);
        if held != 0 {
            lows[len] = (count(held), bottom(held));
            len += 1;
        }
    }
    let lows = &mut lows[..len];
    lows.sort_by(|a, b| b.0.cmp(&a.0));
    for &(_, card) in lows.iter() {
        moves.push(card);
    }
}
