//! Null-window search driven by MTD(f)

use rustc_hash::FxHashMap;

use crate::order::order_moves;
use crate::state::{
    above, between, bit, bottom, count, descending, suit_cards, suit_of, top, Cards, GameState,
    TtKey,
};

/// Bounds on the tricks the counted side takes from a trick boundary on
#[derive(Clone, Copy, Debug)]
struct Bounds {
    lower: u8,
    upper: u8,
}

pub(crate) struct Search {
    tt: FxHashMap<TtKey, Bounds>,
    pub nodes: u64,
}

impl Search {
    pub fn new() -> Self {
        Self {
            tt: FxHashMap::default(),
            nodes: 0,
        }
    }

    /// Exact tricks the counted side takes from `state`, starting the
    /// zero-window sequence at `guess`
    pub fn exact(&mut self, state: &GameState, guess: u8) -> u8 {
        let left = state.tricks_left() as u8;
        let (mut lower, mut upper) = (0u8, left);
        let mut g = guess.min(left);
        while lower < upper {
            let beta = if g == lower { g + 1 } else { g };
            g = self.zero_window(state, beta);
            if g < beta {
                upper = g.max(lower);
            } else {
                lower = g.min(upper);
            }
            g = g.clamp(lower, upper);
        }
        lower
    }

    /// Whether the counted side takes at least `beta` tricks. The result is
    /// a lower bound when at least `beta`, an upper bound otherwise.
    fn zero_window(&mut self, state: &GameState, beta: u8) -> u8 {
        self.nodes += 1;

        let left = state.tricks_left() as u8;
        if beta == 0 {
            return 0;
        }
        if beta > left {
            return left;
        }

        let key = (state.played == 0).then(|| state.key());
        if let Some(key) = &key {
            if let Some(bounds) = self.tt.get(key) {
                if bounds.lower >= beta {
                    return bounds.lower;
                }
                if bounds.upper < beta {
                    return bounds.upper;
                }
            }

            let quick = quick_tricks(state);
            if state.counts(state.leader) {
                if quick >= beta {
                    return quick;
                }
            } else if left - quick < beta {
                return left - quick;
            }
        }

        let maximizing = state.counts(state.to_play());
        let live = state.live();
        let mine = state.hands[state.to_play()];
        let mut tried: Cards = 0;
        let mut best = if maximizing { 0 } else { left };

        for &card in order_moves(state).as_slice() {
            if equivalent_to_tried(card, tried, live, mine) {
                continue;
            }
            tried |= bit(card);

            let mut child = *state;
            let bonus = u8::from(child.play(card) == Some(true));
            let value = bonus + self.zero_window(&child, beta - bonus);

            if maximizing {
                best = best.max(value);
                if best >= beta {
                    break;
                }
            } else {
                best = best.min(value);
                if best < beta {
                    break;
                }
            }
        }

        if let Some(key) = key {
            let entry = self.tt.entry(key).or_insert(Bounds {
                lower: 0,
                upper: left,
            });
            if best >= beta {
                entry.lower = entry.lower.max(best);
            } else {
                entry.upper = entry.upper.min(best);
            }
        }

        best
    }
}

/// Whether `card` can only do what an already searched card of the same
/// hand does: no live card of another hand ranks between them
fn equivalent_to_tried(card: u8, tried: Cards, live: Cards, mine: Cards) -> bool {
    let tried = suit_cards(tried, suit_of(card));
    if tried == 0 {
        return false;
    }
    let higher = above(tried, card);
    if higher != 0 && live & between(card, bottom(higher)) & !mine == 0 {
        return true;
    }
    let lower = tried & !higher & !bit(card);
    lower != 0 && live & between(top(lower), card) & !mine == 0
}

/// Tricks the leader's side can cash at once from a trick boundary: the
/// leader's cards above every other card of their suit. In a trump contract
/// side suits count only once the opponents' trumps are drawn, and only
/// while partner has side cards to play to them.
pub(crate) fn quick_tricks(state: &GameState) -> u8 {
    let leader = state.leader;
    let lead = state.hands[leader];
    let others = state.hands[(leader + 1) % 4]
        | state.hands[(leader + 2) % 4]
        | state.hands[(leader + 3) % 4];
    let winners = |suit: usize| -> usize {
        let mine = suit_cards(lead, suit);
        let rest = suit_cards(others, suit);
        if rest == 0 {
            count(mine)
        } else if mine == 0 {
            0
        } else {
            count(above(mine, top(rest)))
        }
    };

    let total = match state.trump {
        Some(trump) => {
            let longest = [(leader + 1) % 4, (leader + 3) % 4]
                .iter()
                .map(|&seat| count(suit_cards(state.hands[seat], trump)))
                .max()
                .unwrap_or(0);
            let drawn = winners(trump);
            let side: usize = (0..4).filter(|&suit| suit != trump).map(winners).sum();
            let partner = state.hands[(leader + 2) % 4];
            let spare = count(partner & !suit_cards(partner, trump));
            if drawn < longest || spare < side {
                drawn
            } else {
                drawn + side
            }
        }
        None => (0..4).map(winners).sum(),
    };
    total.min(state.tricks_left()) as u8
}

/// Starting point for MTD(f) from the counted side's high-card points
pub(crate) fn guess_tricks(state: &GameState) -> u8 {
    let left = state.tricks_left() as u8;
    let points = |seat: usize| -> u32 {
        (0..4)
            .map(|suit| {
                let held = suit_cards(state.hands[seat], suit);
                let all = suit_cards(state.all_held(), suit);
                let mut pts = 0;
                for (value, card) in (1..=4).rev().zip(descending(all)) {
                    if held & bit(card) != 0 {
                        pts += value;
                    }
                }
                pts
            })
            .sum()
    };
    let ours = points(state.max_side) + points(state.max_side + 2);
    let theirs = points(1 - state.max_side) + points(3 - state.max_side);

    let guess = if ours * 2 < theirs {
        0
    } else if ours < theirs {
        left / 2
    } else if ours > theirs * 2 {
        left
    } else {
        left / 2 + 1
    };
    guess.min(left)
}
