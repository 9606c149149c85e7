mod common;

use bridge_core::{Card, Denomination, Position, Rank, Suit};
use bridge_play::render::render_dd_table;
use bridge_play::{
    Contract, DdsOracle, Oracle, OracleError, PlayEngine, PlayError, PlayedCard, Provenance,
    Score,
};
use common::{Flaky, Lowest, Offline, WrongSeat, ONE_SUIT_EACH, TWO_CARD};
use std::cell::Cell;

fn engine<O: Oracle>(notation: &str, oracle: O) -> PlayEngine<O> {
    let mut engine = PlayEngine::from_notation(notation, oracle).unwrap();
    engine.set_contract(Contract::new(Denomination::NoTrump, Position::North));
    engine
}

fn spade(rank: Rank) -> Card {
    Card::new(Suit::Spades, rank)
}

#[test]
fn test_optimal_card_is_tagged_engine_played() {
    let mut engine = engine(TWO_CARD, Lowest);
    assert_eq!(engine.optimal_move().unwrap(), spade(Rank::King));

    let outcome = engine.play_optimal_card().unwrap();

    assert_eq!(
        outcome.played,
        PlayedCard::new(Position::North, spade(Rank::King), Provenance::EnginePlayed)
    );
    assert_eq!(outcome.completed, None);
    assert_eq!(engine.current_player().unwrap(), Position::East);
}

#[test]
fn test_manual_play_commits_pending_tricks() {
    let mut engine = engine(ONE_SUIT_EACH, Lowest);
    engine.play_optimal_trick().unwrap();
    assert_eq!(engine.history().pending().len(), 1);
    assert!(engine.history().committed().is_empty());

    engine.play_token("AS").unwrap();

    assert!(engine.history().pending().is_empty());
    assert_eq!(engine.history().committed().len(), 1);
    assert_eq!(engine.history().current().len(), 1);
}

#[test]
fn test_each_request_starts_a_new_plan() {
    let mut engine = engine(ONE_SUIT_EACH, Lowest);
    engine.play_optimal_trick().unwrap();
    engine.play_optimal_trick().unwrap();

    assert_eq!(engine.history().committed().len(), 1);
    assert_eq!(engine.history().pending().len(), 1);

    assert_eq!(engine.abandon_auto_plan().unwrap(), 1);
    assert_eq!(engine.history().completed_count(), 1);
    assert_eq!(engine.state().hands().north.len(), 12);
}

#[test]
fn test_auto_tricks_stop_when_hands_run_out() {
    let mut engine = engine(TWO_CARD, Lowest);
    let done = engine.play_optimal_tricks(5).unwrap();

    assert_eq!(done.len(), 2);
    assert!(engine.is_complete());
    assert_eq!(engine.score(), Score { ns: 2, ew: 0 });
    assert_eq!(
        engine.play_optimal_tricks(1).err(),
        Some(PlayError::DealComplete)
    );
    assert_eq!(engine.play_to_end().err(), Some(PlayError::DealComplete));
}

#[test]
fn test_offline_oracle_leaves_state_untouched() {
    let mut engine = engine(TWO_CARD, Offline);
    let state = engine.state().clone();
    let unavailable =
        PlayError::OracleUnavailable(OracleError::Unavailable("solver offline".to_string()));

    assert_eq!(engine.optimal_move().err(), Some(unavailable.clone()));
    assert_eq!(engine.play_optimal_card().err(), Some(unavailable.clone()));
    assert_eq!(engine.play_to_end().err(), Some(unavailable.clone()));
    assert_eq!(engine.dd_table().err(), Some(unavailable));

    assert_eq!(engine.state(), &state);
    assert!(engine.history().current().is_empty());
}

#[test]
fn test_illegal_oracle_card_is_rejected() {
    // North is on lead; the oracle offers East's ♠QJ and picks the jack
    let mut engine = engine(TWO_CARD, WrongSeat);
    let state = engine.state().clone();
    let illegal =
        PlayError::OracleUnavailable(OracleError::IllegalCard(spade(Rank::Jack)));

    assert_eq!(engine.optimal_move().err(), Some(illegal.clone()));
    assert_eq!(engine.play_optimal_card().err(), Some(illegal.clone()));
    assert_eq!(engine.play_optimal_trick().err(), Some(illegal));

    assert_eq!(engine.state(), &state);
    assert!(engine.history().current().is_empty());
    assert_eq!(engine.current_player().unwrap(), Position::North);
}

#[test]
fn test_oracle_failure_keeps_cards_already_played() {
    let oracle = Flaky {
        budget: Cell::new(2),
    };
    let mut engine = engine(TWO_CARD, oracle);

    assert!(matches!(
        engine.play_optimal_trick(),
        Err(PlayError::OracleUnavailable(OracleError::Unavailable(_)))
    ));

    let current = engine.history().current();
    assert_eq!(current.len(), 2);
    assert!(current
        .entries()
        .iter()
        .all(|e| e.provenance == Provenance::EnginePlayed));
    assert_eq!(
        engine.abandon_auto_plan().err(),
        Some(PlayError::NoPendingPlan)
    );

    engine.undo_last_card().unwrap();
    engine.undo_last_card().unwrap();
    assert_eq!(engine.state().hands(), engine.original());
}

#[test]
fn test_dds_oracle_plays_small_ending() {
    // N: ♠A ♥2  E: ♥A ♣2  S: ♠2 ♥3  W: ♣4 ♣3
    let mut engine = engine("N:A.2.. .A..2 2.3.. ...43", DdsOracle);

    assert_eq!(engine.optimal_move().unwrap(), spade(Rank::Ace));
    assert_eq!(
        engine.move_options().unwrap(),
        vec![
            (spade(Rank::Ace), 1),
            (Card::new(Suit::Hearts, Rank::Two), 0)
        ]
    );

    let done = engine.play_to_end().unwrap();
    assert_eq!(done.len(), 2);
    assert_eq!(done[0].winner, Position::North);
    assert_eq!(engine.score(), Score { ns: 1, ew: 1 });
    assert_eq!(engine.history().pending().len(), 2);
}

#[test]
fn test_dds_table_for_one_suit_hands() {
    let engine = engine(ONE_SUIT_EACH, DdsOracle);
    let table = engine.dd_table().unwrap();

    for declarer in Position::ALL {
        assert_eq!(table.get_tricks(Denomination::NoTrump, declarer), 0);
    }
    let ns_suits = [Denomination::Spades, Denomination::Diamonds];
    let ew_suits = [Denomination::Hearts, Denomination::Clubs];
    for denomination in ns_suits {
        assert_eq!(table.get_tricks(denomination, Position::North), 13);
        assert_eq!(table.get_tricks(denomination, Position::South), 13);
        assert_eq!(table.get_tricks(denomination, Position::East), 0);
    }
    for denomination in ew_suits {
        assert_eq!(table.get_tricks(denomination, Position::West), 13);
        assert_eq!(table.get_tricks(denomination, Position::North), 0);
    }

    let rendered = render_dd_table(&table);
    assert!(rendered.contains("N  0 13  0 13  0"));
}
