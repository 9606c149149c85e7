mod common;

use bridge_core::{Card, Denomination, Position, Rank, Suit};
use bridge_play::{Contract, PlayEngine, PlayError, Provenance, Score};
use common::Lowest;

fn engine(notation: &str, denomination: Denomination, leader: Position) -> PlayEngine<Lowest> {
    let mut engine = PlayEngine::from_notation(notation, Lowest).unwrap();
    engine.set_contract(Contract::new(denomination, leader));
    engine
}

#[test]
fn test_full_trick_won_by_highest_trump_lead() {
    let mut engine = engine("N:A... K... Q... J...", Denomination::Spades, Position::North);

    let done = engine.play_trick_tokens("AS KS QS JS").unwrap();

    assert_eq!(done.winner, Position::North);
    assert_eq!(engine.score(), Score { ns: 1, ew: 0 });
    assert!(done
        .trick
        .entries()
        .iter()
        .all(|e| e.provenance == Provenance::UserPlayed));
    assert!(engine.is_complete());
}

#[test]
fn test_only_trump_beats_led_suit_and_discards() {
    // N: ♣2  E: ♦3  S: ♣A  W: ♣5
    let mut engine = engine("N:...2 ..3. ...A ...5", Denomination::Diamonds, Position::North);

    for token in ["2C", "3D", "AC", "5C"] {
        engine.play_token(token).unwrap();
    }

    assert_eq!(engine.state().leader(), Position::East);
    assert_eq!(engine.score(), Score { ns: 0, ew: 1 });
}

#[test]
fn test_lone_trump_wins_regardless_of_rank() {
    // N: ♠A  E: ♥2  S: ♦K  W: ♣A, hearts trump
    let mut engine = engine("N:A... .2.. ..K. ...A", Denomination::Hearts, Position::North);
    let done = engine.play_trick_tokens("AS 2H KD AC").unwrap();
    assert_eq!(done.winner, Position::East);
}

#[test]
fn test_legal_moves_restricted_to_led_suit() {
    // E holds two spades and a heart
    let mut engine = engine(
        "N:AQ...2 K5.3.. ..AKQ. ...AKQ",
        Denomination::NoTrump,
        Position::North,
    );
    assert_eq!(engine.legal_moves().unwrap().len(), 3);

    engine.play_token("AS").unwrap();

    assert_eq!(
        engine.legal_moves().unwrap(),
        vec![
            Card::new(Suit::Spades, Rank::King),
            Card::new(Suit::Spades, Rank::Five)
        ]
    );
}

#[test]
fn test_follow_suit_enforced_for_single_cards_and_tricks() {
    let notation = "N:AQ...2 K5.3.. ..AKQ. ...AKQ";
    let mut engine = engine(notation, Denomination::NoTrump, Position::North);

    let violation = PlayError::FollowSuitViolation {
        player: Position::East,
        led: Suit::Spades,
    };
    assert_eq!(
        engine.play_trick_tokens("AS 3H AD AC").err(),
        Some(violation.clone())
    );
    assert!(engine.history().current().is_empty());
    assert_eq!(engine.state().played().len(), 0);

    engine.play_token("AS").unwrap();
    assert_eq!(engine.play_token("3H").err(), Some(violation));
    assert_eq!(engine.current_player().unwrap(), Position::East);
    assert_eq!(engine.history().current().len(), 1);
}

#[test]
fn test_trick_input_validation() {
    let mut engine = engine("N:A... K... Q... J...", Denomination::NoTrump, Position::North);

    assert_eq!(
        engine.play_trick_tokens("AS KS QS").err(),
        Some(PlayError::MalformedTrickInput(3))
    );
    assert_eq!(
        engine.play_trick_tokens("AS KS QS XX").err(),
        Some(PlayError::InvalidCardNotation("XX".to_string()))
    );
    assert_eq!(
        engine.play_trick_tokens("KS AS QS JS").err(),
        Some(PlayError::CardNotInHand {
            card: Card::new(Suit::Spades, Rank::King),
            player: Position::North
        })
    );

    engine.play_token("AS").unwrap();
    assert_eq!(
        engine.play_trick_tokens("KS QS JS 2S").err(),
        Some(PlayError::TrickInProgress)
    );
}

#[test]
fn test_contract_required_and_reset() {
    let mut engine = PlayEngine::from_notation("N:A... K... Q... J...", Lowest).unwrap();
    assert_eq!(engine.legal_moves().err(), Some(PlayError::NoContractSet));
    assert_eq!(engine.undo_last_card().err(), Some(PlayError::NoContractSet));

    engine.set_contract(Contract::parse("1nt", "n").unwrap());
    engine.play_token("AS").unwrap();

    // A new contract restarts play from the original deal
    engine.set_contract(Contract::parse("2h", "e").unwrap());
    assert!(engine.history().current().is_empty());
    assert_eq!(engine.state().hands(), engine.original());
    assert_eq!(engine.current_player().unwrap(), Position::East);
}

#[test]
fn test_unequal_hands_rejected_at_construction() {
    assert_eq!(
        PlayEngine::from_notation("N:AK... K... Q... J...", Lowest).err(),
        Some(PlayError::DuplicateCard(Card::new(Suit::Spades, Rank::King)))
    );
    assert_eq!(
        PlayEngine::from_notation("N:AK... Q... J... T...", Lowest).err(),
        Some(PlayError::UnequalInitialHandSizes([2, 1, 1, 1]))
    );
}
