use spot_drill::cards::{parse_board, parse_hand, Rank, Street};
use spot_drill::classifier::{classify, HandIntent};
use spot_drill::context::{BettingContext, Polarity};
use spot_drill::error::Stage;
use spot_drill::gates::*;
use spot_drill::leverage::{Leverage, RangeAdvantage};
use spot_drill::math_engine::StackPressure;
use spot_drill::options::ActionIntent::*;
use spot_drill::options::OptionSet;

fn eligibility(hand: &str, board: &str) -> BarrelEligibility {
    let board = parse_board(board).unwrap();
    let cls = classify(&parse_hand(hand).unwrap(), &board).unwrap();
    let ranks: Vec<Rank> = board.cards().iter().map(|c| c.rank).collect();
    barrel_eligibility(cls.class, cls.pair_quality, &cls.features, cls.turn_type, &ranks)
}

fn ctx(street: Street, in_position: bool, perms: (bool, bool, bool), check_dominant: bool) -> BettingContext {
    BettingContext {
        street,
        in_position,
        leverage: Leverage::Low,
        polarity: Polarity::Merged,
        range_advantage: RangeAdvantage::Neutral,
        nut_advantage: false,
        stack_pressure: StackPressure::Low,
        check_dominant,
        allows_small_bet: perms.0,
        allows_large_bet: perms.1,
        allows_overbet: perms.2,
        reasons: Vec::new(),
    }
}

#[test]
fn test_air_without_draw_cannot_barrel() {
    let e = eligibility("QhJd", "8s4c2d");
    assert!(!e.any());
    assert!(e.reason.is_some());

    let board = parse_board("8s4c2d").unwrap();
    let cls = classify(&parse_hand("QhJd").unwrap(), &board).unwrap();
    let ranks: Vec<Rank> = board.cards().iter().map(|c| c.rank).collect();
    let r = check_barrel(cls.class, cls.pair_quality, &cls.features, cls.turn_type, &ranks).unwrap_err();
    assert_eq!(r.stage, Stage::BarrelEligibility);
}

#[test]
fn test_weak_pair_on_dangerous_turn_cannot_barrel() {
    let e = eligibility("4h3d", "Ks9d4cAh");
    assert!(!e.can_barrel_small);
    assert!(!e.can_barrel_large);
}

#[test]
fn test_weak_pair_on_flop_barrels_small() {
    let e = eligibility("4h3d", "Ks9d4c");
    assert!(e.can_barrel_small);
    assert!(!e.can_barrel_large);
}

#[test]
fn test_strong_hands_barrel_both() {
    assert_eq!(
        eligibility("AhKd", "Ks7d2c"),
        BarrelEligibility {
            can_barrel_small: true,
            can_barrel_large: true,
            reason: None
        }
    );
    assert!(eligibility("7h7s", "Ks7d2c").can_barrel_large);
}

#[test]
fn test_nut_flush_draw_barrels_both() {
    let e = eligibility("AhKh", "Qh7h2c");
    assert!(e.can_barrel_small && e.can_barrel_large);
}

#[test]
fn test_medium_hand_barrels_small_only() {
    let e = eligibility("Kh9d", "Ks7d2c");
    assert!(e.can_barrel_small);
    assert!(!e.can_barrel_large);
}

#[test]
fn test_flush_draw_large_only_on_unpaired_board() {
    let unpaired = eligibility("8h7h", "Kh9h2c");
    assert!(unpaired.can_barrel_large);

    let paired = eligibility("8h7h", "Kh9h9c");
    assert!(paired.can_barrel_small);
    assert!(!paired.can_barrel_large);
}

#[test]
fn test_gutshot_barrels_small_only() {
    let e = eligibility("9h8d", "6c5s2d");
    assert!(e.can_barrel_small);
    assert!(!e.can_barrel_large);
}

#[test]
fn test_context_gate_rejects_give_up() {
    let c = ctx(Street::Turn, true, (true, true, false), false);
    let r = context_gate(&c, HandIntent::GiveUp).unwrap_err();
    assert_eq!(r.stage, Stage::ContextGate);
    assert!(context_gate(&c, HandIntent::ThinValue).is_ok());
}

#[test]
fn test_context_gate_overbet_rules() {
    let no_large = ctx(Street::River, true, (true, false, true), false);
    assert!(context_gate(&no_large, HandIntent::MadeValue).is_err());

    let oop = ctx(Street::River, false, (true, true, true), false);
    assert!(context_gate(&oop, HandIntent::MadeValue).is_err());

    let flop = ctx(Street::Flop, true, (true, true, true), false);
    assert!(context_gate(&flop, HandIntent::MadeValue).is_err());

    let river = ctx(Street::River, true, (true, true, true), false);
    assert!(context_gate(&river, HandIntent::MadeValue).is_ok());
}

#[test]
fn test_context_gate_requires_check_dominance_without_bets() {
    let open = ctx(Street::Flop, true, (false, false, false), false);
    assert!(context_gate(&open, HandIntent::PureBluff).is_err());
    let dominant = ctx(Street::Flop, true, (false, false, false), true);
    assert!(context_gate(&dominant, HandIntent::PureBluff).is_ok());
}

#[test]
fn test_survivor_gate_drops_trivial_river_checks() {
    let options = OptionSet::new(vec![Check, Small, Large], 0).unwrap();
    let river = ctx(Street::River, false, (true, false, false), true);
    assert!(is_trivial(&river, &options));
    assert_eq!(survivor_gate(&river, &options).unwrap_err().stage, Stage::Survivor);

    let mut nuts = river.clone();
    nuts.nut_advantage = true;
    assert!(survivor_gate(&nuts, &options).is_ok());

    let mut leverage = river.clone();
    leverage.leverage = Leverage::Medium;
    assert!(survivor_gate(&leverage, &options).is_ok());

    let turn = ctx(Street::Turn, false, (true, false, false), true);
    assert!(survivor_gate(&turn, &options).is_ok());

    let bet_anchor = OptionSet::new(vec![Check, Small, Large], 1).unwrap();
    assert!(survivor_gate(&river, &bet_anchor).is_ok());
}
