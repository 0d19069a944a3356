use approx::assert_relative_eq;
use spot_drill::cards::{parse_board, parse_hand};
use spot_drill::classifier::*;
use spot_drill::hand_evaluator::{evaluate_hand, HandCategory};
use spot_drill::texture::RunoutType;

fn cls(hand: &str, board: &str) -> Classification {
    classify(&parse_hand(hand).unwrap(), &parse_board(board).unwrap()).unwrap()
}

#[test]
fn test_wheel_is_monster() {
    let c = cls("As2d", "3c4h5s");
    assert_eq!(c.category, HandCategory::Straight);
    assert_eq!(c.class, HandClass::Monster);
    assert!(c.features.wheel_straight);
    assert!(c.features.made_straight);
    assert_eq!(c.intent, HandIntent::MadeValue);
}

#[test]
fn test_top_pair_good_kicker_is_strong() {
    let c = cls("AhKd", "Ks7d2c");
    assert_eq!(c.pair_quality, PairQuality::TopPair);
    assert_eq!(c.class, HandClass::StrongValue);
    assert_eq!(c.intent, HandIntent::MadeValue);
}

#[test]
fn test_top_pair_weak_kicker_is_medium() {
    let c = cls("Kh9d", "Ks7d2c");
    assert_eq!(c.pair_quality, PairQuality::TopPair);
    assert_eq!(c.class, HandClass::Medium);
    assert_eq!(c.intent, HandIntent::ThinValue);
}

#[test]
fn test_overpair() {
    let c = cls("QhQd", "Js7d2c");
    assert_eq!(c.pair_quality, PairQuality::Overpair);
    assert_eq!(c.class, HandClass::StrongValue);
}

#[test]
fn test_set_is_monster_not_weak_pair() {
    let c = cls("2h2s", "Ks7d2c");
    assert_eq!(c.category, HandCategory::ThreeOfAKind);
    assert_eq!(c.class, HandClass::Monster);
    assert!(!c.holds_weak_pair());
}

#[test]
fn test_bottom_pair_on_flop_is_weak_thin_value() {
    let c = cls("4h3d", "Ks9d4c");
    assert_eq!(c.pair_quality, PairQuality::BottomPair);
    assert_eq!(c.class, HandClass::Weak);
    assert_eq!(c.intent, HandIntent::ThinValue);
    assert!(c.holds_weak_pair());
}

#[test]
fn test_bottom_pair_on_overcard_turn_gives_up() {
    let c = cls("4h3d", "Ks9d4cAh");
    assert_eq!(c.turn_type, Some(RunoutType::Overcard));
    assert_eq!(c.pair_quality, PairQuality::BottomPair);
    assert_eq!(c.class, HandClass::Weak);
    assert_eq!(c.intent, HandIntent::GiveUp);
}

#[test]
fn test_bottom_pair_ace_kicker_demoted_on_dangerous_turn() {
    // Ace kicker keeps bottom pair at medium on a blank runout only.
    let blank = cls("Ah4d", "Ks9d4c5h");
    assert_eq!(blank.turn_type, Some(RunoutType::Blank));
    assert_eq!(blank.class, HandClass::Medium);

    let paired = cls("Ah4d", "Ks9d4c9s");
    assert_eq!(paired.turn_type, Some(RunoutType::Paired));
    assert_eq!(paired.class, HandClass::Weak);
    assert_eq!(paired.intent, HandIntent::GiveUp);
}

#[test]
fn test_air_without_draw() {
    let c = cls("QhJd", "8s4c2d");
    assert_eq!(c.class, HandClass::Air);
    assert!(!c.features.has_draw());
    assert_eq!(c.intent, HandIntent::PureBluff);
}

#[test]
fn test_nut_flush_draw() {
    let c = cls("AhKh", "Qh7h2c");
    assert!(c.features.flush_draw);
    assert!(c.features.nut_flush_draw);
    assert_eq!(c.class, HandClass::Air);
    assert_eq!(c.intent, HandIntent::Draw);
}

#[test]
fn test_combo_draw_supersedes_draw() {
    let c = cls("9h8h", "Th7h2c");
    assert!(c.features.flush_draw);
    assert_eq!(c.features.straight_draw, StraightDraw::OpenEnded);
    assert!(c.features.combo_draw);
    assert_eq!(c.intent, HandIntent::ComboDraw);
    assert_relative_eq!(c.features.equity, 0.64, epsilon = 1e-9);
}

#[test]
fn test_pair_plus_draw_is_combo_intent() {
    // Second pair with a flush draw.
    let c = cls("9h8h", "Kh9h2c");
    assert_eq!(c.pair_quality, PairQuality::SecondPair);
    assert!(c.features.pair_plus_draw);
    assert_eq!(c.intent, HandIntent::ComboDraw);
}

#[test]
fn test_equity_proxy_is_bounded() {
    for (h, b) in [("AhAd", "AsAc2d"), ("9h8h", "Th7h2c"), ("QhJd", "8s4c2d"), ("As2d", "3c4h5s")] {
        let e = cls(h, b).features.equity;
        assert!((0.0..=0.85).contains(&e), "{} on {} -> {}", h, b, e);
    }
}

#[test]
fn test_no_draws_on_river() {
    let c = cls("AhKh", "Qh7h2c3s8d");
    assert!(!c.features.flush_draw);
    assert_eq!(c.features.straight_draw, StraightDraw::None);
}

#[test]
fn test_nut_flush_made() {
    let c = cls("AhKd", "Qh7h2h");
    assert_eq!(c.category, HandCategory::Flush);
    assert!(c.features.nut_flush);
    assert_eq!(c.class, HandClass::Monster);
}

#[test]
fn test_reclassification_is_stable() {
    let hand = parse_hand("Jc9c").unwrap();
    let board = parse_board("Tc8d2c7s").unwrap();
    let first = classify(&hand, &board).unwrap();
    let second = classify_with(&hand, &board, first.turn_type).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_pair_quality_cases() {
    let q = |h: &str, b: &str| pair_quality(&parse_hand(h).unwrap(), parse_board(b).unwrap().cards());
    assert_eq!(q("AhKd", "Ks7d2c"), PairQuality::TopPair);
    assert_eq!(q("Ah7d", "Ks7c2c"), PairQuality::SecondPair);
    assert_eq!(q("Ah2d", "Ks7d2c"), PairQuality::BottomPair);
    assert_eq!(q("3h3d", "Ks7d5c"), PairQuality::Underpair);
    assert_eq!(q("AhQd", "8s8d2c"), PairQuality::BoardPairOnly);
    assert_eq!(q("AhQd", "8s7d2c"), PairQuality::NoPair);
}

#[test]
fn test_board_straight_is_not_hero_straight() {
    let made = evaluate_hand(&parse_hand("AhAd").unwrap(), parse_board("9s8d7c6h5s").unwrap().cards());
    assert_ne!(made.category, HandCategory::Straight);
}

#[test]
fn test_hole_card_shared_with_board_is_fatal() {
    let board = parse_board("AhKd2c").unwrap();
    for hand in ["AhKs", "AhAd"] {
        assert!(matches!(
            classify(&parse_hand(hand).unwrap(), &board),
            Err(spot_drill::error::DrillError::DuplicateCard(_))
        ));
    }
    let turn = parse_board("AhKd2c7s").unwrap();
    assert!(classify_with(&parse_hand("7s7d").unwrap(), &turn, None).is_err());
}
