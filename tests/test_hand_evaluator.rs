use spot_drill::cards::{parse_cards, parse_hand};
use spot_drill::hand_evaluator::*;
use spot_drill::math_engine::*;

fn made(hand: &str, board: &str) -> MadeHand {
    evaluate_hand(&parse_hand(hand).unwrap(), &parse_cards(board).unwrap())
}

#[test]
fn test_categories() {
    assert_eq!(made("QhJd", "8s4c2d").category, HandCategory::HighCard);
    assert_eq!(made("AhQd", "As4c2d").category, HandCategory::OnePair);
    assert_eq!(made("AhKd", "AsKc2d").category, HandCategory::TwoPair);
    assert_eq!(made("AhAd", "AsAc2d").category, HandCategory::FourOfAKind);
    assert_eq!(made("KhKd", "Ks7d7c").category, HandCategory::FullHouse);
    assert_eq!(made("9h8h", "7h6h5h").category, HandCategory::StraightFlush);
}

#[test]
fn test_set_versus_trips() {
    let set = made("7h7s", "Ks7d2c");
    assert_eq!(set.category, HandCategory::ThreeOfAKind);
    assert!(set.is_set);

    let trips = made("Ah7c", "Ks7d7h");
    assert_eq!(trips.category, HandCategory::ThreeOfAKind);
    assert!(!trips.is_set);
}

#[test]
fn test_board_pair_alone_is_high_card() {
    assert_eq!(made("AhQd", "8s8d2c").category, HandCategory::HighCard);
}

#[test]
fn test_nut_flush_flag() {
    let nut = made("AhKd", "Qh7h2h");
    assert_eq!(nut.category, HandCategory::Flush);
    assert!(nut.is_nut_flush);

    let second = made("KhKd", "Qh7h2h");
    assert!(second.has_flush());
    assert!(!second.is_nut_flush);
}

#[test]
fn test_wheel_and_nut_straight() {
    let wheel = made("As2d", "3c4h5s");
    assert!(wheel.is_wheel);
    assert_eq!(wheel.straight_high, Some(5));
    assert!(!wheel.is_nut_straight);

    let nuts = made("7h6d", "3c4h5s");
    assert_eq!(nuts.straight_high, Some(7));
    assert!(nuts.is_nut_straight);
}

#[test]
fn test_board_flush_needs_hero_card_above_it() {
    let board = "Kh9h7h4h3h";
    assert!(!made("2h2d", board).has_flush());
    assert!(made("Ah3d", board).has_flush());
}

#[test]
fn test_highest_missing_skips_board_cards() {
    let board = parse_cards("AhKh2c").unwrap();
    assert_eq!(
        highest_missing(&board, spot_drill::cards::Suit::Hearts),
        Some(spot_drill::cards::Rank::Queen)
    );
}

#[test]
fn test_bet_amounts_and_pressure() {
    assert_eq!(bet_amount(5.5, 50), 2.75);
    assert_eq!(bet_amount(10.0, 125), 12.5);
    assert_eq!(round2(2.0 / 3.0), 0.67);
    assert_eq!(stack_pressure(97.5, 5.5).unwrap(), StackPressure::Low);
    assert_eq!(stack_pressure(10.0, 10.0).unwrap(), StackPressure::High);
    assert!(spr(-1.0, 5.0).is_err());
}
