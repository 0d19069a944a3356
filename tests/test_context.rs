use spot_drill::cards::Street;
use spot_drill::classifier::HandClass;
use spot_drill::context::*;
use spot_drill::leverage::{Leverage, RangeAdvantage};
use spot_drill::math_engine::StackPressure;

#[allow(clippy::too_many_arguments)]
fn input(
    street: Street,
    in_position: bool,
    leverage: Leverage,
    range_advantage: RangeAdvantage,
    nut_advantage: bool,
    stack: f64,
    pot: f64,
    hand_class: HandClass,
) -> ContextInput {
    ContextInput {
        street,
        in_position,
        leverage,
        range_advantage,
        nut_advantage,
        effective_stack: stack,
        pot,
        hand_class,
        flags: MadeFlags::default(),
    }
}

#[test]
fn test_river_oop_low_leverage_is_check_dominant_small_only() {
    let ctx = normalize(&input(
        Street::River,
        false,
        Leverage::Low,
        RangeAdvantage::Neutral,
        false,
        80.0,
        20.0,
        HandClass::Weak,
    ))
    .unwrap();
    assert!(ctx.check_dominant);
    assert!(ctx.allows_small_bet);
    assert!(!ctx.allows_large_bet);
    assert!(!ctx.allows_overbet);
    assert_eq!(ctx.polarity, Polarity::Merged);
}

#[test]
fn test_river_ip_nut_advantage_unlocks_everything() {
    let ctx = normalize(&input(
        Street::River,
        true,
        Leverage::High,
        RangeAdvantage::Hero,
        true,
        50.0,
        30.0,
        HandClass::Monster,
    ))
    .unwrap();
    assert!(!ctx.check_dominant);
    assert!(ctx.allows_small_bet && ctx.allows_large_bet && ctx.allows_overbet);
    assert_eq!(ctx.polarity, Polarity::Polarized);
    assert_eq!(ctx.stack_pressure, StackPressure::Medium);
}

#[test]
fn test_no_leverage_means_no_bets() {
    let ctx = normalize(&input(
        Street::Flop,
        true,
        Leverage::None,
        RangeAdvantage::Neutral,
        false,
        95.0,
        10.0,
        HandClass::Air,
    ))
    .unwrap();
    assert!(ctx.check_dominant);
    assert!(!ctx.any_bet_allowed());
    assert_eq!(ctx.polarity, Polarity::Merged);
}

#[test]
fn test_villain_range_advantage_overrides_stack_pressure() {
    let ctx = normalize(&input(
        Street::Turn,
        false,
        Leverage::High,
        RangeAdvantage::Villain,
        false,
        20.0,
        20.0,
        HandClass::StrongValue,
    ))
    .unwrap();
    assert_eq!(ctx.stack_pressure, StackPressure::High);
    assert!(ctx.allows_small_bet);
    assert!(!ctx.allows_large_bet);
    assert!(!ctx.allows_overbet);
    assert!(ctx.check_dominant);
    assert_eq!(ctx.polarity, Polarity::Polarized);
}

#[test]
fn test_river_oop_showdown_value_checks() {
    let ctx = normalize(&input(
        Street::River,
        false,
        Leverage::Medium,
        RangeAdvantage::Neutral,
        false,
        97.5,
        20.0,
        HandClass::Medium,
    ))
    .unwrap();
    assert!(!ctx.any_bet_allowed());
    assert!(ctx.check_dominant);
}

#[test]
fn test_turn_probe_clamp_keeps_small_only() {
    let ctx = normalize(&input(
        Street::Turn,
        true,
        Leverage::Medium,
        RangeAdvantage::Neutral,
        false,
        97.5,
        5.5,
        HandClass::StrongValue,
    ))
    .unwrap();
    assert!(ctx.allows_small_bet);
    assert!(!ctx.allows_large_bet);
    assert!(!ctx.check_dominant);
}

#[test]
fn test_stack_pressure_unlocks_large_but_overbet_needs_medium_leverage() {
    let low = normalize(&input(
        Street::Flop,
        true,
        Leverage::Low,
        RangeAdvantage::Neutral,
        false,
        5.0,
        5.0,
        HandClass::Weak,
    ))
    .unwrap();
    assert!(low.allows_small_bet && low.allows_large_bet);
    assert!(!low.allows_overbet);

    let medium = normalize(&input(
        Street::Flop,
        true,
        Leverage::Medium,
        RangeAdvantage::Neutral,
        false,
        5.0,
        5.0,
        HandClass::StrongValue,
    ))
    .unwrap();
    assert!(medium.allows_overbet);
}

#[test]
fn test_oop_never_overbets() {
    let ctx = normalize(&input(
        Street::River,
        false,
        Leverage::High,
        RangeAdvantage::Hero,
        true,
        5.0,
        5.0,
        HandClass::Monster,
    ))
    .unwrap();
    assert!(!ctx.allows_overbet);
    assert!(ctx.allows_large_bet);
}

#[test]
fn test_protection_lets_oop_hand_lead() {
    let ctx = normalize(&input(
        Street::Flop,
        false,
        Leverage::Low,
        RangeAdvantage::Neutral,
        false,
        97.5,
        5.5,
        HandClass::Medium,
    ))
    .unwrap();
    assert!(!ctx.check_dominant);
}

#[test]
fn test_combo_draw_lets_oop_hand_lead() {
    let mut i = input(
        Street::Flop,
        false,
        Leverage::Low,
        RangeAdvantage::Neutral,
        false,
        97.5,
        5.5,
        HandClass::Air,
    );
    assert!(normalize(&i).unwrap().check_dominant);
    i.flags.combo_draw = true;
    assert!(!normalize(&i).unwrap().check_dominant);
}

#[test]
fn test_reason_trace_has_one_line_per_rule() {
    let ctx = normalize(&input(
        Street::Flop,
        true,
        Leverage::Medium,
        RangeAdvantage::Hero,
        false,
        97.5,
        5.5,
        HandClass::StrongValue,
    ))
    .unwrap();
    assert_eq!(ctx.reasons.len(), 10);
    assert!(ctx.reasons[0].starts_with("R1 "));
    assert!(ctx.reasons[9].starts_with("R10 "));
}

#[test]
fn test_normalize_is_deterministic() {
    let i = input(
        Street::Turn,
        false,
        Leverage::High,
        RangeAdvantage::Villain,
        true,
        40.0,
        12.0,
        HandClass::Monster,
    );
    assert_eq!(normalize(&i).unwrap(), normalize(&i).unwrap());
}

#[test]
fn test_invalid_pot_is_an_error() {
    let i = input(
        Street::Flop,
        true,
        Leverage::Low,
        RangeAdvantage::Neutral,
        false,
        97.5,
        0.0,
        HandClass::Weak,
    );
    assert!(normalize(&i).is_err());
}

#[test]
fn test_build_context_derives_advantages() {
    let ctx = build_context(
        Street::River,
        false,
        Leverage::High,
        97.5,
        20.0,
        false,
        HandClass::Air,
        MadeFlags {
            has_flush: true,
            ..MadeFlags::default()
        },
    )
    .unwrap();
    assert_eq!(ctx.range_advantage, RangeAdvantage::Villain);
    assert!(ctx.nut_advantage);
    assert!(ctx.check_dominant);
}
