//! Pressure capability and advantage inference.
//!
//! Leverage answers "how much can this hand threaten?", which is not the same
//! question as "how strong is it at showdown?". A wheel is a monster with high
//! leverage; bottom pair never climbs above low.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Board, Street};
use crate::classifier::{Classification, HandClass, HandFeatures, HandIntent, PairQuality};
use crate::error::{DrillResult, Rejection, Stage};
use crate::hand_evaluator::HandCategory;
use crate::math_engine::{bet_amount, spr, StackPressure};
use crate::texture::{analyze_board, RunoutType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leverage {
    None,
    Low,
    Medium,
    High,
}

impl Leverage {
    pub fn as_str(self) -> &'static str {
        match self {
            Leverage::None => "none",
            Leverage::Low => "low",
            Leverage::Medium => "medium",
            Leverage::High => "high",
        }
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeAdvantage {
    Hero,
    Neutral,
    Villain,
}

impl fmt::Display for RangeAdvantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeAdvantage::Hero => write!(f, "hero"),
            RangeAdvantage::Neutral => write!(f, "neutral"),
            RangeAdvantage::Villain => write!(f, "villain"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingMode {
    Standard,
    Overbet,
}

impl fmt::Display for BettingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BettingMode::Standard => write!(f, "standard"),
            BettingMode::Overbet => write!(f, "overbet"),
        }
    }
}

/// Bet sizes in percent of the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSet {
    pub small: u32,
    pub large: u32,
    pub overbet: u32,
}

pub fn leverage(cls: &Classification, board: &Board) -> Leverage {
    let f = &cls.features;

    // Bottom pair / underpair caps everything below.
    if cls.holds_weak_pair() {
        return Leverage::Low;
    }

    if f.made_straight && (f.nut_straight || f.wheel_straight) {
        return Leverage::High;
    }
    if f.made_flush && f.nut_flush {
        return Leverage::High;
    }
    if cls.class == HandClass::Monster
        && matches!(
            cls.category,
            HandCategory::FourOfAKind | HandCategory::FullHouse | HandCategory::ThreeOfAKind
        )
    {
        return Leverage::High;
    }
    if f.combo_draw && analyze_board(board.flop()).is_dynamic() {
        return Leverage::High;
    }
    if cls.intent == HandIntent::PureBluff && f.nut_blocker && board.street() == Street::River {
        return Leverage::High;
    }

    if f.made_straight || f.made_flush {
        return Leverage::Medium;
    }
    if cls.category == HandCategory::ThreeOfAKind {
        return Leverage::Medium;
    }
    if f.nut_flush_draw {
        return Leverage::Medium;
    }
    if matches!(cls.pair_quality, PairQuality::TopPair | PairQuality::SecondPair)
        && cls.class >= HandClass::Medium
    {
        return Leverage::Medium;
    }

    match cls.intent {
        HandIntent::MadeValue => Leverage::High,
        HandIntent::ComboDraw => Leverage::Medium,
        HandIntent::ThinValue => Leverage::Low,
        HandIntent::Draw => Leverage::Low,
        HandIntent::PureBluff => Leverage::None,
        HandIntent::GiveUp => Leverage::None,
    }
}

pub fn range_advantage(is_opener: bool, in_position: bool) -> RangeAdvantage {
    if is_opener {
        RangeAdvantage::Hero
    } else if !in_position {
        RangeAdvantage::Villain
    } else {
        RangeAdvantage::Neutral
    }
}

pub fn nut_advantage(class: HandClass, has_straight: bool, has_flush: bool) -> bool {
    class == HandClass::Monster || has_straight || has_flush
}

/// Overbet sizing is reserved for polarized, high-leverage hands on a
/// clean runout with enough stack behind.
pub fn betting_mode(
    leverage: Leverage,
    class: HandClass,
    intent: HandIntent,
    features: &HandFeatures,
    turn_type: Option<RunoutType>,
    spr_ratio: f64,
) -> BettingMode {
    let polarized = class == HandClass::Monster
        || (intent == HandIntent::PureBluff && features.nut_blocker)
        || features.wheel_straight;
    let clean_turn = matches!(turn_type, Some(RunoutType::Blank | RunoutType::Overcard));

    if leverage == Leverage::High && polarized && clean_turn && spr_ratio >= 2.5 {
        BettingMode::Overbet
    } else {
        BettingMode::Standard
    }
}

/// Concrete sizes for a (leverage, mode) pair. Overbet sizing below high
/// leverage has no definition and is rejected rather than downgraded.
pub fn size_set(leverage: Leverage, mode: BettingMode) -> Result<SizeSet, Rejection> {
    match (mode, leverage) {
        (BettingMode::Standard, Leverage::None) => Ok(SizeSet { small: 25, large: 50, overbet: 100 }),
        (BettingMode::Standard, Leverage::Low) => Ok(SizeSet { small: 33, large: 66, overbet: 125 }),
        (BettingMode::Standard, Leverage::Medium) => Ok(SizeSet { small: 33, large: 75, overbet: 125 }),
        (BettingMode::Standard, Leverage::High) => Ok(SizeSet { small: 50, large: 100, overbet: 150 }),
        (BettingMode::Overbet, Leverage::High) => Ok(SizeSet { small: 50, large: 125, overbet: 200 }),
        (BettingMode::Overbet, other) => Err(Rejection::new(
            Stage::SizeSet,
            format!("no size set for ({}, overbet)", other),
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllInDecision {
    Bet(f64),
    AllIn(f64),
}

/// A bet that would leave less than 15% of the stack behind goes all-in.
pub fn resolve_all_in(pot: f64, stack: f64, pct: u32) -> AllInDecision {
    let amount = bet_amount(pot, pct);
    if amount >= stack * 0.85 {
        AllInDecision::AllIn(stack)
    } else {
        AllInDecision::Bet(amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeverageProfile {
    pub leverage: Leverage,
    pub stack_pressure: StackPressure,
    pub spr: f64,
    pub mode: BettingMode,
    pub range_advantage: RangeAdvantage,
    pub nut_advantage: bool,
}

pub fn leverage_profile(
    cls: &Classification,
    board: &Board,
    effective_stack: f64,
    pot: f64,
    is_opener: bool,
    in_position: bool,
) -> DrillResult<LeverageProfile> {
    let ratio = spr(effective_stack, pot)?;
    let lev = leverage(cls, board);
    let mode = betting_mode(lev, cls.class, cls.intent, &cls.features, cls.turn_type, ratio);
    Ok(LeverageProfile {
        leverage: lev,
        stack_pressure: StackPressure::from_spr(ratio),
        spr: ratio,
        mode,
        range_advantage: range_advantage(is_opener, in_position),
        nut_advantage: nut_advantage(cls.class, cls.features.made_straight, cls.features.made_flush),
    })
}
