//! Hand and board feature classification.
//!
//! Everything here is a pure function of the hero's hole cards, the board and
//! (optionally) the turn type. Rules are ordered decision lists: the first rule
//! that matches decides.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Board, Card, Hand, Rank, ALL_SUITS};
use crate::error::DrillResult;
use crate::hand_evaluator::{
    evaluate_hand, highest_missing, straight_outs, suit_counts, HandCategory, MadeHand,
};
use crate::texture::{classify_turn, RiverType, TurnType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandClass {
    Air,
    Weak,
    Medium,
    StrongValue,
    Monster,
}

impl HandClass {
    pub fn as_str(self) -> &'static str {
        match self {
            HandClass::Monster => "monster",
            HandClass::StrongValue => "strong_value",
            HandClass::Medium => "medium",
            HandClass::Weak => "weak",
            HandClass::Air => "air",
        }
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairQuality {
    Overpair,
    TopPair,
    SecondPair,
    MiddlePair,
    BottomPair,
    Underpair,
    BoardPairOnly,
    NoPair,
}

impl PairQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            PairQuality::Overpair => "overpair",
            PairQuality::TopPair => "top_pair",
            PairQuality::SecondPair => "second_pair",
            PairQuality::MiddlePair => "middle_pair",
            PairQuality::BottomPair => "bottom_pair",
            PairQuality::Underpair => "underpair",
            PairQuality::BoardPairOnly => "board_pair_only",
            PairQuality::NoPair => "no_pair",
        }
    }

    /// Bottom pair or an underpair.
    pub fn is_weak_pair(self) -> bool {
        matches!(self, PairQuality::BottomPair | PairQuality::Underpair)
    }

    pub fn is_pair(self) -> bool {
        !matches!(self, PairQuality::BoardPairOnly | PairQuality::NoPair)
    }
}

impl fmt::Display for PairQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StraightDraw {
    None,
    Gutshot,
    OpenEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandIntent {
    MadeValue,
    ThinValue,
    ComboDraw,
    Draw,
    PureBluff,
    GiveUp,
}

impl HandIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            HandIntent::MadeValue => "made_value",
            HandIntent::ThinValue => "thin_value",
            HandIntent::ComboDraw => "combo_draw",
            HandIntent::Draw => "draw",
            HandIntent::PureBluff => "pure_bluff",
            HandIntent::GiveUp => "give_up",
        }
    }
}

impl fmt::Display for HandIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandFeatures {
    pub flush_draw: bool,
    pub nut_flush_draw: bool,
    pub straight_draw: StraightDraw,
    pub made_straight: bool,
    pub made_flush: bool,
    pub nut_straight: bool,
    pub nut_flush: bool,
    pub wheel_straight: bool,
    pub pair_plus_draw: bool,
    pub combo_draw: bool,
    /// Hero holds the ace of a suit showing three or more times on board.
    pub nut_blocker: bool,
    /// Ordering proxy in [0, 0.85]; not a probability.
    pub equity: f64,
}

impl HandFeatures {
    pub fn has_draw(&self) -> bool {
        self.flush_draw || self.straight_draw != StraightDraw::None
    }

    pub fn has_strong_draw(&self) -> bool {
        self.nut_flush_draw || self.combo_draw || self.straight_draw == StraightDraw::OpenEnded
    }
}

/// Full classifier output for one (hand, board) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub class: HandClass,
    pub pair_quality: PairQuality,
    pub features: HandFeatures,
    pub intent: HandIntent,
    pub turn_type: Option<TurnType>,
    pub river_type: Option<RiverType>,
    pub category: HandCategory,
}

impl Classification {
    /// A bottom pair or underpair that is still only a one-pair hand.
    pub fn holds_weak_pair(&self) -> bool {
        holds_weak_pair(self.class, self.pair_quality)
    }
}

pub fn holds_weak_pair(class: HandClass, pair_quality: PairQuality) -> bool {
    pair_quality.is_weak_pair() && class <= HandClass::Medium
}

fn is_dangerous(turn_type: Option<TurnType>) -> bool {
    turn_type.map_or(false, |t| !t.is_blank())
}

fn distinct_ranks_desc(board: &[Card]) -> Vec<Rank> {
    let mut ranks: Vec<Rank> = board.iter().map(|c| c.rank).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    ranks.dedup();
    ranks
}

pub fn pair_quality(hand: &Hand, board: &[Card]) -> PairQuality {
    let distinct = distinct_ranks_desc(board);
    let last = distinct.len().saturating_sub(1);

    let best_match = hand
        .iter()
        .filter_map(|c| distinct.iter().position(|&r| r == c.rank))
        .min();
    if let Some(idx) = best_match {
        return match idx {
            0 => PairQuality::TopPair,
            i if i == last => PairQuality::BottomPair,
            1 => PairQuality::SecondPair,
            _ => PairQuality::MiddlePair,
        };
    }

    if hand[0].rank == hand[1].rank {
        let p = hand[0].rank;
        if p > distinct[0] {
            return PairQuality::Overpair;
        }
        if p < distinct[last] {
            return PairQuality::Underpair;
        }
        if distinct.get(1).map_or(false, |&second| p > second) {
            return PairQuality::SecondPair;
        }
        return PairQuality::MiddlePair;
    }

    if distinct.len() < board.len() {
        PairQuality::BoardPairOnly
    } else {
        PairQuality::NoPair
    }
}

fn kicker(hand: &Hand, paired: Rank) -> Rank {
    if hand[0].rank == paired {
        hand[1].rank
    } else {
        hand[0].rank
    }
}

fn matched_rank(hand: &Hand, board: &[Card]) -> Option<Rank> {
    hand.iter()
        .map(|c| c.rank)
        .filter(|r| board.iter().any(|b| b.rank == *r))
        .max()
}

pub fn classify_hand_class(
    hand: &Hand,
    board: &[Card],
    made: &MadeHand,
    pair_quality: PairQuality,
    turn_type: Option<TurnType>,
) -> HandClass {
    match made.category {
        HandCategory::StraightFlush | HandCategory::Flush | HandCategory::Straight => {
            return HandClass::Monster
        }
        HandCategory::FourOfAKind | HandCategory::FullHouse => return HandClass::Monster,
        HandCategory::ThreeOfAKind => {
            return if made.is_set {
                HandClass::Monster
            } else {
                HandClass::StrongValue
            }
        }
        HandCategory::TwoPair => return HandClass::StrongValue,
        HandCategory::OnePair | HandCategory::HighCard => {}
    }

    let dangerous = is_dangerous(turn_type);

    // One pair made with a board card.
    if let Some(paired) = matched_rank(hand, board) {
        let kick = kicker(hand, paired);
        return match pair_quality {
            PairQuality::TopPair if kick >= Rank::Jack => HandClass::StrongValue,
            PairQuality::TopPair | PairQuality::SecondPair => HandClass::Medium,
            PairQuality::MiddlePair => HandClass::Weak,
            // Dangerous runouts demote bottom pair no matter the kicker.
            PairQuality::BottomPair if dangerous => HandClass::Weak,
            PairQuality::BottomPair if kick == Rank::Ace => HandClass::Medium,
            _ => HandClass::Weak,
        };
    }

    // Pocket pair against the board.
    if hand[0].rank == hand[1].rank {
        return match pair_quality {
            PairQuality::Overpair => HandClass::StrongValue,
            PairQuality::SecondPair => HandClass::Medium,
            PairQuality::Underpair if dangerous => HandClass::Weak,
            PairQuality::Underpair if hand[0].rank >= Rank::Nine => HandClass::Medium,
            _ => HandClass::Weak,
        };
    }

    HandClass::Air
}

fn flush_draw_suit(hand: &Hand, board: &[Card]) -> Option<crate::cards::Suit> {
    let board_counts = suit_counts(board);
    ALL_SUITS.iter().copied().find(|&s| {
        let hero = hand.iter().filter(|c| c.suit == s).count();
        hero > 0 && hero + board_counts[s.index()] == 4
    })
}

fn class_baseline(class: HandClass) -> f64 {
    match class {
        HandClass::Monster => 0.85,
        HandClass::StrongValue => 0.70,
        HandClass::Medium => 0.50,
        HandClass::Weak => 0.30,
        HandClass::Air => 0.10,
    }
}

pub fn hand_features(
    hand: &Hand,
    board: &[Card],
    made: &MadeHand,
    class: HandClass,
    pair_quality: PairQuality,
) -> HandFeatures {
    let river = board.len() >= 5;
    let made_flush = made.has_flush();
    let made_straight = made.has_straight();

    let draw_suit = if river || made_flush {
        None
    } else {
        flush_draw_suit(hand, board)
    };
    let flush_draw = draw_suit.is_some();
    let nut_flush_draw = draw_suit.map_or(false, |s| {
        highest_missing(board, s).map_or(false, |nut| hand.contains(&Card::new(nut, s)))
    });

    let straight_draw = match straight_outs(hand, board) {
        0 => StraightDraw::None,
        1 => StraightDraw::Gutshot,
        _ => StraightDraw::OpenEnded,
    };

    let combo_draw = flush_draw && straight_draw != StraightDraw::None;
    let pair_plus_draw =
        pair_quality.is_pair() && (flush_draw || straight_draw == StraightDraw::OpenEnded);

    let board_counts = suit_counts(board);
    let nut_blocker = hand
        .iter()
        .any(|c| c.rank == Rank::Ace && board_counts[c.suit.index()] >= 3);

    let outs: u32 = match (flush_draw, straight_draw) {
        (true, StraightDraw::OpenEnded) => 15,
        (true, StraightDraw::Gutshot) => 12,
        (true, StraightDraw::None) => 9,
        (false, StraightDraw::OpenEnded) => 8,
        (false, StraightDraw::Gutshot) => 4,
        (false, StraightDraw::None) => 0,
    };
    let per_out = match board.len() {
        3 => 0.04,
        4 => 0.02,
        _ => 0.0,
    };
    let baseline = class_baseline(class);
    let draw_equity = outs as f64 * per_out;
    let equity = (baseline + draw_equity * (1.0 - baseline)).clamp(0.0, 0.85);

    HandFeatures {
        flush_draw,
        nut_flush_draw,
        straight_draw,
        made_straight,
        made_flush,
        nut_straight: made.is_nut_straight,
        nut_flush: made.is_nut_flush,
        wheel_straight: made.is_wheel,
        pair_plus_draw,
        combo_draw,
        nut_blocker,
        equity,
    }
}

pub fn classify_intent(
    class: HandClass,
    pair_quality: PairQuality,
    features: &HandFeatures,
    turn_type: Option<TurnType>,
) -> HandIntent {
    if holds_weak_pair(class, pair_quality) && is_dangerous(turn_type) {
        return HandIntent::GiveUp;
    }
    match class {
        HandClass::Monster | HandClass::StrongValue => return HandIntent::MadeValue,
        _ if features.combo_draw || features.pair_plus_draw => return HandIntent::ComboDraw,
        HandClass::Medium => return HandIntent::ThinValue,
        _ => {}
    }
    if features.has_draw() {
        return HandIntent::Draw;
    }
    match class {
        HandClass::Weak => HandIntent::ThinValue,
        _ => HandIntent::PureBluff,
    }
}

/// Classify with an explicit turn type (pass `None` on the flop).
/// A hole card that also sits on the board is a `DuplicateCard` error.
pub fn classify_with(
    hand: &Hand,
    board: &Board,
    turn_type: Option<TurnType>,
) -> DrillResult<Classification> {
    board.check_hand(hand)?;
    let cards = board.cards();
    let made = evaluate_hand(hand, cards);
    let pair_quality = pair_quality(hand, cards);
    let class = classify_hand_class(hand, cards, &made, pair_quality, turn_type);
    let features = hand_features(hand, cards, &made, class, pair_quality);
    let intent = classify_intent(class, pair_quality, &features, turn_type);
    let river_type = board
        .river()
        .map(|r| crate::texture::classify_river(&cards[..4], r));

    Ok(Classification {
        class,
        pair_quality,
        features,
        intent,
        turn_type,
        river_type,
        category: made.category,
    })
}

/// Classify, deriving the turn type from the board first.
pub fn classify(hand: &Hand, board: &Board) -> DrillResult<Classification> {
    let turn_type = board.turn().map(|t| classify_turn(board.flop(), t));
    classify_with(hand, board, turn_type)
}
