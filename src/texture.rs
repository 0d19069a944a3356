use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Board, Card};
use crate::hand_evaluator::{nut_straight_high, suit_counts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectedness {
    Disconnected,
    SemiConnected,
    Connected,
}

impl fmt::Display for Connectedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectedness::Disconnected => write!(f, "disconnected"),
            Connectedness::SemiConnected => write!(f, "semi-connected"),
            Connectedness::Connected => write!(f, "connected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wetness {
    Dry,
    Medium,
    Wet,
}

impl fmt::Display for Wetness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wetness::Dry => write!(f, "dry"),
            Wetness::Medium => write!(f, "medium"),
            Wetness::Wet => write!(f, "wet"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardTexture {
    pub is_paired: bool,
    pub is_monotone: bool,
    pub is_two_tone: bool,
    pub is_rainbow: bool,
    pub connectedness: Connectedness,
    pub wetness: Wetness,
}

impl BoardTexture {
    /// Boards where draws are live enough to change the best hand.
    pub fn is_dynamic(&self) -> bool {
        self.wetness != Wetness::Dry
    }
}

/// Texture of the flop cards; later streets are read through `RunoutType`.
pub fn analyze_board(flop: &[Card]) -> BoardTexture {
    let max_suit = suit_counts(flop).into_iter().max().unwrap_or(0);
    let is_monotone = max_suit >= 3;
    let is_two_tone = max_suit == 2;
    let is_rainbow = max_suit <= 1;

    let mut rank_counts: HashMap<u8, u32> = HashMap::new();
    for c in flop {
        *rank_counts.entry(c.value()).or_insert(0) += 1;
    }
    let is_paired = rank_counts.values().any(|&n| n >= 2);

    let mut unique_vals: Vec<u8> = flop.iter().map(|c| c.value()).collect::<HashSet<_>>().into_iter().collect();
    unique_vals.sort_unstable();

    let gaps: Vec<u8> = unique_vals.windows(2).map(|w| w[1] - w[0]).collect();
    let has_connected = gaps.iter().any(|&g| g == 1);
    let has_one_gap = gaps.iter().any(|&g| g == 2);

    let connectedness = if has_connected && gaps.iter().filter(|&&g| g <= 2).count() >= 2 {
        Connectedness::Connected
    } else if has_connected || has_one_gap {
        Connectedness::SemiConnected
    } else {
        Connectedness::Disconnected
    };

    let mut wet_score: i32 = 0;
    if is_monotone {
        wet_score += 3;
    } else if is_two_tone {
        wet_score += 1;
    }
    match connectedness {
        Connectedness::Connected => wet_score += 2,
        Connectedness::SemiConnected => wet_score += 1,
        Connectedness::Disconnected => {}
    }
    if is_paired {
        wet_score -= 1;
    }

    let wetness = if wet_score >= 3 {
        Wetness::Wet
    } else if wet_score >= 1 {
        Wetness::Medium
    } else {
        Wetness::Dry
    };

    BoardTexture {
        is_paired,
        is_monotone,
        is_two_tone,
        is_rainbow,
        connectedness,
        wetness,
    }
}

/// How a turn or river card changes the board it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunoutType {
    Blank,
    Overcard,
    StraightCompleter,
    FlushCompleter,
    Paired,
}

pub type TurnType = RunoutType;
pub type RiverType = RunoutType;

impl RunoutType {
    pub fn is_blank(self) -> bool {
        self == RunoutType::Blank
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunoutType::Blank => "blank",
            RunoutType::Overcard => "overcard",
            RunoutType::StraightCompleter => "straight_completer",
            RunoutType::FlushCompleter => "flush_completer",
            RunoutType::Paired => "paired",
        }
    }
}

impl fmt::Display for RunoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify `card` against the cards already on board. First match wins.
pub fn classify_runout(prior: &[Card], card: Card) -> RunoutType {
    if prior.iter().any(|c| c.rank == card.rank) {
        return RunoutType::Paired;
    }

    if suit_counts(prior)[card.suit.index()] >= 2 {
        return RunoutType::FlushCompleter;
    }

    // The best straight two hole cards can make moved up (or first appeared).
    let mut after: Vec<Card> = prior.to_vec();
    after.push(card);
    if nut_straight_high(&after).is_some() && nut_straight_high(&after) != nut_straight_high(prior) {
        return RunoutType::StraightCompleter;
    }

    if prior.iter().all(|c| c.rank < card.rank) {
        return RunoutType::Overcard;
    }

    RunoutType::Blank
}

pub fn classify_turn(flop: &[Card], turn: Card) -> TurnType {
    classify_runout(flop, turn)
}

pub fn classify_river(turn_board: &[Card], river: Card) -> RiverType {
    classify_runout(turn_board, river)
}

/// Turn and river types for a board, whichever have been dealt.
pub fn runout_types(board: &Board) -> (Option<TurnType>, Option<RiverType>) {
    let cards = board.cards();
    let turn = board.turn().map(|t| classify_turn(&cards[..3], t));
    let river = board.river().map(|r| classify_river(&cards[..4], r));
    (turn, river)
}
