use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::{BettingContext, Polarity};
use crate::error::{DrillError, DrillResult};
use crate::leverage::Leverage;

/// Ordered action intents. Index difference is the only distance used when
/// spacing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionIntent {
    Check = 0,
    Small = 1,
    Large = 2,
    Overbet = 3,
}

pub const ALL_INTENTS: [ActionIntent; 4] = [
    ActionIntent::Check,
    ActionIntent::Small,
    ActionIntent::Large,
    ActionIntent::Overbet,
];

impl ActionIntent {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<ActionIntent> {
        ALL_INTENTS.get(i).copied()
    }

    pub fn distance(self, other: ActionIntent) -> usize {
        self.index().abs_diff(other.index())
    }

    pub fn is_bet(self) -> bool {
        self != ActionIntent::Check
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionIntent::Check => "check",
            ActionIntent::Small => "small",
            ActionIntent::Large => "large",
            ActionIntent::Overbet => "overbet",
        }
    }
}

impl fmt::Display for ActionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Bucket a 1-10 level: easy up to 3, medium up to 7, hard above.
    pub fn from_level(level: u8) -> DrillResult<Difficulty> {
        match level {
            1..=3 => Ok(Difficulty::Easy),
            4..=7 => Ok(Difficulty::Medium),
            8..=10 => Ok(Difficulty::Hard),
            _ => Err(DrillError::InvalidValue(format!(
                "difficulty must be 1-10, got {}",
                level
            ))),
        }
    }

    /// Offsets of the two companion options relative to the anchor.
    pub fn spacing(self) -> (i32, i32) {
        match self {
            Difficulty::Easy => (-2, 2),
            Difficulty::Medium => (-1, 2),
            Difficulty::Hard => (-1, 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exactly three distinct intents in ascending order plus the anchor index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    intents: [ActionIntent; 3],
    anchor: usize,
}

impl OptionSet {
    pub fn new(intents: Vec<ActionIntent>, anchor: usize) -> DrillResult<OptionSet> {
        if intents.len() != 3 {
            return Err(DrillError::OptionCount(intents.len()));
        }
        if !intents.windows(2).all(|w| w[0] < w[1]) {
            let names: Vec<&str> = intents.iter().map(|i| i.as_str()).collect();
            return Err(DrillError::InvalidOptions(names.join(",")));
        }
        if anchor >= 3 {
            return Err(DrillError::AnchorOutOfRange(anchor));
        }
        Ok(OptionSet {
            intents: [intents[0], intents[1], intents[2]],
            anchor,
        })
    }

    pub fn intents(&self) -> &[ActionIntent; 3] {
        &self.intents
    }

    pub fn anchor_index(&self) -> usize {
        self.anchor
    }

    pub fn anchor(&self) -> ActionIntent {
        self.intents[self.anchor]
    }

    pub fn contains(&self, intent: ActionIntent) -> bool {
        self.intents.contains(&intent)
    }
}

/// Raw anchor from the context, before it is fitted to the permitted set.
///
/// `check_dominant` with medium+ leverage and a permitted small bet still
/// anchors on a bet. This override is intentional: strong hands keep their
/// betting anchor even when the node as a whole leans check.
pub fn infer_anchor(ctx: &BettingContext) -> ActionIntent {
    if ctx.check_dominant {
        if ctx.leverage >= Leverage::Medium && ctx.allows_small_bet {
            if ctx.polarity == Polarity::Polarized && ctx.allows_large_bet {
                return ActionIntent::Large;
            }
            return ActionIntent::Small;
        }
        return ActionIntent::Check;
    }
    match ctx.polarity {
        Polarity::Merged => ActionIntent::Small,
        Polarity::Polarized => ActionIntent::Large,
    }
}

pub fn permitted_universe(ctx: &BettingContext) -> Vec<ActionIntent> {
    let mut universe = vec![ActionIntent::Check];
    if ctx.allows_small_bet {
        universe.push(ActionIntent::Small);
    }
    if ctx.allows_large_bet {
        universe.push(ActionIntent::Large);
    }
    if ctx.allows_overbet {
        universe.push(ActionIntent::Overbet);
    }
    universe
}

/// Closest intent in `pool` to `target`; the lower intent wins ties.
fn nearest(pool: &[ActionIntent], target: ActionIntent) -> ActionIntent {
    pool.iter()
        .copied()
        .min_by_key(|i| (i.distance(target), i.index()))
        .unwrap_or(ActionIntent::Check)
}

fn offset(anchor: ActionIntent, delta: i32) -> ActionIntent {
    let idx = (anchor.index() as i32 + delta).clamp(0, 3) as usize;
    ALL_INTENTS[idx]
}

pub fn build_options(ctx: &BettingContext, difficulty: Difficulty) -> OptionSet {
    let universe = permitted_universe(ctx);
    let anchor = nearest(&universe, infer_anchor(ctx));

    let (lo, hi) = difficulty.spacing();
    let mut chosen: BTreeSet<ActionIntent> = BTreeSet::new();
    chosen.insert(anchor);
    for delta in [lo, hi] {
        chosen.insert(nearest(&universe, offset(anchor, delta)));
    }

    // Top up from the permitted universe, then from the full ordering.
    for pool in [universe.as_slice(), ALL_INTENTS.as_slice()] {
        let mut extra: Vec<ActionIntent> = pool.iter().copied().filter(|i| !chosen.contains(i)).collect();
        extra.sort_by_key(|i| (i.distance(anchor), i.index()));
        for i in extra {
            if chosen.len() >= 3 {
                break;
            }
            chosen.insert(i);
        }
    }

    let sorted: Vec<ActionIntent> = chosen.into_iter().collect();
    let anchor_index = sorted.iter().position(|&i| i == anchor).unwrap_or(0);
    OptionSet {
        intents: [sorted[0], sorted[1], sorted[2]],
        anchor: anchor_index,
    }
}
