//! Teaching metadata for a built option set.
//!
//! Works only from abstractions: the option set, the betting context, the
//! hand intent, street and difficulty. Cards and chip amounts never reach
//! this module.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Street;
use crate::classifier::HandIntent;
use crate::context::{BettingContext, Polarity};
use crate::error::DrillResult;
use crate::leverage::RangeAdvantage;
use crate::math_engine::{round2, StackPressure};
use crate::options::{ActionIntent, Difficulty, OptionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptTag {
    ValueBetting,
    ThinValue,
    Protection,
    SemiBluff,
    Bluffing,
    PotControl,
    Slowplay,
    Overbetting,
    Polarization,
    RangeAdvantage,
    NutAdvantage,
    OutOfPosition,
    CheckDominance,
    StackPressure,
}

impl ConceptTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ConceptTag::ValueBetting => "value_betting",
            ConceptTag::ThinValue => "thin_value",
            ConceptTag::Protection => "protection",
            ConceptTag::SemiBluff => "semi_bluff",
            ConceptTag::Bluffing => "bluffing",
            ConceptTag::PotControl => "pot_control",
            ConceptTag::Slowplay => "slowplay",
            ConceptTag::Overbetting => "overbetting",
            ConceptTag::Polarization => "polarization",
            ConceptTag::RangeAdvantage => "range_advantage",
            ConceptTag::NutAdvantage => "nut_advantage",
            ConceptTag::OutOfPosition => "out_of_position",
            ConceptTag::CheckDominance => "check_dominance",
            ConceptTag::StackPressure => "stack_pressure",
        }
    }
}

impl fmt::Display for ConceptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedagogyOutput {
    pub frequencies: [f64; 3],
    pub scores: [f64; 3],
    pub summary: String,
    pub notes: Vec<String>,
    pub concepts: Vec<ConceptTag>,
}

// ---------------------------------------------------------------------------
// Frequencies and scores
// ---------------------------------------------------------------------------

/// (best, second, worst) in hundredths.
fn frequency_table(difficulty: Difficulty) -> (i32, i32, i32) {
    match difficulty {
        Difficulty::Easy => (70, 20, 10),
        Difficulty::Medium => (50, 30, 20),
        Difficulty::Hard => (40, 35, 25),
    }
}

/// (best score, gap per index step).
fn score_table(difficulty: Difficulty) -> (f64, f64) {
    match difficulty {
        Difficulty::Easy => (2.4, 0.5),
        Difficulty::Medium => (2.2, 0.3),
        Difficulty::Hard => (2.0, 0.15),
    }
}

/// Indices of the non-anchor options as (second, worst). The companion
/// closer to the anchor intent is "second"; the lower intent wins ties.
fn rank_companions(options: &OptionSet) -> (usize, usize) {
    let anchor = options.anchor();
    let mut others: Vec<usize> = (0..3).filter(|&i| i != options.anchor_index()).collect();
    others.sort_by_key(|&i| {
        let intent = options.intents()[i];
        (intent.distance(anchor), intent.index())
    });
    (others[0], others[1])
}

pub fn frequencies(options: &OptionSet, ctx: &BettingContext, difficulty: Difficulty) -> [f64; 3] {
    let (mut best, mut second, mut worst) = frequency_table(difficulty);

    if ctx.check_dominant && options.anchor() == ActionIntent::Check {
        best = (best + 10).min(100);
        second = (second - 5).max(0);
        worst = (worst - 5).max(0);
    }
    if ctx.polarity == Polarity::Polarized && difficulty != Difficulty::Hard {
        best = (best + 5).min(100);
        worst = (worst - 5).max(0);
    }
    // Anything lost to clamping is absorbed by the anchor.
    best += 100 - (best + second + worst);

    let (second_idx, worst_idx) = rank_companions(options);
    let mut cents = [0i32; 3];
    cents[options.anchor_index()] = best;
    cents[second_idx] = second;
    cents[worst_idx] = worst;
    cents.map(|c| c as f64 / 100.0)
}

pub fn scores(options: &OptionSet, difficulty: Difficulty) -> [f64; 3] {
    let (best, gap) = score_table(difficulty);
    let anchor = options.anchor_index();
    [0usize, 1, 2].map(|i| round2(best - gap * i.abs_diff(anchor) as f64))
}

// ---------------------------------------------------------------------------
// Teaching text
// ---------------------------------------------------------------------------

/// What a piece of teaching text recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stance {
    Bet,
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateKind {
    Value,
    ThinValue,
    SemiBluff,
    Bluff,
    PotControl,
    Trap,
    GiveUp,
    CheckBack,
}

struct Template {
    kind: TemplateKind,
    stance: Stance,
    summary: String,
    notes: Vec<String>,
}

fn size_phrase(intent: ActionIntent) -> &'static str {
    match intent {
        ActionIntent::Check => "a check",
        ActionIntent::Small => "a small bet",
        ActionIntent::Large => "a large bet",
        ActionIntent::Overbet => "an overbet",
    }
}

fn notes(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// Trap text needs every one of its four conditions.
fn trap_allowed(ctx: &BettingContext, street: Street, anchor: ActionIntent) -> bool {
    street == Street::River
        && ctx.polarity == Polarity::Polarized
        && ctx.nut_advantage
        && anchor == ActionIntent::Check
}

fn select_template(intent: HandIntent, ctx: &BettingContext, street: Street, anchor: ActionIntent) -> Template {
    if trap_allowed(ctx, street, anchor) {
        return Template {
            kind: TemplateKind::Trap,
            stance: Stance::Check,
            summary: "Check to trap: your range is polarized and you hold the nuts, so let villain bluff into you."
                .to_string(),
            notes: notes(&[
                "Checking keeps villain's bluffs in.",
                "Your checking range is protected by the strongest hands.",
            ]),
        };
    }

    let size = size_phrase(anchor);
    match (intent, anchor) {
        (HandIntent::GiveUp, _) => Template {
            kind: TemplateKind::GiveUp,
            stance: Stance::Check,
            summary: "Give up: this runout has overtaken your weak pair.".to_string(),
            notes: notes(&["Weak pairs rarely improve here.", "Save chips for better spots."]),
        },
        (HandIntent::MadeValue | HandIntent::ThinValue, ActionIntent::Check) => Template {
            kind: TemplateKind::PotControl,
            stance: Stance::Check,
            summary: "Check for pot control: your hand has showdown value but gains little from building the pot."
                .to_string(),
            notes: notes(&[
                "Worse hands rarely call a bet here.",
                "Checking keeps the pot manageable.",
            ]),
        },
        (HandIntent::MadeValue, _) => Template {
            kind: TemplateKind::Value,
            stance: Stance::Bet,
            summary: format!("Bet for value with {}: worse hands will continue.", size),
            notes: notes(&[
                "Build the pot while you are ahead.",
                "Size toward the worse hands that call.",
            ]),
        },
        (HandIntent::ThinValue, _) => Template {
            kind: TemplateKind::ThinValue,
            stance: Stance::Bet,
            summary: format!("Thin value with {}: target the weaker part of villain's range.", size),
            notes: notes(&["Keep the size modest.", "Be ready to slow down facing a raise."]),
        },
        (HandIntent::ComboDraw | HandIntent::Draw, _) => Template {
            kind: TemplateKind::SemiBluff,
            stance: Stance::Bet,
            summary: format!("Semi-bluff with {}: fold equity plus your outs.", size),
            notes: notes(&["You win when villain folds.", "You can still improve when called."]),
        },
        (HandIntent::PureBluff, _) => Template {
            kind: TemplateKind::Bluff,
            stance: Stance::Bet,
            summary: format!("Bluff with {}: your hand cannot win at showdown.", size),
            notes: notes(&["Pick bluffs that block villain's calls.", "Stay balanced with your value range."]),
        },
    }
}

const BET_PHRASES: [&str; 6] = ["bet for value", "semi-bluff", "bluff with", "thin value with", "raise", "barrel"];

fn asserts_bet(t: &Template) -> bool {
    if t.stance == Stance::Bet {
        return true;
    }
    let texts = std::iter::once(&t.summary).chain(t.notes.iter());
    texts
        .map(|s| s.to_lowercase())
        .any(|s| BET_PHRASES.iter().any(|p| s.contains(p)))
}

fn check_back(intent: HandIntent) -> Template {
    let reason = match intent {
        HandIntent::ComboDraw | HandIntent::Draw => "take the free card with your draw",
        HandIntent::PureBluff => "this is not a profitable bluffing spot",
        _ => "betting here does not get called by worse",
    };
    Template {
        kind: TemplateKind::CheckBack,
        stance: Stance::Check,
        summary: format!("Check: {}.", reason),
        notes: notes(&[
            "Check is the strongest option at this node.",
            "Betting folds out worse and gets called by better.",
        ]),
    }
}

/// Text that recommends betting under a check anchor is replaced wholesale.
fn enforce_consistency(t: Template, anchor: ActionIntent, intent: HandIntent) -> Template {
    if anchor == ActionIntent::Check && asserts_bet(&t) {
        log::debug!("replacing {:?} text under a check anchor", t.kind);
        return check_back(intent);
    }
    t
}

fn concepts(kind: TemplateKind, intent: HandIntent, ctx: &BettingContext, anchor: ActionIntent) -> Vec<ConceptTag> {
    let betting = anchor.is_bet();
    let mut tags = Vec::new();

    match kind {
        TemplateKind::Value => tags.push(ConceptTag::ValueBetting),
        TemplateKind::ThinValue => tags.push(ConceptTag::ThinValue),
        TemplateKind::SemiBluff => tags.push(ConceptTag::SemiBluff),
        TemplateKind::Bluff => tags.push(ConceptTag::Bluffing),
        TemplateKind::PotControl => tags.push(ConceptTag::PotControl),
        TemplateKind::Trap => tags.push(ConceptTag::Slowplay),
        TemplateKind::GiveUp | TemplateKind::CheckBack => {}
    }
    if betting && intent == HandIntent::MadeValue && ctx.street != Street::River {
        tags.push(ConceptTag::Protection);
    }
    if anchor == ActionIntent::Overbet {
        tags.push(ConceptTag::Overbetting);
    }
    if ctx.polarity == Polarity::Polarized {
        tags.push(ConceptTag::Polarization);
    }
    if betting && ctx.range_advantage == RangeAdvantage::Hero {
        tags.push(ConceptTag::RangeAdvantage);
    }
    if ctx.nut_advantage {
        tags.push(ConceptTag::NutAdvantage);
    }
    if !ctx.in_position {
        tags.push(ConceptTag::OutOfPosition);
    }
    if ctx.check_dominant && anchor == ActionIntent::Check {
        tags.push(ConceptTag::CheckDominance);
    }
    if ctx.stack_pressure == StackPressure::High {
        tags.push(ConceptTag::StackPressure);
    }
    tags
}

pub fn teach(
    options: &OptionSet,
    ctx: &BettingContext,
    intent: HandIntent,
    street: Street,
    difficulty: Difficulty,
) -> PedagogyOutput {
    let anchor = options.anchor();
    let template = select_template(intent, ctx, street, anchor);
    let template = enforce_consistency(template, anchor, intent);

    PedagogyOutput {
        frequencies: frequencies(options, ctx, difficulty),
        scores: scores(options, difficulty),
        concepts: concepts(template.kind, intent, ctx, anchor),
        summary: template.summary,
        notes: template.notes,
    }
}

/// Entry point for callers holding raw intents; wrong counts, duplicates and
/// a bad anchor are contract violations.
pub fn teach_intents(
    intents: &[ActionIntent],
    anchor_index: usize,
    ctx: &BettingContext,
    intent: HandIntent,
    street: Street,
    difficulty: Difficulty,
) -> DrillResult<PedagogyOutput> {
    let options = OptionSet::new(intents.to_vec(), anchor_index)?;
    Ok(teach(&options, ctx, intent, street, difficulty))
}
