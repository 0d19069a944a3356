//! The finished drill record and how abstract intents become sized actions.

use serde::{Deserialize, Serialize};

use crate::cards::{Hand, Street};
use crate::classifier::{HandClass, HandIntent};
use crate::error::{Rejection, Stage};
use crate::leverage::{resolve_all_in, AllInDecision, Leverage, SizeSet};
use crate::options::{ActionIntent, OptionSet};
use crate::pedagogy::ConceptTag;
use crate::scenario::{HistoryEntry, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Check,
    Bet,
    Allin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedOption {
    pub action: ActionKind,
    pub intent: ActionIntent,
    /// Percent of the pot; 0 for a check.
    pub size_pct: u32,
    pub amount: f64,
}

impl RenderedOption {
    pub fn label(&self) -> String {
        match self.action {
            ActionKind::Check => "Check".to_string(),
            ActionKind::Bet => format!("Bet {}% ({:.2})", self.size_pct, self.amount),
            ActionKind::Allin => format!("All-in ({:.2})", self.amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroInfo {
    pub position: Position,
    pub cards: Vec<String>,
    pub hand_class: String,
    pub stack: f64,
    pub in_position: bool,
    pub is_opener: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillainInfo {
    pub position: Position,
    pub stack: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub best_index: usize,
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotMeta {
    pub concepts: Vec<ConceptTag>,
    pub summary: String,
    pub notes: Vec<String>,
    pub frequencies: Vec<f64>,
    pub intent: HandIntent,
    pub hand_class: HandClass,
    pub leverage: Leverage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub street: Street,
    pub difficulty: u8,
    pub tags: Vec<String>,
    pub hero: HeroInfo,
    pub villain: VillainInfo,
    pub board: Vec<String>,
    pub pot: f64,
    pub history: Vec<HistoryEntry>,
    pub options: Vec<RenderedOption>,
    pub solution: Solution,
    pub meta: SpotMeta,
}

impl Spot {
    pub fn best_option(&self) -> Option<&RenderedOption> {
        self.options.get(self.solution.best_index)
    }

    pub fn offers_bet(&self) -> bool {
        self.options.iter().any(|o| o.action != ActionKind::Check)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn card_strings(hand: &Hand) -> Vec<String> {
    hand.iter().map(|c| c.to_string()).collect()
}

fn size_for(intent: ActionIntent, sizes: &SizeSet) -> u32 {
    match intent {
        ActionIntent::Check => 0,
        ActionIntent::Small => sizes.small,
        ActionIntent::Large => sizes.large,
        ActionIntent::Overbet => sizes.overbet,
    }
}

/// Turn the three intents into concrete actions. Two bets that both resolve
/// to an all-in would leave the student two identical answers, so the spot
/// is rejected instead.
pub fn render_options(
    options: &OptionSet,
    sizes: &SizeSet,
    pot: f64,
    stack: f64,
) -> Result<Vec<RenderedOption>, Rejection> {
    let rendered: Vec<RenderedOption> = options
        .intents()
        .iter()
        .map(|&intent| {
            let pct = size_for(intent, sizes);
            if intent == ActionIntent::Check {
                return RenderedOption {
                    action: ActionKind::Check,
                    intent,
                    size_pct: 0,
                    amount: 0.0,
                };
            }
            match resolve_all_in(pot, stack, pct) {
                AllInDecision::Bet(amount) => RenderedOption {
                    action: ActionKind::Bet,
                    intent,
                    size_pct: pct,
                    amount,
                },
                AllInDecision::AllIn(amount) => RenderedOption {
                    action: ActionKind::Allin,
                    intent,
                    size_pct: pct,
                    amount,
                },
            }
        })
        .collect();

    let all_ins = rendered.iter().filter(|o| o.action == ActionKind::Allin).count();
    if all_ins > 1 {
        return Err(Rejection::new(
            Stage::AllInCollapse,
            format!("{} options collapse to the same all-in", all_ins),
        ));
    }
    Ok(rendered)
}
