//! Veto points around option construction.
//!
//! Barrel eligibility runs before any options are built; the survivor gate
//! runs after. Neither mutates anything: each either passes or hands back a
//! [`Rejection`] for the retry loop.

use serde::{Deserialize, Serialize};

use crate::cards::{Rank, Street};
use crate::classifier::{holds_weak_pair, HandClass, HandFeatures, HandIntent, PairQuality, StraightDraw};
use crate::context::BettingContext;
use crate::error::{Rejection, Stage};
use crate::leverage::Leverage;
use crate::options::{ActionIntent, OptionSet};
use crate::texture::TurnType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrelEligibility {
    pub can_barrel_small: bool,
    pub can_barrel_large: bool,
    pub reason: Option<String>,
}

impl BarrelEligibility {
    fn both() -> Self {
        BarrelEligibility {
            can_barrel_small: true,
            can_barrel_large: true,
            reason: None,
        }
    }

    fn small_only(reason: &str) -> Self {
        BarrelEligibility {
            can_barrel_small: true,
            can_barrel_large: false,
            reason: Some(reason.to_string()),
        }
    }

    fn neither(reason: String) -> Self {
        BarrelEligibility {
            can_barrel_small: false,
            can_barrel_large: false,
            reason: Some(reason),
        }
    }

    pub fn any(&self) -> bool {
        self.can_barrel_small || self.can_barrel_large
    }
}

fn board_paired(ranks: &[Rank]) -> bool {
    ranks
        .iter()
        .enumerate()
        .any(|(i, r)| ranks[i + 1..].contains(r))
}

pub fn barrel_eligibility(
    class: HandClass,
    pair_quality: PairQuality,
    features: &HandFeatures,
    turn_type: Option<TurnType>,
    board_ranks: &[Rank],
) -> BarrelEligibility {
    let blank = turn_type.map_or(true, |t| t.is_blank());

    if class == HandClass::Air && !features.has_draw() {
        return BarrelEligibility::neither("air with no draw".to_string());
    }

    let weak = holds_weak_pair(class, pair_quality) || class == HandClass::Weak;
    if weak && !blank && !features.has_strong_draw() {
        let turn = turn_type.map_or("none", |t| t.as_str());
        return BarrelEligibility::neither(format!("{} outrun by a {} turn", pair_quality, turn));
    }

    if matches!(class, HandClass::Monster | HandClass::StrongValue) {
        return BarrelEligibility::both();
    }
    if features.nut_flush_draw || features.combo_draw {
        return BarrelEligibility::both();
    }

    if class == HandClass::Medium && !features.has_strong_draw() {
        return BarrelEligibility::small_only("medium strength without a strong draw");
    }

    if features.has_draw() {
        let large = features.straight_draw == StraightDraw::OpenEnded
            || (features.flush_draw && !board_paired(board_ranks));
        return BarrelEligibility {
            can_barrel_small: true,
            can_barrel_large: large,
            reason: (!large).then(|| "weak draw: small sizing only".to_string()),
        };
    }

    BarrelEligibility::small_only("thin value: small sizing only")
}

/// Rejecting wrapper for the orchestrator.
pub fn check_barrel(
    class: HandClass,
    pair_quality: PairQuality,
    features: &HandFeatures,
    turn_type: Option<TurnType>,
    board_ranks: &[Rank],
) -> Result<BarrelEligibility, Rejection> {
    let e = barrel_eligibility(class, pair_quality, features, turn_type, board_ranks);
    if e.any() {
        Ok(e)
    } else {
        let reason = e.reason.unwrap_or_else(|| "no bet size justified".to_string());
        Err(Rejection::new(Stage::BarrelEligibility, reason))
    }
}

/// Hard structural gate on the normalized context.
pub fn context_gate(ctx: &BettingContext, intent: HandIntent) -> Result<(), Rejection> {
    let reject = |reason: &str| Err(Rejection::new(Stage::ContextGate, reason));

    // Three distinct options always include a bet.
    if intent == HandIntent::GiveUp {
        return reject("give-up hand would be offered betting options");
    }
    if ctx.allows_overbet && !ctx.allows_large_bet {
        return reject("overbet permitted without a large bet");
    }
    if ctx.allows_overbet && !ctx.in_position {
        return reject("overbet permitted out of position");
    }
    if ctx.allows_overbet && ctx.street == Street::Flop {
        return reject("overbet permitted on the flop");
    }
    if !ctx.any_bet_allowed() && !ctx.check_dominant {
        return reject("no bet permitted but check is not dominant");
    }
    Ok(())
}

/// A river check-down with nothing to learn.
pub fn is_trivial(ctx: &BettingContext, options: &OptionSet) -> bool {
    ctx.check_dominant
        && ctx.street == Street::River
        && options.anchor_index() == 0
        && options.anchor() == ActionIntent::Check
        && !ctx.nut_advantage
        && ctx.leverage <= Leverage::Low
}

pub fn survivor_gate(ctx: &BettingContext, options: &OptionSet) -> Result<(), Rejection> {
    if is_trivial(ctx, options) {
        return Err(Rejection::new(
            Stage::Survivor,
            format!("trivial river check with {} leverage", ctx.leverage),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_paired() {
        assert!(board_paired(&[Rank::Two, Rank::King, Rank::Two]));
        assert!(!board_paired(&[Rank::Two, Rank::King, Rank::Three]));
    }
}
