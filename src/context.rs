//! Betting-permission normalizer.
//!
//! Ten rules run in a fixed order over an explicit permission state. Rules may
//! grant only before any restriction has touched the same permission; once a
//! permission is revoked it stays revoked, and check dominance never clears.
//! Each rule leaves one line in the reason trace, which nothing downstream
//! reads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Street;
use crate::classifier::HandClass;
use crate::error::DrillResult;
use crate::leverage::{nut_advantage, range_advantage, Leverage, RangeAdvantage};
use crate::math_engine::{stack_pressure, StackPressure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Merged,
    Polarized,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Merged => write!(f, "merged"),
            Polarity::Polarized => write!(f, "polarized"),
        }
    }
}

/// Made-hand signals the normalizer needs from the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MadeFlags {
    pub has_straight: bool,
    pub has_flush: bool,
    pub combo_draw: bool,
    pub pair_plus_draw: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextInput {
    pub street: Street,
    pub in_position: bool,
    pub leverage: Leverage,
    pub range_advantage: RangeAdvantage,
    pub nut_advantage: bool,
    pub effective_stack: f64,
    pub pot: f64,
    pub hand_class: HandClass,
    pub flags: MadeFlags,
}

/// The one record every downstream stage reads. Built once per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingContext {
    pub street: Street,
    pub in_position: bool,
    pub leverage: Leverage,
    pub polarity: Polarity,
    pub range_advantage: RangeAdvantage,
    pub nut_advantage: bool,
    pub stack_pressure: StackPressure,
    pub check_dominant: bool,
    pub allows_small_bet: bool,
    pub allows_large_bet: bool,
    pub allows_overbet: bool,
    /// Audit trail; never consulted for decisions.
    pub reasons: Vec<String>,
}

impl BettingContext {
    pub fn any_bet_allowed(&self) -> bool {
        self.allows_small_bet || self.allows_large_bet || self.allows_overbet
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Permission {
    Small,
    Large,
    Overbet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionState {
    pub polarity: Polarity,
    pub check_dominant: bool,
    pub small: bool,
    pub large: bool,
    pub overbet: bool,
    revoked: [bool; 3],
}

impl PermissionState {
    fn initial() -> Self {
        PermissionState {
            polarity: Polarity::Merged,
            check_dominant: false,
            small: false,
            large: false,
            overbet: false,
            revoked: [false; 3],
        }
    }

    fn slot(&mut self, p: Permission) -> &mut bool {
        match p {
            Permission::Small => &mut self.small,
            Permission::Large => &mut self.large,
            Permission::Overbet => &mut self.overbet,
        }
    }

    fn grant(mut self, p: Permission) -> Self {
        if !self.revoked[p as usize] {
            *self.slot(p) = true;
        }
        self
    }

    fn revoke(mut self, p: Permission) -> Self {
        *self.slot(p) = false;
        self.revoked[p as usize] = true;
        self
    }

    fn dominate(mut self) -> Self {
        self.check_dominant = true;
        self
    }

    fn summary(&self) -> String {
        format!(
            "small={} large={} overbet={} check_dominant={}",
            self.small, self.large, self.overbet, self.check_dominant
        )
    }
}

struct Node<'a> {
    input: &'a ContextInput,
    pressure: StackPressure,
}

struct Step {
    state: PermissionState,
    note: String,
}

fn step(state: PermissionState, note: impl Into<String>) -> Step {
    Step {
        state,
        note: note.into(),
    }
}

type Rule = fn(PermissionState, &Node) -> Step;

const RULES: [Rule; 10] = [
    street_polarity,
    out_of_position_dominance,
    leverage_sizes,
    nut_advantage_unlock,
    stack_pressure_unlock,
    range_disadvantage_lock,
    river_showdown_clamp,
    turn_probe_clamp,
    sanity_clamp,
    out_of_position_overbet_clamp,
];

fn street_polarity(mut s: PermissionState, n: &Node) -> Step {
    let i = n.input;
    s.polarity = match i.street {
        Street::Flop => Polarity::Merged,
        Street::Turn if i.leverage == Leverage::High => Polarity::Polarized,
        Street::River if i.leverage == Leverage::High || i.nut_advantage => Polarity::Polarized,
        Street::Turn | Street::River => Polarity::Merged,
    };
    step(s, format!("street {}: {} base", i.street, s.polarity))
}

fn out_of_position_dominance(s: PermissionState, n: &Node) -> Step {
    let i = n.input;
    if i.in_position {
        return step(s, "in position: no forced check");
    }
    let protection = i.street != Street::River
        && matches!(i.hand_class, HandClass::StrongValue | HandClass::Medium);
    let combo_equity = i.flags.combo_draw || i.flags.pair_plus_draw;
    if protection || combo_equity || i.leverage >= Leverage::Medium {
        return step(s, "out of position but hand can lead");
    }
    step(s.dominate(), "out of position without protection or leverage: check dominant")
}

fn leverage_sizes(s: PermissionState, n: &Node) -> Step {
    let lev = n.input.leverage;
    let s = match lev {
        Leverage::None => s,
        Leverage::Low => s.grant(Permission::Small),
        Leverage::Medium | Leverage::High => s.grant(Permission::Small).grant(Permission::Large),
    };
    step(s, format!("leverage {}: {}", lev, s.summary()))
}

fn nut_advantage_unlock(s: PermissionState, n: &Node) -> Step {
    let i = n.input;
    if !(i.nut_advantage && i.in_position && i.street != Street::Flop) {
        return step(s, "no in-position nut advantage off the flop");
    }
    let mut s = s.grant(Permission::Large);
    if i.street == Street::River {
        s = s.grant(Permission::Overbet);
    }
    step(s, format!("nut advantage in position: {}", s.summary()))
}

fn stack_pressure_unlock(s: PermissionState, n: &Node) -> Step {
    let lev = n.input.leverage;
    if n.pressure != StackPressure::High || lev == Leverage::None {
        return step(s, format!("stack pressure {}: no unlock", n.pressure));
    }
    let mut s = s.grant(Permission::Large);
    if lev >= Leverage::Medium {
        s = s.grant(Permission::Overbet);
    }
    step(s, format!("high stack pressure: {}", s.summary()))
}

fn range_disadvantage_lock(s: PermissionState, n: &Node) -> Step {
    if n.input.range_advantage != RangeAdvantage::Villain {
        return step(s, format!("range advantage {}: no lock", n.input.range_advantage));
    }
    let s = s
        .revoke(Permission::Large)
        .revoke(Permission::Overbet)
        .dominate();
    step(s, "villain range advantage: large and overbet locked out, check dominant")
}

fn river_showdown_clamp(s: PermissionState, n: &Node) -> Step {
    let i = n.input;
    let showdown_only = i.hand_class == HandClass::Medium;
    if i.street == Street::River && !i.in_position && showdown_only && !i.nut_advantage {
        let s = s
            .revoke(Permission::Small)
            .revoke(Permission::Large)
            .revoke(Permission::Overbet)
            .dominate();
        return step(s, "river out of position with showdown value: check only");
    }
    step(s, "river showdown clamp not applicable")
}

fn turn_probe_clamp(s: PermissionState, n: &Node) -> Step {
    let i = n.input;
    if i.street == Street::Turn && matches!(i.leverage, Leverage::Low | Leverage::Medium) {
        let s = s.revoke(Permission::Large).revoke(Permission::Overbet);
        return step(s, format!("turn with {} leverage: small probes only", i.leverage));
    }
    step(s, "turn probe clamp not applicable")
}

fn sanity_clamp(s: PermissionState, _n: &Node) -> Step {
    if !s.small && !s.large {
        let s = s.revoke(Permission::Overbet).dominate();
        return step(s, "no small or large bet permitted: check dominant");
    }
    step(s, "sanity: a bet size remains")
}

fn out_of_position_overbet_clamp(s: PermissionState, n: &Node) -> Step {
    if !n.input.in_position {
        let s = s.revoke(Permission::Overbet);
        return step(s, "out of position: overbet removed");
    }
    step(s, "in position: overbet untouched")
}

/// Run the rule cascade over explicit inputs.
pub fn normalize(input: &ContextInput) -> DrillResult<BettingContext> {
    let node = Node {
        input,
        pressure: stack_pressure(input.effective_stack, input.pot)?,
    };

    let mut reasons = Vec::with_capacity(RULES.len());
    let state = RULES
        .iter()
        .enumerate()
        .fold(PermissionState::initial(), |state, (i, rule)| {
            let Step { state, note } = rule(state, &node);
            reasons.push(format!("R{} {}", i + 1, note));
            state
        });

    for r in &reasons {
        log::trace!("{}", r);
    }

    Ok(BettingContext {
        street: input.street,
        in_position: input.in_position,
        leverage: input.leverage,
        polarity: state.polarity,
        range_advantage: input.range_advantage,
        nut_advantage: input.nut_advantage,
        stack_pressure: node.pressure,
        check_dominant: state.check_dominant,
        allows_small_bet: state.small,
        allows_large_bet: state.large,
        allows_overbet: state.overbet,
        reasons,
    })
}

/// Derive range and nut advantage, then normalize.
#[allow(clippy::too_many_arguments)]
pub fn build_context(
    street: Street,
    in_position: bool,
    leverage: Leverage,
    effective_stack: f64,
    pot: f64,
    is_opener: bool,
    hand_class: HandClass,
    flags: MadeFlags,
) -> DrillResult<BettingContext> {
    let input = ContextInput {
        street,
        in_position,
        leverage,
        range_advantage: range_advantage(is_opener, in_position),
        nut_advantage: nut_advantage(hand_class, flags.has_straight, flags.has_flush),
        effective_stack,
        pot,
        hand_class,
        flags,
    };
    normalize(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoked_permission_cannot_be_regranted() {
        let s = PermissionState::initial()
            .revoke(Permission::Large)
            .grant(Permission::Large);
        assert!(!s.large);
    }

    #[test]
    fn test_grant_before_revoke_is_cleared() {
        let s = PermissionState::initial()
            .grant(Permission::Small)
            .revoke(Permission::Small);
        assert!(!s.small);
    }
}
