//! Seeded scenario sampling: who opened, who is in position, which board,
//! which hero hand, and how the pot got to its current size.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{Board, Deck, Hand, Street};
use crate::error::{Rejection, Stage, StageResult};
use crate::math_engine::round2;
use crate::ranges::{caller_key, live_combos, lookup, opener_key};

pub const STARTING_STACK: f64 = 100.0;
const SMALL_BLIND: f64 = 0.5;
const BIG_BLIND: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    SB,
    BB,
    CO,
    BTN,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::SB => "SB",
            Position::BB => "BB",
            Position::CO => "CO",
            Position::BTN => "BTN",
        }
    }

    /// Postflop acting order; higher acts later.
    fn postflop_order(self) -> u8 {
        match self {
            Position::SB => 0,
            Position::BB => 1,
            Position::CO => 2,
            Position::BTN => 3,
        }
    }

    fn blind(self) -> f64 {
        match self {
            Position::SB => SMALL_BLIND,
            Position::BB => BIG_BLIND,
            Position::CO | Position::BTN => 0.0,
        }
    }

    /// Open-raise size in big blinds.
    fn open_size(self) -> f64 {
        match self {
            Position::SB => 3.0,
            _ => 2.5,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opener against caller.
pub const MATCHUPS: [(Position, Position); 4] = [
    (Position::BTN, Position::BB),
    (Position::CO, Position::BB),
    (Position::CO, Position::BTN),
    (Position::SB, Position::BB),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Preflop,
    Flop,
    Turn,
    River,
}

impl From<Street> for Round {
    fn from(s: Street) -> Self {
        match s {
            Street::Flop => Round::Flop,
            Street::Turn => Round::Turn,
            Street::River => Round::River,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Post,
    Raise,
    Call,
    Check,
    Bet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub round: Round,
    pub actor: Position,
    pub action: Move,
    /// Chips put in by this action.
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub hero: Hand,
    pub hero_class: String,
    pub board: Board,
    pub street: Street,
    pub hero_position: Position,
    pub villain_position: Position,
    pub is_opener: bool,
    pub in_position: bool,
    pub effective_stack: f64,
    pub pot: f64,
    pub history: Vec<HistoryEntry>,
}

struct Ledger {
    pot: f64,
    stack: f64,
    history: Vec<HistoryEntry>,
}

impl Ledger {
    fn push(&mut self, round: Round, actor: Position, action: Move, amount: f64) {
        self.history.push(HistoryEntry {
            round,
            actor,
            action,
            amount,
        });
    }

    /// Bet of `fraction` of the pot, called.
    fn bet_called(&mut self, round: Round, bettor: Position, caller: Position, fraction: f64) {
        let amount = round2((self.pot * fraction).min(self.stack));
        self.push(round, bettor, Move::Bet, amount);
        self.push(round, caller, Move::Call, amount);
        self.pot = round2(self.pot + 2.0 * amount);
        self.stack = round2(self.stack - amount);
    }

    fn checks(&mut self, round: Round, first: Position, second: Position) {
        self.push(round, first, Move::Check, 0.0);
        self.push(round, second, Move::Check, 0.0);
    }
}

/// Blinds, an open and a call, then one action sequence per earlier street.
fn simulate<R: Rng + ?Sized>(
    rng: &mut R,
    opener: Position,
    caller: Position,
    street: Street,
    hero_in_position: bool,
    villain: Position,
) -> Ledger {
    let open = opener.open_size();
    let mut ledger = Ledger {
        pot: 0.0,
        stack: STARTING_STACK - open,
        history: Vec::new(),
    };

    for p in [Position::SB, Position::BB] {
        ledger.push(Round::Preflop, p, Move::Post, p.blind());
    }
    ledger.push(Round::Preflop, opener, Move::Raise, open - opener.blind());
    ledger.push(Round::Preflop, caller, Move::Call, open - caller.blind());
    let dead: f64 = [Position::SB, Position::BB]
        .iter()
        .filter(|p| **p != opener && **p != caller)
        .map(|p| p.blind())
        .sum();
    ledger.pot = round2(2.0 * open + dead);

    let (first, last) = if opener.postflop_order() < caller.postflop_order() {
        (opener, caller)
    } else {
        (caller, opener)
    };

    let earlier: &[(Round, f64)] = match street {
        Street::Flop => &[],
        Street::Turn => &[(Round::Flop, 0.33)],
        Street::River => &[(Round::Flop, 0.33), (Round::Turn, 0.66)],
    };
    for &(round, fraction) in earlier {
        if rng.gen_bool(0.6) {
            ledger.bet_called(round, opener, caller, fraction);
        } else {
            ledger.checks(round, first, last);
        }
    }

    // In position, hero faces a check on the current street.
    if hero_in_position {
        ledger.push(Round::from(street), villain, Move::Check, 0.0);
    }
    ledger
}

/// Sample one scenario. Rejections come back when the chart has no range
/// for the matchup or every combo of the sampled class is blocked.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, street: Option<Street>) -> StageResult<Scenario> {
    let &(opener, caller) = MATCHUPS
        .choose(rng)
        .ok_or_else(|| Rejection::new(Stage::Range, "no matchups configured"))?;
    let is_opener = rng.gen_bool(0.5);
    let (hero_pos, villain_pos) = if is_opener { (opener, caller) } else { (caller, opener) };
    let in_position = hero_pos.postflop_order() > villain_pos.postflop_order();

    let street = match street {
        Some(s) => s,
        None => *[Street::Flop, Street::Turn, Street::River]
            .choose(rng)
            .unwrap_or(&Street::Flop),
    };

    let key = if is_opener {
        opener_key(hero_pos.as_str())
    } else {
        caller_key(hero_pos.as_str(), opener.as_str())
    };
    let classes = lookup(&key)?;

    let mut deck = Deck::new(None);
    deck.shuffle(rng);
    let board = Board::new(deck.deal(street.board_len())?)?;

    let hero_class = classes
        .choose(rng)
        .cloned()
        .ok_or_else(|| Rejection::new(Stage::Range, format!("empty range for {}", key)))?;
    let combos = live_combos(&hero_class, board.cards())?;
    let hero = *combos.choose(rng).ok_or_else(|| {
        Rejection::new(Stage::Combos, format!("no live combos of {} on {}", hero_class, board))
    })?;

    let ledger = simulate(rng, opener, caller, street, in_position, villain_pos);

    Ok(Scenario {
        hero,
        hero_class,
        board,
        street,
        hero_position: hero_pos,
        villain_position: villain_pos,
        is_opener,
        in_position,
        effective_stack: ledger.stack,
        pot: ledger.pot,
        history: ledger.history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_btn_vs_bb_pot_includes_dead_small_blind() {
        let mut rng = StdRng::seed_from_u64(1);
        let ledger = simulate(
            &mut rng,
            Position::BTN,
            Position::BB,
            Street::Flop,
            true,
            Position::BB,
        );
        assert!((ledger.pot - 5.5).abs() < 1e-9);
        assert!((ledger.stack - 97.5).abs() < 1e-9);
    }
}
