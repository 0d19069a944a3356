//! Invariant checks over finished spots, and a repair pass that returns a
//! corrected copy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::HandIntent;
use crate::error::{DrillError, DrillResult};
use crate::spot::Spot;

const FREQ_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    OptionCount { found: usize },
    DuplicateOptions,
    BestIndexOutOfRange { index: usize },
    ScoreCount { found: usize },
    FrequencyCount { found: usize },
    NegativeFrequency { index: usize },
    FrequencySum { sum: f64 },
    BestNotUniqueMax,
    GiveUpOffersBet,
}

impl Violation {
    /// Whether `repair` can fix this without inventing options.
    pub fn repairable(&self) -> bool {
        matches!(
            self,
            Violation::NegativeFrequency { .. } | Violation::FrequencySum { .. } | Violation::BestNotUniqueMax
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OptionCount { found } => write!(f, "expected 3 options, found {}", found),
            Violation::DuplicateOptions => write!(f, "options are not unique"),
            Violation::BestIndexOutOfRange { index } => write!(f, "best index {} out of range", index),
            Violation::ScoreCount { found } => write!(f, "expected 3 scores, found {}", found),
            Violation::FrequencyCount { found } => write!(f, "expected 3 frequencies, found {}", found),
            Violation::NegativeFrequency { index } => write!(f, "frequency {} is negative", index),
            Violation::FrequencySum { sum } => write!(f, "frequencies sum to {:.4}", sum),
            Violation::BestNotUniqueMax => write!(f, "best option does not hold the unique top score"),
            Violation::GiveUpOffersBet => write!(f, "give-up hand offered a bet"),
        }
    }
}

fn unique_max(scores: &[f64], idx: usize) -> bool {
    match scores.get(idx) {
        Some(&best) => scores
            .iter()
            .enumerate()
            .all(|(i, &s)| i == idx || s < best),
        None => false,
    }
}

pub fn validate(spot: &Spot) -> Vec<Violation> {
    let mut out = Vec::new();
    let opts = &spot.options;

    if opts.len() != 3 {
        out.push(Violation::OptionCount { found: opts.len() });
    }
    let duplicate = opts
        .iter()
        .enumerate()
        .any(|(i, a)| opts[i + 1..].iter().any(|b| a.intent == b.intent || a == b));
    if duplicate {
        out.push(Violation::DuplicateOptions);
    }

    let best = spot.solution.best_index;
    if best >= 3 || best >= opts.len() {
        out.push(Violation::BestIndexOutOfRange { index: best });
    }

    let scores = &spot.solution.scores;
    if scores.len() != 3 {
        out.push(Violation::ScoreCount { found: scores.len() });
    } else if !unique_max(scores, best) {
        out.push(Violation::BestNotUniqueMax);
    }

    let freqs = &spot.meta.frequencies;
    if freqs.len() != 3 {
        out.push(Violation::FrequencyCount { found: freqs.len() });
    } else {
        for (index, &f) in freqs.iter().enumerate() {
            if f < 0.0 {
                out.push(Violation::NegativeFrequency { index });
            }
        }
        let sum: f64 = freqs.iter().sum();
        if (sum - 1.0).abs() > FREQ_TOLERANCE {
            out.push(Violation::FrequencySum { sum });
        }
    }

    if spot.meta.intent == HandIntent::GiveUp && spot.offers_bet() {
        out.push(Violation::GiveUpOffersBet);
    }
    out
}

/// Frequencies in hundredths summing to exactly 100, residual on `best`.
fn renormalize(freqs: &[f64], best: usize) -> Vec<f64> {
    let clipped: Vec<f64> = freqs.iter().map(|f| f.max(0.0)).collect();
    let total: f64 = clipped.iter().sum();
    let mut cents: Vec<i64> = if total > 0.0 {
        clipped.iter().map(|f| (f / total * 100.0).round() as i64).collect()
    } else {
        vec![0; clipped.len()]
    };
    let residual = 100 - cents.iter().sum::<i64>();
    if let Some(c) = cents.get_mut(best) {
        *c += residual;
    }
    cents.into_iter().map(|c| c as f64 / 100.0).collect()
}

/// A corrected copy of `spot`. Frequencies are renormalised and the best
/// index is moved to the score maximum; structural damage (option or score
/// count, duplicates, give-up bets) cannot be repaired and is an error.
pub fn repair(spot: &Spot) -> DrillResult<Spot> {
    let fatal: Vec<String> = validate(spot)
        .iter()
        .filter(|v| !v.repairable())
        .map(|v| v.to_string())
        .collect();
    if !fatal.is_empty() {
        return Err(DrillError::InvariantViolation(fatal.join("; ")));
    }

    let mut fixed = spot.clone();
    let scores = &mut fixed.solution.scores;
    if !unique_max(scores, fixed.solution.best_index) {
        let (top, top_score) = scores
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, s)| if s > acc.1 { (i, s) } else { acc });
        let tied = scores.iter().enumerate().any(|(i, &s)| i != top && s >= top_score);
        if tied {
            scores[top] = ((top_score + 0.01) * 100.0).round() / 100.0;
        }
        fixed.solution.best_index = top;
    }
    fixed.meta.frequencies = renormalize(&fixed.meta.frequencies, fixed.solution.best_index);

    if !validate(&fixed).is_empty() {
        return Err(DrillError::InvariantViolation(format!(
            "spot {} still invalid after repair",
            fixed.id
        )));
    }
    Ok(fixed)
}
