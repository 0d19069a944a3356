use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::cards::{hand_combos, Card, Hand, RANKS_STR};
use crate::error::{DrillResult, Rejection, Stage};

static RANGES_JSON: &str = include_str!("../data/ranges.json");

#[derive(Deserialize, Debug, Default)]
struct RangeChart {
    open: HashMap<String, String>,
    call: HashMap<String, String>,
}

static CHART: Lazy<RangeChart> = Lazy::new(|| match serde_json::from_str(RANGES_JSON) {
    Ok(chart) => chart,
    Err(e) => {
        log::error!("range chart failed to parse: {}", e);
        RangeChart::default()
    }
});

/// Number of concrete combos for a hand class (`"QQ"`, `"AKs"`, `"T9o"`).
pub fn combo_count(notation: &str) -> u32 {
    let chars: Vec<char> = notation.chars().collect();
    match chars.as_slice() {
        [a, b] if a == b => 6,
        [_, _, 's'] => 4,
        [_, _, 'o'] => 12,
        _ => 0,
    }
}

pub fn total_combos(hands: &[String]) -> u32 {
    hands.iter().map(|h| combo_count(h)).sum()
}

/// Expand range notation (`22+`, `ATs+`, `KTs-KQs`, `77-TT`) into sorted,
/// de-duplicated hand classes.
pub fn parse_range(range_str: &str) -> Vec<String> {
    let mut hands = BTreeSet::new();
    for part in range_str.replace(' ', "").split(',') {
        if part.is_empty() {
            continue;
        }
        if let Some(base) = part.strip_suffix('+') {
            hands.extend(expand_plus(base));
        } else if part.contains('-') && part.len() > 3 {
            hands.extend(expand_dash(part));
        } else {
            hands.insert(part.to_string());
        }
    }
    hands.into_iter().collect()
}

fn expand_plus(base: &str) -> Vec<String> {
    let chars: Vec<char> = base.chars().collect();
    let ranks: Vec<char> = RANKS_STR.chars().collect();

    match chars.as_slice() {
        // "TT+"
        [a, b] if a == b => match RANKS_STR.find(*a) {
            Some(idx) => (idx..ranks.len()).map(|i| format!("{}{}", ranks[i], ranks[i])).collect(),
            None => vec![base.to_string()],
        },
        // "ATs+": kicker climbs up to one below the high card
        [high, low, kind] => match (RANKS_STR.find(*low), RANKS_STR.find(*high)) {
            (Some(lo), Some(hi)) => (lo..hi).map(|i| format!("{}{}{}", high, ranks[i], kind)).collect(),
            _ => vec![base.to_string()],
        },
        _ => vec![base.to_string()],
    }
}

fn expand_dash(range_str: &str) -> Vec<String> {
    let Some((start, end)) = range_str.split_once('-') else {
        return vec![range_str.to_string()];
    };
    let s: Vec<char> = start.chars().collect();
    let e: Vec<char> = end.chars().collect();
    let ranks: Vec<char> = RANKS_STR.chars().collect();

    match (s.as_slice(), e.as_slice()) {
        ([a, b], [c, d]) if a == b && c == d => {
            if let (Some(si), Some(ei)) = (RANKS_STR.find(*a), RANKS_STR.find(*c)) {
                return (si.min(ei)..=si.max(ei))
                    .map(|i| format!("{}{}", ranks[i], ranks[i]))
                    .collect();
            }
        }
        ([h1, k1, t1], [h2, k2, t2]) if h1 == h2 && t1 == t2 => {
            if let (Some(si), Some(ei)) = (RANKS_STR.find(*k1), RANKS_STR.find(*k2)) {
                return (si.min(ei)..=si.max(ei))
                    .map(|i| format!("{}{}{}", h1, ranks[i], t1))
                    .collect();
            }
        }
        _ => {}
    }
    vec![range_str.to_string()]
}

/// Chart key for the preflop aggressor.
pub fn opener_key(position: &str) -> String {
    position.to_string()
}

/// Chart key for the caller facing `opener`.
pub fn caller_key(position: &str, opener: &str) -> String {
    format!("{}_vs_{}", position, opener)
}

/// Hand classes for a chart key. Opening keys are tried before calling keys.
pub fn lookup(key: &str) -> Result<Vec<String>, Rejection> {
    let chart = &*CHART;
    chart
        .open
        .get(key)
        .or_else(|| chart.call.get(key))
        .map(|s| parse_range(s))
        .filter(|hands| !hands.is_empty())
        .ok_or_else(|| Rejection::new(Stage::Range, format!("no range found for {}", key)))
}

/// Every chart key, openers first.
pub fn chart_keys() -> Vec<String> {
    let chart = &*CHART;
    let mut open: Vec<String> = chart.open.keys().cloned().collect();
    let mut call: Vec<String> = chart.call.keys().cloned().collect();
    open.sort();
    call.sort();
    open.extend(call);
    open
}

/// Combos of `hand_class` that do not collide with any dead card.
pub fn live_combos(hand_class: &str, dead: &[Card]) -> DrillResult<Vec<Hand>> {
    Ok(hand_combos(hand_class)?
        .into_iter()
        .filter(|h| !dead.contains(&h[0]) && !dead.contains(&h[1]))
        .collect())
}
