//! One seeded attempt runs every stage in a fixed order; `generate` retries
//! successive seeds until an attempt survives or the budget runs out.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::audit;
use crate::cards::Street;
use crate::classifier::classify;
use crate::config::DrillConfig;
use crate::context::{build_context, MadeFlags};
use crate::error::{DrillError, DrillResult, Rejection, StageError, StageResult};
use crate::gates::{check_barrel, context_gate, survivor_gate};
use crate::leverage::{leverage_profile, size_set};
use crate::options::{build_options, Difficulty};
use crate::pedagogy::teach;
use crate::scenario;
use crate::spot::{card_strings, render_options, HeroInfo, Solution, Spot, SpotMeta, VillainInfo};
use crate::theory::TheoryCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateRequest {
    /// `None` samples a street.
    pub street: Option<Street>,
    /// 1-10.
    pub difficulty: u8,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        GenerateRequest {
            street: None,
            difficulty: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    Accepted(Box<Spot>),
    Rejected(Rejection),
}

impl Attempt {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Attempt::Accepted(_))
    }
}

fn build_spot(seed: u64, request: &GenerateRequest, theory: Option<&TheoryCache>) -> StageResult<Spot> {
    let difficulty = Difficulty::from_level(request.difficulty)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let sc = scenario::sample(&mut rng, request.street)?;
    let (stack, pot) = (sc.effective_stack, sc.pot);

    let cls = classify(&sc.hero, &sc.board)?;
    let barrel = check_barrel(
        cls.class,
        cls.pair_quality,
        &cls.features,
        cls.turn_type,
        &sc.board.ranks(),
    )?;
    log::trace!("seed {} barrel small={} large={}", seed, barrel.can_barrel_small, barrel.can_barrel_large);

    let profile = leverage_profile(&cls, &sc.board, stack, pot, sc.is_opener, sc.in_position)?;
    let flags = MadeFlags {
        has_straight: cls.features.made_straight,
        has_flush: cls.features.made_flush,
        combo_draw: cls.features.combo_draw,
        pair_plus_draw: cls.features.pair_plus_draw,
    };
    let ctx = build_context(
        sc.street,
        sc.in_position,
        profile.leverage,
        stack,
        pot,
        sc.is_opener,
        cls.class,
        flags,
    )?;
    context_gate(&ctx, cls.intent)?;

    let options = build_options(&ctx, difficulty);
    survivor_gate(&ctx, &options)?;

    let sizes = size_set(profile.leverage, profile.mode)?;
    let rendered = render_options(&options, &sizes, pot, stack)?;
    let teaching = teach(&options, &ctx, cls.intent, sc.street, difficulty);

    let theory_text = match (theory, teaching.concepts.first()) {
        (Some(cache), Some(tag)) => cache.snippet(tag.as_str())?,
        _ => None,
    };

    let id = format!("{}-{:08X}", sc.street.code().to_ascii_uppercase(), rng.next_u32());
    let tags = vec![
        sc.street.as_str().to_string(),
        if sc.in_position { "ip" } else { "oop" }.to_string(),
        ctx.polarity.to_string(),
        format!("{}_leverage", profile.leverage),
        cls.intent.to_string(),
    ];

    let spot = Spot {
        id,
        street: sc.street,
        difficulty: request.difficulty,
        tags,
        hero: HeroInfo {
            position: sc.hero_position,
            cards: card_strings(&sc.hero),
            hand_class: sc.hero_class,
            stack,
            in_position: sc.in_position,
            is_opener: sc.is_opener,
        },
        villain: VillainInfo {
            position: sc.villain_position,
            stack,
        },
        board: sc.board.cards().iter().map(|c| c.to_string()).collect(),
        pot,
        history: sc.history,
        options: rendered,
        solution: Solution {
            best_index: options.anchor_index(),
            scores: teaching.scores.to_vec(),
        },
        meta: SpotMeta {
            concepts: teaching.concepts,
            summary: teaching.summary,
            notes: teaching.notes,
            frequencies: teaching.frequencies.to_vec(),
            intent: cls.intent,
            hand_class: cls.class,
            leverage: profile.leverage,
            theory: theory_text,
        },
    };

    let violations = audit::validate(&spot);
    if !violations.is_empty() {
        let joined: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        return Err(DrillError::InvariantViolation(joined.join("; ")).into());
    }
    Ok(spot)
}

/// A single seeded attempt. Rejections are ordinary outcomes; contract
/// violations are errors.
pub fn generate_attempt(
    seed: u64,
    request: &GenerateRequest,
    theory: Option<&TheoryCache>,
) -> DrillResult<Attempt> {
    match build_spot(seed, request, theory) {
        Ok(spot) => {
            log::info!("seed {} accepted as {}", seed, spot.id);
            Ok(Attempt::Accepted(Box::new(spot)))
        }
        Err(StageError::Rejected(r)) => {
            log::debug!("seed {} rejected {}", seed, r);
            Ok(Attempt::Rejected(r))
        }
        Err(StageError::Fatal(e)) => Err(e),
    }
}

/// Try seeds `base_seed`, `base_seed + 1`, ... up to `max_attempts`.
pub fn generate(
    request: &GenerateRequest,
    config: &DrillConfig,
    theory: Option<&TheoryCache>,
) -> DrillResult<Spot> {
    config.validate()?;
    let mut last: Option<Rejection> = None;
    for i in 0..config.max_attempts {
        let seed = config.base_seed.wrapping_add(i as u64);
        match generate_attempt(seed, request, theory)? {
            Attempt::Accepted(spot) => return Ok(*spot),
            Attempt::Rejected(r) => last = Some(r),
        }
    }
    let last = last.map(|r| r.to_string()).unwrap_or_default();
    log::warn!("no spot after {} attempts, last {}", config.max_attempts, last);
    Err(DrillError::GenerationFailed {
        attempts: config.max_attempts,
        last,
    })
}

/// `count` independent generations in parallel. Generation `i` owns the
/// seed block starting at `base_seed + i * max_attempts`, so results do not
/// depend on scheduling.
pub fn generate_batch(
    request: &GenerateRequest,
    config: &DrillConfig,
    count: usize,
    theory: Option<&TheoryCache>,
) -> Vec<DrillResult<Spot>> {
    let results: Vec<DrillResult<Spot>> = (0..count)
        .into_par_iter()
        .map(|i| {
            let block = (i as u64).wrapping_mul(config.max_attempts as u64);
            let cfg = DrillConfig {
                base_seed: config.base_seed.wrapping_add(block),
                ..config.clone()
            };
            generate(request, &cfg, theory)
        })
        .collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    log::info!("batch: {}/{} spots generated", ok, count);
    results
}
