use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract violations. These abort the current attempt and point at a
/// caller bug, never at an unlucky sample.
#[derive(Error, Debug)]
pub enum DrillError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("Board must hold 3 to 5 cards, got {0}")]
    InvalidBoardSize(usize),

    #[error("Duplicate card: {0}")]
    DuplicateCard(String),

    #[error("Hand must be exactly 2 cards")]
    InvalidHandSize,

    #[error("Cannot deal {requested} cards, only {available} remaining")]
    NotEnoughDeck { requested: usize, available: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Expected exactly 3 options, got {0}")]
    OptionCount(usize),

    #[error("Options must be distinct and sorted: {0}")]
    InvalidOptions(String),

    #[error("Anchor index {0} is outside the option set")]
    AnchorOutOfRange(usize),

    #[error("Missing required configuration field: {0}")]
    MissingConfig(&'static str),

    #[error("Spot violates invariants: {0}")]
    InvariantViolation(String),

    #[error("Generation failed after {attempts} attempts (last rejection: {last})")]
    GenerationFailed { attempts: usize, last: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type DrillResult<T> = Result<T, DrillError>;

/// Pipeline stage that vetoed a sampled spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Range,
    Combos,
    BarrelEligibility,
    ContextGate,
    Survivor,
    SizeSet,
    AllInCollapse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Range => write!(f, "range"),
            Stage::Combos => write!(f, "combos"),
            Stage::BarrelEligibility => write!(f, "barrel-eligibility"),
            Stage::ContextGate => write!(f, "context-gate"),
            Stage::Survivor => write!(f, "survivor"),
            Stage::SizeSet => write!(f, "size-set"),
            Stage::AllInCollapse => write!(f, "all-in-collapse"),
        }
    }
}

/// Resampling signal: the spot is legal input but should not be taught.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub stage: Stage,
    pub reason: String,
}

impl Rejection {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Rejection {
            stage,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.reason)
    }
}

/// What a pipeline stage can hand back: a veto to resample on, or a fatal
/// contract violation that aborts the attempt.
#[derive(Debug)]
pub enum StageError {
    Rejected(Rejection),
    Fatal(DrillError),
}

impl From<Rejection> for StageError {
    fn from(r: Rejection) -> Self {
        StageError::Rejected(r)
    }
}

impl From<DrillError> for StageError {
    fn from(e: DrillError) -> Self {
        StageError::Fatal(e)
    }
}

pub type StageResult<T> = Result<T, StageError>;
