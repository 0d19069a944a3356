use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DrillError, DrillResult};

pub const DEFAULT_MAX_ATTEMPTS: usize = 50;

/// Generation settings. `max_attempts` bounds the retry loop and must be
/// present in any config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillConfig {
    pub max_attempts: usize,
    pub base_seed: u64,
    pub theory_root: Option<PathBuf>,
    pub default_difficulty: u8,
}

impl Default for DrillConfig {
    fn default() -> Self {
        DrillConfig {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_seed: 0,
            theory_root: None,
            default_difficulty: 5,
        }
    }
}

/// On-disk shape; every field optional so a missing requirement can be
/// named rather than reported as a generic parse error.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    max_attempts: Option<usize>,
    base_seed: Option<u64>,
    theory_root: Option<PathBuf>,
    default_difficulty: Option<u8>,
}

impl DrillConfig {
    pub fn from_json(json: &str) -> DrillResult<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let defaults = DrillConfig::default();
        let config = DrillConfig {
            max_attempts: raw.max_attempts.ok_or(DrillError::MissingConfig("max_attempts"))?,
            base_seed: raw.base_seed.unwrap_or(defaults.base_seed),
            theory_root: raw.theory_root.or(defaults.theory_root),
            default_difficulty: raw.default_difficulty.unwrap_or(defaults.default_difficulty),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> DrillResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> DrillResult<()> {
        if self.max_attempts == 0 {
            return Err(DrillError::InvalidValue(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if !(1..=10).contains(&self.default_difficulty) {
            return Err(DrillError::InvalidValue(format!(
                "default_difficulty must be 1-10, got {}",
                self.default_difficulty
            )));
        }
        Ok(())
    }
}
