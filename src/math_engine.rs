use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DrillError, DrillResult};

/// SPR bucket. Lower SPR means more pressure per bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackPressure {
    Low,
    Medium,
    High,
}

impl StackPressure {
    pub fn from_spr(ratio: f64) -> StackPressure {
        if ratio <= 1.2 {
            StackPressure::High
        } else if ratio <= 2.5 {
            StackPressure::Medium
        } else {
            StackPressure::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StackPressure::Low => "low",
            StackPressure::Medium => "medium",
            StackPressure::High => "high",
        }
    }
}

impl fmt::Display for StackPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn spr(stack: f64, pot: f64) -> DrillResult<f64> {
    if pot <= 0.0 {
        return Err(DrillError::InvalidValue("Pot must be positive".to_string()));
    }
    if stack < 0.0 {
        return Err(DrillError::InvalidValue(
            "Stack cannot be negative".to_string(),
        ));
    }
    Ok(stack / pot)
}

pub fn stack_pressure(stack: f64, pot: f64) -> DrillResult<StackPressure> {
    Ok(StackPressure::from_spr(spr(stack, pot)?))
}

/// Chips for a bet of `pct` percent of the pot.
pub fn bet_amount(pot: f64, pct: u32) -> f64 {
    round2(pot * pct as f64 / 100.0)
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_buckets() {
        assert_eq!(StackPressure::from_spr(1.2), StackPressure::High);
        assert_eq!(StackPressure::from_spr(2.5), StackPressure::Medium);
        assert_eq!(StackPressure::from_spr(2.51), StackPressure::Low);
    }

    #[test]
    fn test_spr_rejects_empty_pot() {
        assert!(spr(100.0, 0.0).is_err());
    }
}
