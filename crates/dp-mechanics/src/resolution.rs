//! Classifying a raw roll into an outcome category.
//!
//! The category depends on both the success count and the final pool value:
//! - **Dramatic failure**: no successes, at least one original 1, pool ≤ 0
//! - **Failure**: no successes otherwise
//! - **Exceptional success**: successes at or above the threshold (5 by default)
//! - **Success**: anything else

use dp_core::RewardKind;
use serde::{Deserialize, Serialize};

use crate::dice::RawRoll;

/// Outcome category of a single roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeCategory {
    /// No successes, a 1 among the original dice, and a non-positive pool.
    DramaticFailure,
    /// No successes.
    Failure,
    /// At least one success.
    Success,
    /// Successes at or above the exceptional threshold.
    ExceptionalSuccess,
}

impl OutcomeCategory {
    /// Returns true for success and exceptional success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::ExceptionalSuccess)
    }
}

impl std::fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DramaticFailure => write!(f, "Dramatic Failure"),
            Self::Failure => write!(f, "Failure"),
            Self::Success => write!(f, "Success"),
            Self::ExceptionalSuccess => write!(f, "Exceptional Success"),
        }
    }
}

/// Counts and category for one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Dice showing 8 or more, rerolls included.
    pub successes: u32,
    /// Original dice showing 1.
    pub ones: u32,
    /// The unclamped pool the roll was made with.
    pub final_pool: i32,
    /// The classified category.
    pub category: OutcomeCategory,
}

impl RollOutcome {
    /// Classify a roll made with `final_pool` dice.
    pub fn from_roll(roll: &RawRoll, final_pool: i32, exceptional_threshold: u32) -> Self {
        Self::classify(roll.successes(), roll.ones(), final_pool, exceptional_threshold)
    }

    /// Classify from raw counts.
    pub fn classify(
        successes: u32,
        ones: u32,
        final_pool: i32,
        exceptional_threshold: u32,
    ) -> Self {
        let category = if successes == 0 && ones >= 1 && final_pool <= 0 {
            OutcomeCategory::DramaticFailure
        } else if successes == 0 {
            OutcomeCategory::Failure
        } else if successes >= exceptional_threshold {
            OutcomeCategory::ExceptionalSuccess
        } else {
            OutcomeCategory::Success
        };
        Self {
            successes,
            ones,
            final_pool,
            category,
        }
    }

    /// The reward event this outcome raises, if any.
    pub fn reward(&self) -> Option<RewardKind> {
        match self.category {
            OutcomeCategory::ExceptionalSuccess => Some(RewardKind::ExceptionalSuccess),
            OutcomeCategory::DramaticFailure => Some(RewardKind::DramaticFailure),
            _ => None,
        }
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.successes {
            1 => write!(f, "{} (1 success)", self.category),
            n => write!(f, "{} ({n} successes)", self.category),
        }
    }
}
