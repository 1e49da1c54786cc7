//! Extended actions: accumulating successes over several rolls.
//!
//! An extended action rolls the same snapshotted pool repeatedly until the
//! cumulative successes reach the (possibly reduced) target or the rolls run
//! out. After a plain failure or an exceptional success it suspends and waits
//! for the player's [`Decision`]; the engine resumes it on
//! [`submit_decision`](crate::DiceEngine::submit_decision).

pub mod state;

pub use state::ExtendedActionState;

use std::fmt;

use dp_core::ActorId;
use serde::{Deserialize, Serialize};

use crate::dice::RawRoll;
use crate::resolution::RollOutcome;

/// What a suspended extended action is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PendingDecision {
    /// Not suspended.
    #[default]
    None,
    /// After a failure: accept a condition or abandon.
    FailureChoice,
    /// After an exceptional success: pick a bonus.
    ExceptionalChoice,
}

impl fmt::Display for PendingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "nothing"),
            Self::FailureChoice => write!(f, "failure choice"),
            Self::ExceptionalChoice => write!(f, "exceptional success choice"),
        }
    }
}

/// A player's answer to a suspended extended action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Take the condition with this catalog id and keep going.
    AcceptCondition(String),
    /// Stop now and keep the successes gathered so far.
    Abandon,
    /// Lower the target by the skill rating for the rest of the action.
    ReduceTarget,
    /// Narrative: the action takes a quarter less time.
    ReduceTime,
    /// Narrative: apply the exceptional result on completion.
    ExceptionalResult,
}

impl Decision {
    /// The pending decision this answers.
    pub fn answers(&self) -> PendingDecision {
        match self {
            Self::AcceptCondition(_) | Self::Abandon => PendingDecision::FailureChoice,
            Self::ReduceTarget | Self::ReduceTime | Self::ExceptionalResult => {
                PendingDecision::ExceptionalChoice
            }
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AcceptCondition(id) => write!(f, "accept condition '{id}'"),
            Self::Abandon => write!(f, "abandon"),
            Self::ReduceTarget => write!(f, "reduce target"),
            Self::ReduceTime => write!(f, "reduce time"),
            Self::ExceptionalResult => write!(f, "exceptional result"),
        }
    }
}

/// A bonus chosen after an exceptional success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExceptionalBonus {
    /// The target was lowered by this many successes.
    ReducedTarget(i32),
    /// The action takes 25% less time.
    ReducedTime,
    /// The exceptional result applies when the action completes.
    ExceptionalResult,
}

impl fmt::Display for ExceptionalBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReducedTarget(n) => write!(f, "Reduced successes by {n}"),
            Self::ReducedTime => write!(f, "Time reduced by 25%"),
            Self::ExceptionalResult => write!(f, "Exceptional result applied"),
        }
    }
}

/// One roll of an extended action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    /// 1-based roll number.
    pub roll_number: u32,
    /// Unclamped pool for this roll.
    pub pool: i32,
    /// Every die rolled.
    pub dice: RawRoll,
    /// Classified result.
    pub outcome: RollOutcome,
    /// Cumulative successes after this roll.
    pub cumulative: u32,
}

/// The final tally of a finished extended action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedSummary {
    /// The acting actor.
    pub actor: ActorId,
    /// Whether the (reduced) target was reached.
    pub success: bool,
    /// Successes gathered.
    pub cumulative_successes: u32,
    /// Target after reductions.
    pub effective_target: i64,
    /// Rolls made.
    pub rolls_made: u32,
    /// Roll cap.
    pub max_rolls: u32,
    /// Exceptional bonuses chosen, in order.
    pub bonuses: Vec<ExceptionalBonus>,
    /// Conditions accepted, in order.
    pub conditions: Vec<String>,
    /// Every roll.
    pub history: Vec<RollRecord>,
    /// True if the player abandoned the action.
    pub abandoned: bool,
}

/// Where an extended action stands after the engine has advanced it.
#[derive(Debug, Clone)]
pub enum ExtendedStep {
    /// Suspended; a snapshot of the live state.
    Awaiting(ExtendedActionState),
    /// Finished; the per-actor state has been cleared.
    Finished(ExtendedSummary),
}

impl ExtendedStep {
    /// The pending decision, or [`PendingDecision::None`] when finished.
    pub fn pending(&self) -> PendingDecision {
        match self {
            Self::Awaiting(state) => state.pending_decision,
            Self::Finished(_) => PendingDecision::None,
        }
    }

    /// The summary, if finished.
    pub fn summary(&self) -> Option<&ExtendedSummary> {
        match self {
            Self::Awaiting(_) => None,
            Self::Finished(summary) => Some(summary),
        }
    }

    /// The roll history so far.
    pub fn history(&self) -> &[RollRecord] {
        match self {
            Self::Awaiting(state) => &state.history,
            Self::Finished(summary) => &summary.history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_answer_their_menu() {
        assert_eq!(
            Decision::AcceptCondition("shaken".into()).answers(),
            PendingDecision::FailureChoice
        );
        assert_eq!(Decision::Abandon.answers(), PendingDecision::FailureChoice);
        assert_eq!(Decision::ReduceTarget.answers(), PendingDecision::ExceptionalChoice);
        assert_eq!(Decision::ReduceTime.answers(), PendingDecision::ExceptionalChoice);
        assert_eq!(
            Decision::ExceptionalResult.answers(),
            PendingDecision::ExceptionalChoice
        );
    }

    #[test]
    fn bonus_labels() {
        assert_eq!(
            ExceptionalBonus::ReducedTarget(3).to_string(),
            "Reduced successes by 3"
        );
        assert_eq!(ExceptionalBonus::ReducedTime.to_string(), "Time reduced by 25%");
        assert_eq!(
            ExceptionalBonus::ExceptionalResult.to_string(),
            "Exceptional result applied"
        );
    }

    #[test]
    fn pending_display() {
        assert_eq!(PendingDecision::FailureChoice.to_string(), "failure choice");
        assert_eq!(PendingDecision::default(), PendingDecision::None);
    }
}
