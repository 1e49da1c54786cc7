//! The per-actor extended action state machine.

use dp_core::{ActorId, ConditionCatalog, ConditionGranter};
use serde::{Deserialize, Serialize};

use crate::dice::{RawRoll, RollOptions};
use crate::error::{MechError, MechResult};
use crate::resolution::{OutcomeCategory, RollOutcome};
use crate::resolver::ResolvedPool;

use super::{Decision, ExceptionalBonus, ExtendedSummary, PendingDecision, RollRecord};

/// What the controller does after a roll is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Check completion and roll again.
    Continue,
    /// Wait for the player.
    Suspend(PendingDecision),
    /// The target was reached.
    Finish,
}

/// What the controller does after a decision is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    /// Check completion and roll again.
    Continue,
    /// The player gave up.
    Abandon,
}

/// Live state of one actor's extended action.
///
/// The pool is snapshotted at start: later changes to the character sheet do
/// not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedActionState {
    /// The acting actor.
    pub actor: ActorId,
    /// Attribute name.
    pub attribute: String,
    /// Attribute rating at start.
    pub attribute_value: i32,
    /// Skill name.
    pub skill: String,
    /// Skill rating at start.
    pub skill_value: i32,
    /// Attribute + skill + modifier + wound penalty.
    pub base_pool: i32,
    /// Specialty bonus added to every roll.
    pub specialty_bonus: i32,
    /// Specialty label, if one applies.
    pub specialty: Option<String>,
    /// Reroll rule and flags for every roll.
    pub options: RollOptions,
    /// Successes needed before reductions.
    pub target_successes: u32,
    /// Cumulative reduction from exceptional bonuses.
    pub target_reduction: i32,
    /// Roll cap.
    pub max_rolls: u32,
    /// Rolls made so far.
    pub rolls_made: u32,
    /// Successes gathered so far.
    pub cumulative_successes: u32,
    /// Dice removed from the next roll only.
    pub dramatic_failure_penalty: i32,
    /// Every roll, in order.
    pub history: Vec<RollRecord>,
    /// What the action is waiting for.
    pub pending_decision: PendingDecision,
    /// Exceptional bonuses chosen.
    pub bonuses: Vec<ExceptionalBonus>,
    /// Conditions accepted.
    pub conditions: Vec<String>,
    penalty_dice: i32,
}

impl ExtendedActionState {
    /// Start a new action from a resolved attribute + skill pool.
    ///
    /// `pool.final_pool` must already include the wound penalty.
    pub fn new(
        actor: ActorId,
        pool: &ResolvedPool,
        target_successes: u32,
        max_rolls: u32,
        options: RollOptions,
    ) -> Self {
        let (attribute, attribute_value) = pool.traits.first().cloned().unwrap_or_default();
        let (skill, skill_value) = pool.traits.get(1).cloned().unwrap_or_default();
        Self {
            actor,
            attribute,
            attribute_value,
            skill,
            skill_value,
            base_pool: pool.final_pool,
            specialty_bonus: 0,
            specialty: None,
            options,
            target_successes,
            target_reduction: 0,
            max_rolls,
            rolls_made: 0,
            cumulative_successes: 0,
            dramatic_failure_penalty: 0,
            history: Vec::new(),
            pending_decision: PendingDecision::None,
            bonuses: Vec::new(),
            conditions: Vec::new(),
            penalty_dice: 2,
        }
    }

    /// Add a specialty bonus to every roll.
    pub fn with_specialty(mut self, bonus: i32, label: Option<String>) -> Self {
        self.specialty_bonus = bonus;
        self.specialty = label;
        self
    }

    /// Set how many dice a dramatic failure removes from the next roll.
    pub fn with_dramatic_failure_penalty(mut self, dice: i32) -> Self {
        self.penalty_dice = dice.abs();
        self
    }

    /// Target after exceptional reductions. May reach zero or below.
    pub fn effective_target(&self) -> i64 {
        i64::from(self.target_successes) - i64::from(self.target_reduction)
    }

    /// Returns true once cumulative successes meet the effective target.
    pub fn target_reached(&self) -> bool {
        i64::from(self.cumulative_successes) >= self.effective_target()
    }

    /// Returns true if the action must finish instead of rolling again.
    pub fn is_complete(&self) -> bool {
        self.target_reached() || self.rolls_made >= self.max_rolls
    }

    /// Rolls left before the cap.
    pub fn remaining_rolls(&self) -> u32 {
        self.max_rolls.saturating_sub(self.rolls_made)
    }

    /// Pool for the next roll. Consumes any dramatic failure penalty.
    pub(crate) fn next_pool(&mut self) -> i32 {
        self.rolls_made += 1;
        let pool = self
            .base_pool
            .saturating_add(self.specialty_bonus)
            .saturating_sub(self.dramatic_failure_penalty);
        self.dramatic_failure_penalty = 0;
        pool
    }

    /// Record a roll made with the pool from [`next_pool`](Self::next_pool).
    pub(crate) fn record(&mut self, pool: i32, dice: RawRoll, outcome: RollOutcome) -> Transition {
        match outcome.category {
            OutcomeCategory::DramaticFailure => self.dramatic_failure_penalty = self.penalty_dice,
            OutcomeCategory::Success | OutcomeCategory::ExceptionalSuccess => {
                self.cumulative_successes =
                    self.cumulative_successes.saturating_add(outcome.successes);
            }
            OutcomeCategory::Failure => {}
        }
        self.history.push(RollRecord {
            roll_number: self.rolls_made,
            pool,
            dice,
            outcome,
            cumulative: self.cumulative_successes,
        });

        if self.target_reached() {
            return Transition::Finish;
        }
        match outcome.category {
            OutcomeCategory::ExceptionalSuccess => {
                self.pending_decision = PendingDecision::ExceptionalChoice;
                Transition::Suspend(self.pending_decision)
            }
            OutcomeCategory::Failure => {
                self.pending_decision = PendingDecision::FailureChoice;
                Transition::Suspend(self.pending_decision)
            }
            _ => Transition::Continue,
        }
    }

    /// Apply a decision. On error the state is left untouched.
    pub(crate) fn apply(
        &mut self,
        decision: &Decision,
        catalog: &dyn ConditionCatalog,
        granter: &mut dyn ConditionGranter,
    ) -> MechResult<Resume> {
        if decision.answers() != self.pending_decision {
            return Err(MechError::InvalidDecision {
                expected: self.pending_decision,
                got: decision.to_string(),
            });
        }
        match decision {
            Decision::AcceptCondition(id) if !catalog.contains(id) => {
                return Err(MechError::UnknownCondition(id.clone()));
            }
            _ => {}
        }

        self.pending_decision = PendingDecision::None;
        let resume = match decision {
            Decision::AcceptCondition(id) => {
                granter.grant(self.actor, id);
                self.conditions.push(id.clone());
                Resume::Continue
            }
            Decision::Abandon => Resume::Abandon,
            Decision::ReduceTarget => {
                self.target_reduction = self.target_reduction.saturating_add(self.skill_value);
                self.bonuses
                    .push(ExceptionalBonus::ReducedTarget(self.skill_value));
                Resume::Continue
            }
            Decision::ReduceTime => {
                self.bonuses.push(ExceptionalBonus::ReducedTime);
                Resume::Continue
            }
            Decision::ExceptionalResult => {
                self.bonuses.push(ExceptionalBonus::ExceptionalResult);
                Resume::Continue
            }
        };
        Ok(resume)
    }

    /// The final tally.
    pub fn summary(&self, abandoned: bool) -> ExtendedSummary {
        ExtendedSummary {
            actor: self.actor,
            success: self.target_reached(),
            cumulative_successes: self.cumulative_successes,
            effective_target: self.effective_target(),
            rolls_made: self.rolls_made,
            max_rolls: self.max_rolls,
            bonuses: self.bonuses.clone(),
            conditions: self.conditions.clone(),
            history: self.history.clone(),
            abandoned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Situational;
    use dp_core::{ConditionTracker, StandardConditions};

    fn state(target: u32, max_rolls: u32) -> ExtendedActionState {
        let pool = ResolvedPool {
            traits: vec![("intelligence".to_string(), 3), ("academics".to_string(), 3)],
            modifier: 0,
            situational: Situational::default(),
            final_pool: 6,
        };
        ExtendedActionState::new(ActorId::new(), &pool, target, max_rolls, RollOptions::default())
    }

    fn outcome(successes: u32, ones: u32, pool: i32) -> RollOutcome {
        RollOutcome::classify(successes, ones, pool, 5)
    }

    /// Roll once with a synthetic outcome.
    fn step(s: &mut ExtendedActionState, successes: u32, ones: u32) -> Transition {
        let pool = s.next_pool();
        s.record(pool, RawRoll::default(), outcome(successes, ones, pool))
    }

    #[test]
    fn snapshot_from_pool() {
        let s = state(10, 6).with_specialty(1, Some("Research".to_string()));
        assert_eq!(s.attribute, "intelligence");
        assert_eq!(s.skill_value, 3);
        assert_eq!(s.base_pool, 6);
        assert_eq!(s.effective_target(), 10);
        assert_eq!(s.remaining_rolls(), 6);
        assert!(!s.is_complete());
    }

    #[test]
    fn successes_accumulate_until_target() {
        let mut s = state(5, 6);
        assert_eq!(step(&mut s, 2, 0), Transition::Continue);
        assert_eq!(step(&mut s, 3, 0), Transition::Finish);
        assert_eq!(s.cumulative_successes, 5);
        assert_eq!(s.history.len(), 2);
        assert_eq!(s.history[1].cumulative, 5);
    }

    #[test]
    fn scenario_failure_then_exceptional() {
        let mut s = state(10, 6);
        let catalog = StandardConditions::new();
        let mut tracker = ConditionTracker::new();

        assert_eq!(step(&mut s, 2, 0), Transition::Continue);
        assert_eq!(
            step(&mut s, 0, 0),
            Transition::Suspend(PendingDecision::FailureChoice)
        );
        let resume = s
            .apply(&Decision::AcceptCondition("shaken".into()), &catalog, &mut tracker)
            .unwrap();
        assert_eq!(resume, Resume::Continue);
        assert!(tracker.has(s.actor, "shaken"));

        assert_eq!(
            step(&mut s, 6, 0),
            Transition::Suspend(PendingDecision::ExceptionalChoice)
        );
        assert_eq!(s.cumulative_successes, 8);
        assert!(!s.is_complete());
        s.apply(&Decision::ReduceTime, &catalog, &mut tracker).unwrap();
        assert_eq!(s.effective_target(), 10);
        assert_eq!(s.bonuses, vec![ExceptionalBonus::ReducedTime]);
    }

    #[test]
    fn reaching_target_skips_exceptional_menu() {
        let mut s = state(5, 6);
        assert_eq!(step(&mut s, 6, 0), Transition::Finish);
        assert_eq!(s.pending_decision, PendingDecision::None);
    }

    #[test]
    fn dramatic_failure_penalizes_next_roll_only() {
        let mut s = state(20, 6);
        s.base_pool = 2;

        // Pool 2 with a dramatic-failure outcome sets the penalty.
        let pool = s.next_pool();
        assert_eq!(pool, 2);
        let t = s.record(pool, RawRoll::default(), outcome(0, 1, 0));
        assert_eq!(t, Transition::Continue);
        assert_eq!(s.dramatic_failure_penalty, 2);
        assert_eq!(s.cumulative_successes, 0);

        // Next roll is at -2 and the penalty is consumed.
        let pool = s.next_pool();
        assert_eq!(pool, 0);
        assert_eq!(s.dramatic_failure_penalty, 0);

        // A second dramatic failure applies a fresh penalty.
        s.record(pool, RawRoll::default(), outcome(0, 1, pool));
        assert_eq!(s.next_pool(), 0);
        assert_eq!(s.next_pool(), 2);
    }

    #[test]
    fn reduce_target_uses_skill_rating() {
        let mut s = state(10, 6);
        let catalog = StandardConditions::new();
        let mut tracker = ConditionTracker::new();
        step(&mut s, 5, 0);
        s.apply(&Decision::ReduceTarget, &catalog, &mut tracker).unwrap();
        assert_eq!(s.target_reduction, 3);
        assert_eq!(s.effective_target(), 7);
        assert_eq!(s.bonuses, vec![ExceptionalBonus::ReducedTarget(3)]);
    }

    #[test]
    fn reductions_can_drive_target_below_zero() {
        let mut s = state(5, 10);
        s.skill_value = 4;
        s.target_reduction = 4;
        // Effective target 1; an exceptional roll reaching it finishes at once.
        assert_eq!(step(&mut s, 5, 0), Transition::Finish);
        s.target_reduction = 12;
        assert!(s.effective_target() < 0);
        assert!(s.is_complete());
    }

    #[test]
    fn mismatched_decision_leaves_state_untouched() {
        let mut s = state(10, 6);
        let catalog = StandardConditions::new();
        let mut tracker = ConditionTracker::new();
        step(&mut s, 0, 0);
        let before = s.clone();

        let err = s
            .apply(&Decision::ReduceTarget, &catalog, &mut tracker)
            .unwrap_err();
        assert!(matches!(
            err,
            MechError::InvalidDecision {
                expected: PendingDecision::FailureChoice,
                ..
            }
        ));
        let err = s
            .apply(&Decision::AcceptCondition("nope".into()), &catalog, &mut tracker)
            .unwrap_err();
        assert!(matches!(err, MechError::UnknownCondition(_)));
        assert_eq!(s, before);
    }

    #[test]
    fn failure_suspends_even_on_last_roll() {
        let mut s = state(10, 1);
        assert_eq!(
            step(&mut s, 0, 0),
            Transition::Suspend(PendingDecision::FailureChoice)
        );
        assert!(s.is_complete());
    }

    #[test]
    fn summary_reports_tally() {
        let mut s = state(10, 2);
        step(&mut s, 3, 0);
        step(&mut s, 2, 0);
        let summary = s.summary(false);
        assert!(!summary.success);
        assert_eq!(summary.cumulative_successes, 5);
        assert_eq!(summary.rolls_made, 2);
        assert_eq!(summary.history.len(), 2);
        assert!(!summary.abandoned);
    }

    #[test]
    fn huge_target_is_not_met_before_rolling() {
        let mut s = state(u32::MAX, 6);
        assert_eq!(s.effective_target(), i64::from(u32::MAX));
        assert!(!s.is_complete());
        assert_eq!(step(&mut s, 2, 0), Transition::Continue);
        assert!(!s.target_reached());
    }
}
