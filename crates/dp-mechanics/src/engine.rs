//! The engine facade: single, contested, opposed, and extended rolls.

use std::collections::HashMap;

use dp_core::{
    ActorId, CharacterSource, ConditionCatalog, ConditionGranter, RewardKind, RewardSink,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::contest::{ContestSpec, OpposedResult};
use crate::dice::{DicePool, DieSource, RawRoll, RollOptions};
use crate::error::{MechError, MechResult};
use crate::extended::state::{Resume, Transition};
use crate::extended::{Decision, ExtendedActionState, ExtendedStep, ExtendedSummary};
use crate::parser::{PoolKind, PoolSpec};
use crate::resolution::RollOutcome;
use crate::resolver::{ResolvedPool, Situational, resolve_pool};

/// One side's complete roll: pool, dice, and outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Who rolled.
    pub actor: ActorId,
    /// The resolved pool.
    pub pool: ResolvedPool,
    /// Every die rolled.
    pub roll: RawRoll,
    /// Counts and category.
    pub outcome: RollOutcome,
    /// The reward event raised, if any.
    pub reward: Option<RewardKind>,
    /// Specialty label, if a specialty applied.
    pub specialty: Option<String>,
    /// Presentation should hide trait values.
    pub secret: bool,
}

/// Rolls dice and tracks every actor's extended action.
pub struct DiceEngine<S: DieSource = StdRng> {
    config: EngineConfig,
    dice: S,
    extended: HashMap<ActorId, ExtendedActionState>,
}

impl DiceEngine<StdRng> {
    /// Create an engine seeded from the config (or the OS when unseeded).
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_source(config, rng)
    }
}

impl<S: DieSource> DiceEngine<S> {
    /// Create an engine with a specific die source.
    pub fn with_source(config: EngineConfig, dice: S) -> Self {
        Self {
            config,
            dice,
            extended: HashMap::new(),
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable access to the die source.
    pub fn dice_mut(&mut self) -> &mut S {
        &mut self.dice
    }

    /// Resolve a pool and roll it, optionally against a `vs` contest.
    ///
    /// Every lookup happens before any die is cast, so errors leave no trace.
    pub fn resolve_and_roll<C: CharacterSource>(
        &mut self,
        spec: &PoolSpec,
        actor: ActorId,
        options: &RollOptions,
        contest: Option<&ContestSpec>,
        sources: &C,
        rewards: &mut dyn RewardSink,
    ) -> MechResult<CheckResult> {
        let (specialty_bonus, specialty) = self.specialty_for(spec, actor, options, sources)?;
        let wound_penalty = if options.ignores_wounds() {
            0
        } else {
            sources.wound_penalty(actor)
        };
        let contest_penalty = match contest {
            Some(c) => c.penalty(sources)?,
            None => 0,
        };
        let situational = Situational {
            wound_penalty,
            specialty_bonus,
            contest_penalty,
        };
        let pool = resolve_pool(spec, actor, sources, situational)?;
        Ok(self.roll_pool(actor, pool, options, specialty, rewards))
    }

    /// Roll both sides of an opposed contest.
    ///
    /// The defender always takes its wound penalty and never a specialty;
    /// the attacker's reflexive and damage flags only gate the attacker.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_opposed<C: CharacterSource>(
        &mut self,
        attacker_spec: &PoolSpec,
        attacker: ActorId,
        defender_spec: &PoolSpec,
        defender: ActorId,
        options: &RollOptions,
        sources: &C,
        rewards: &mut dyn RewardSink,
    ) -> MechResult<OpposedResult> {
        if !sources.has_actor(defender) {
            return Err(MechError::InvalidContestTarget(defender.to_string()));
        }

        let (specialty_bonus, specialty) =
            self.specialty_for(attacker_spec, attacker, options, sources)?;
        let attacker_wounds = if options.ignores_wounds() {
            0
        } else {
            sources.wound_penalty(attacker)
        };
        let attacker_pool = resolve_pool(
            attacker_spec,
            attacker,
            sources,
            Situational {
                wound_penalty: attacker_wounds,
                specialty_bonus,
                contest_penalty: 0,
            },
        )?;
        let defender_pool = resolve_pool(
            defender_spec,
            defender,
            sources,
            Situational {
                wound_penalty: sources.wound_penalty(defender),
                ..Situational::default()
            },
        )?;

        let defender_options = RollOptions {
            specialty: false,
            reflexive: false,
            damage: false,
            ..options.clone()
        };
        let attacker_check = self.roll_pool(attacker, attacker_pool, options, specialty, rewards);
        let defender_check =
            self.roll_pool(defender, defender_pool, &defender_options, None, rewards);
        let result = OpposedResult::new(attacker_check, defender_check);
        tracing::debug!(
            %attacker,
            %defender,
            winner = ?result.winner,
            margin = result.margin,
            "opposed roll"
        );
        Ok(result)
    }

    /// Start an extended action and roll until it finishes or suspends.
    #[allow(clippy::too_many_arguments)]
    pub fn start_extended<C: CharacterSource>(
        &mut self,
        spec: &PoolSpec,
        actor: ActorId,
        target_successes: u32,
        max_rolls_override: Option<u32>,
        options: &RollOptions,
        sources: &C,
        rewards: &mut dyn RewardSink,
    ) -> MechResult<ExtendedStep> {
        if self.extended.contains_key(&actor) {
            tracing::warn!(%actor, "extended action already in progress");
            return Err(MechError::ConcurrentExtendedAction(actor));
        }
        if target_successes < self.config.extended_min_target {
            return Err(MechError::InvalidExtendedTarget {
                target: target_successes,
                minimum: self.config.extended_min_target,
            });
        }
        if spec.kind != PoolKind::TraitPlusSkill {
            return Err(MechError::ExtendedNeedsSkill);
        }

        let wound_penalty = if options.ignores_wounds() {
            0
        } else {
            sources.wound_penalty(actor)
        };
        let pool = resolve_pool(
            spec,
            actor,
            sources,
            Situational {
                wound_penalty,
                ..Situational::default()
            },
        )?;

        let rating_sum = pool
            .traits
            .iter()
            .fold(0i32, |acc, (_, v)| acc.saturating_add(*v));
        let mut maximum = rating_sum.max(0).unsigned_abs();
        if sources.has_merit(actor, &self.config.patient_merit) {
            maximum = maximum.saturating_add(self.config.patient_bonus);
        }
        let max_rolls = match max_rolls_override.filter(|&n| n > 0) {
            Some(requested) if requested > maximum => {
                return Err(MechError::TooManyRolls { requested, maximum });
            }
            Some(requested) => requested,
            None => maximum,
        };

        let (specialty_bonus, specialty) = self.specialty_for(spec, actor, options, sources)?;
        let state =
            ExtendedActionState::new(actor, &pool, target_successes, max_rolls, options.clone())
                .with_specialty(specialty_bonus, specialty)
                .with_dramatic_failure_penalty(self.config.dramatic_failure_penalty);

        tracing::info!(
            %actor,
            target = target_successes,
            max_rolls,
            base_pool = state.base_pool,
            "extended action started"
        );
        Ok(self.advance(state, rewards))
    }

    /// Answer a suspended extended action and resume it.
    ///
    /// A decision that does not match the pending question is rejected and
    /// the action stays suspended, unchanged.
    pub fn submit_decision(
        &mut self,
        actor: ActorId,
        decision: Decision,
        catalog: &dyn ConditionCatalog,
        granter: &mut dyn ConditionGranter,
        rewards: &mut dyn RewardSink,
    ) -> MechResult<ExtendedStep> {
        let mut state = self
            .extended
            .remove(&actor)
            .ok_or(MechError::NoExtendedAction(actor))?;

        match state.apply(&decision, catalog, granter) {
            Ok(Resume::Continue) => {
                tracing::info!(%actor, %decision, "extended action resumed");
                Ok(self.advance(state, rewards))
            }
            Ok(Resume::Abandon) => Ok(ExtendedStep::Finished(Self::finish(state, true))),
            Err(e) => {
                tracing::warn!(%actor, %decision, error = %e, "decision rejected");
                self.extended.insert(actor, state);
                Err(e)
            }
        }
    }

    /// Abandon an extended action from outside, e.g. on a timeout.
    pub fn abandon_extended(&mut self, actor: ActorId) -> MechResult<ExtendedSummary> {
        let state = self
            .extended
            .remove(&actor)
            .ok_or(MechError::NoExtendedAction(actor))?;
        Ok(Self::finish(state, true))
    }

    /// The live extended action of an actor, if any.
    pub fn extended_state(&self, actor: ActorId) -> Option<&ExtendedActionState> {
        self.extended.get(&actor)
    }

    /// Returns true if the actor has an extended action in progress.
    pub fn has_extended(&self, actor: ActorId) -> bool {
        self.extended.contains_key(&actor)
    }

    /// Roll until the action finishes or suspends.
    fn advance(
        &mut self,
        mut state: ExtendedActionState,
        rewards: &mut dyn RewardSink,
    ) -> ExtendedStep {
        loop {
            if state.is_complete() {
                return ExtendedStep::Finished(Self::finish(state, false));
            }
            let pool = state.next_pool();
            let roll = DicePool::from_final_pool(pool, state.options.clone()).roll(&mut self.dice);
            let outcome = RollOutcome::from_roll(&roll, pool, self.config.exceptional_threshold);
            tracing::debug!(
                actor = %state.actor,
                roll_number = state.rolls_made,
                pool,
                dice = %roll,
                successes = outcome.successes,
                category = %outcome.category,
                "extended roll"
            );
            if let Some(kind) = outcome.reward() {
                rewards.emit(state.actor, kind);
            }

            match state.record(pool, roll, outcome) {
                Transition::Continue => {}
                Transition::Finish => return ExtendedStep::Finished(Self::finish(state, false)),
                Transition::Suspend(pending) => {
                    tracing::info!(actor = %state.actor, %pending, "extended action suspended");
                    self.extended.insert(state.actor, state.clone());
                    return ExtendedStep::Awaiting(state);
                }
            }
        }
    }

    fn finish(state: ExtendedActionState, abandoned: bool) -> ExtendedSummary {
        let summary = state.summary(abandoned);
        if abandoned {
            tracing::info!(
                actor = %summary.actor,
                successes = summary.cumulative_successes,
                "extended action abandoned"
            );
        } else {
            tracing::info!(
                actor = %summary.actor,
                success = summary.success,
                successes = summary.cumulative_successes,
                rolls = summary.rolls_made,
                "extended action finished"
            );
        }
        summary
    }

    /// Look up the specialty bonus when one is requested.
    fn specialty_for<C: CharacterSource>(
        &self,
        spec: &PoolSpec,
        actor: ActorId,
        options: &RollOptions,
        sources: &C,
    ) -> MechResult<(i32, Option<String>)> {
        if !options.specialty {
            return Ok((0, None));
        }
        let Some(skill) = spec.skill() else {
            return Err(MechError::MissingSpecialty(
                spec.attribute().unwrap_or("this roll").to_string(),
            ));
        };
        match sources.specialty(actor, skill) {
            (bonus, label) if bonus > 0 => Ok((bonus, label)),
            _ => Err(MechError::MissingSpecialty(skill.to_string())),
        }
    }

    fn roll_pool(
        &mut self,
        actor: ActorId,
        pool: ResolvedPool,
        options: &RollOptions,
        specialty: Option<String>,
        rewards: &mut dyn RewardSink,
    ) -> CheckResult {
        let roll =
            DicePool::from_final_pool(pool.final_pool, options.clone()).roll(&mut self.dice);
        let outcome =
            RollOutcome::from_roll(&roll, pool.final_pool, self.config.exceptional_threshold);
        let reward = outcome.reward();
        if let Some(kind) = reward {
            rewards.emit(actor, kind);
        }
        tracing::debug!(
            %actor,
            pool = pool.final_pool,
            dice = %roll,
            successes = outcome.successes,
            category = %outcome.category,
            "roll"
        );
        CheckResult {
            actor,
            pool,
            roll,
            outcome,
            reward,
            specialty,
            secret: options.secret,
        }
    }
}
