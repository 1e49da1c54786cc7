//! Dice-pool resolution and extended-action engine.
//!
//! Turns a symbolic action ("attribute + skill + modifier", optionally
//! contested, optionally extended over several rolls) into d10 rolls and a
//! classified outcome. Extended actions are a per-actor state machine that
//! suspends after failures and exceptional successes until the player
//! submits a [`Decision`].
//!
//! Data flows parser → [`resolver`] → [`dice`] → [`resolution`] →
//! ([`contest`] | [`extended`]), with [`DiceEngine`] as the entry point.

pub mod config;
pub mod contest;
pub mod dice;
pub mod engine;
pub mod error;
pub mod extended;
pub mod parser;
pub mod resolution;
pub mod resolver;

pub use config::EngineConfig;
pub use contest::{ContestSpec, OpposedResult, Side};
pub use dice::{
    DicePool, DieOrigin, DieResult, DieSource, RawRoll, RerollRule, RollOptions, ScriptedDice,
};
pub use engine::{CheckResult, DiceEngine};
pub use error::{MechError, MechResult, ParseError};
pub use extended::{
    Decision, ExceptionalBonus, ExtendedActionState, ExtendedStep, ExtendedSummary,
    PendingDecision, RollRecord,
};
pub use parser::{
    ComponentRole, ContestExpr, PoolComponent, PoolKind, PoolSpec, RollCommand, RollMode,
};
pub use resolution::{OutcomeCategory, RollOutcome};
pub use resolver::{ResolvedPool, Situational, resolve_pool};
