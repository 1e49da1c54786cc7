//! Error types for the dice engine.

use dp_core::ActorId;

use crate::extended::PendingDecision;

/// Errors raised while parsing pool expressions and roll commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing to parse.
    #[error("empty roll expression")]
    Empty,

    /// The expression does not match any recognized pool format.
    #[error(
        "unrecognized pool '{0}': use <dice>, <trait>[-N], <attribute>+<skill>[-N], or <attribute>+<skill>+<N>"
    )]
    UnknownFormat(String),

    /// A modifier term is not an integer.
    #[error("invalid modifier '{0}': expected an integer")]
    InvalidModifier(String),

    /// A switch is not one of the known roll switches.
    #[error("unknown switch '/{0}'")]
    UnknownSwitch(String),

    /// More than one X-again switch was given.
    #[error("only one of /8, /9, /10 may be used")]
    ConflictingAgain,

    /// Two roll modes that cannot be combined were requested.
    #[error("cannot combine /{0} with /{1}")]
    ConflictingModes(&'static str, &'static str),

    /// A contest clause is malformed.
    #[error("invalid contest '{0}': use <number> or <target>:<trait>[+<trait>...][±N]")]
    InvalidContest(String),

    /// The extended-action clause is malformed.
    #[error("invalid extended action: {0}")]
    InvalidExtended(String),
}

/// Errors that can occur during engine operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// The expression or command could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A named trait is not set on the actor.
    #[error("{actor} doesn't have '{name}' set")]
    MissingTrait {
        /// The actor that was queried.
        actor: ActorId,
        /// The missing trait name.
        name: String,
    },

    /// A specialty was requested but the actor has none for the skill.
    #[error("no specialty in {0}")]
    MissingSpecialty(String),

    /// The contest target does not exist or has no traits.
    #[error("invalid contest target: {0}")]
    InvalidContestTarget(String),

    /// The extended-action target is below the minimum.
    #[error("extended actions need a target of at least {minimum} successes (got {target})")]
    InvalidExtendedTarget {
        /// The requested target.
        target: u32,
        /// The configured minimum.
        minimum: u32,
    },

    /// The requested roll cap exceeds the computed maximum.
    #[error("you can only make up to {maximum} rolls (requested {requested})")]
    TooManyRolls {
        /// The requested cap.
        requested: u32,
        /// The computed maximum.
        maximum: u32,
    },

    /// Extended actions need an attribute + skill pool.
    #[error("extended actions require attribute + skill format")]
    ExtendedNeedsSkill,

    /// The actor already has an extended action in progress.
    #[error("{0} already has an extended action in progress")]
    ConcurrentExtendedAction(ActorId),

    /// The actor has no extended action in progress.
    #[error("{0} has no extended action in progress")]
    NoExtendedAction(ActorId),

    /// The decision does not answer the pending question.
    #[error("decision '{got}' does not answer the pending {expected}")]
    InvalidDecision {
        /// What the action is waiting for.
        expected: PendingDecision,
        /// The decision that was submitted.
        got: String,
    },

    /// The condition id is not in the catalog.
    #[error("unknown condition: {0}")]
    UnknownCondition(String),
}

/// Convenience result type for engine operations.
pub type MechResult<T> = Result<T, MechError>;
