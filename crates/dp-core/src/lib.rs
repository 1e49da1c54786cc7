//! Core types for the dicepool engine: actors, character sheets, and the
//! collaborators the dice engine consumes.
//!
//! The engine in `dp-mechanics` only sees the traits in [`provider`]. This
//! crate also ships in-memory implementations of all of them: a [`Roster`]
//! of character sheets, a [`BeatLedger`] for reward events, and the standard
//! condition catalog with a [`ConditionTracker`].

/// Actor identifiers.
pub mod actor;
/// Beat rewards raised by exceptional successes and dramatic failures.
pub mod beats;
/// The standard condition catalog and granted-condition tracking.
pub mod conditions;
/// Error types used throughout the crate.
pub mod error;
/// Collaborator traits consumed by the dice engine.
pub mod provider;
/// The in-memory roster of character sheets.
pub mod roster;
/// Character sheets and trait lookup.
pub mod sheet;

pub use actor::ActorId;
pub use beats::BeatLedger;
pub use conditions::{Condition, ConditionTracker, StandardConditions};
pub use error::{CoreError, CoreResult};
pub use provider::{
    CharacterSource, ConditionCatalog, ConditionGranter, RewardKind, RewardSink,
    SpecialtyProvider, TraitProvider, WoundPenaltyProvider,
};
pub use roster::Roster;
pub use sheet::CharacterSheet;
