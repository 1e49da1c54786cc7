//! Collaborator traits consumed by the dice engine.
//!
//! Trait storage, wound penalties, specialties, beat rewards, and conditions
//! all live outside the engine. The engine only asks these questions and
//! raises these events; how they are answered or recorded is up to the
//! implementor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// Resolves named traits (attributes, skills, advantages, merits) to values.
pub trait TraitProvider {
    /// Returns true if the actor exists and has a trait store at all.
    fn has_actor(&self, actor: ActorId) -> bool;

    /// Look up a trait by name. `None` means the trait is unset.
    fn trait_value(&self, actor: ActorId, name: &str) -> Option<i32>;

    /// Returns true if the actor has the named merit at all, whatever its rating.
    fn has_merit(&self, actor: ActorId, merit: &str) -> bool {
        self.trait_value(actor, merit).is_some()
    }
}

/// Supplies the current wound penalty of an actor.
pub trait WoundPenaltyProvider {
    /// The wound penalty, always zero or negative.
    fn wound_penalty(&self, actor: ActorId) -> i32;
}

/// Supplies specialty bonuses for skills.
pub trait SpecialtyProvider {
    /// Returns `(bonus, label)` where bonus is 0 or 1 and label names the specialty.
    fn specialty(&self, actor: ActorId, skill: &str) -> (i32, Option<String>);
}

/// Everything the engine reads about an actor: traits, wounds, and specialties.
pub trait CharacterSource: TraitProvider + WoundPenaltyProvider + SpecialtyProvider {}

impl<T> CharacterSource for T where T: TraitProvider + WoundPenaltyProvider + SpecialtyProvider {}

/// The kind of reward event raised by a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// Five or more successes on a single roll.
    ExceptionalSuccess,
    /// Zero successes, at least one 1, and a non-positive pool.
    DramaticFailure,
}

impl RewardKind {
    /// The wire name of the event.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExceptionalSuccess => "exceptional_success",
            Self::DramaticFailure => "dramatic_failure",
        }
    }
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExceptionalSuccess => write!(f, "exceptional success"),
            Self::DramaticFailure => write!(f, "dramatic failure"),
        }
    }
}

/// Receives reward events. Each qualifying side of a roll raises exactly one.
pub trait RewardSink {
    /// Record a reward event for an actor.
    fn emit(&mut self, actor: ActorId, kind: RewardKind);
}

/// Enumerates the conditions a player may accept after a failed extended roll.
pub trait ConditionCatalog {
    /// All selectable conditions as `(id, display_name)` pairs.
    fn list(&self) -> Vec<(String, String)>;

    /// Returns true if the catalog contains the given condition id.
    fn contains(&self, id: &str) -> bool {
        self.list().iter().any(|(cid, _)| cid == id)
    }
}

/// Grants a condition to an actor.
pub trait ConditionGranter {
    /// Apply the condition with the given catalog id to the actor.
    fn grant(&mut self, actor: ActorId, id: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<i32>);

    impl TraitProvider for Fixed {
        fn has_actor(&self, _actor: ActorId) -> bool {
            true
        }

        fn trait_value(&self, _actor: ActorId, _name: &str) -> Option<i32> {
            self.0
        }
    }

    #[test]
    fn has_merit_only_needs_the_key() {
        let actor = ActorId::new();
        assert!(Fixed(Some(1)).has_merit(actor, "patient"));
        assert!(Fixed(Some(0)).has_merit(actor, "patient"));
        assert!(!Fixed(None).has_merit(actor, "patient"));
    }

    #[test]
    fn reward_kind_names() {
        assert_eq!(RewardKind::ExceptionalSuccess.as_str(), "exceptional_success");
        assert_eq!(RewardKind::DramaticFailure.as_str(), "dramatic_failure");
        assert_eq!(RewardKind::DramaticFailure.to_string(), "dramatic failure");
    }
}
