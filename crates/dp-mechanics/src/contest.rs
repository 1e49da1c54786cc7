//! Contested rolls.
//!
//! A `vs` contest subtracts a static number or a target's trait sum from the
//! acting pool; only the actor rolls. An opposed roll has both sides roll and
//! compares successes.

use dp_core::{ActorId, TraitProvider};
use serde::{Deserialize, Serialize};

use crate::engine::CheckResult;
use crate::error::{MechError, MechResult};

/// What a `vs` roll is made against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestSpec {
    /// A fixed value.
    Static(i32),
    /// The sum of a target's traits plus a modifier.
    TraitSum {
        /// The opposing actor.
        target: ActorId,
        /// Trait names to sum.
        components: Vec<String>,
        /// Flat modifier.
        modifier: i32,
    },
}

impl ContestSpec {
    /// Resolve the contest value at roll time. Never negative.
    pub fn resolve(&self, traits: &dyn TraitProvider) -> MechResult<i32> {
        match self {
            Self::Static(value) => Ok((*value).max(0)),
            Self::TraitSum {
                target,
                components,
                modifier,
            } => {
                if !traits.has_actor(*target) {
                    return Err(MechError::InvalidContestTarget(target.to_string()));
                }
                let mut total = *modifier;
                for name in components {
                    total += traits.trait_value(*target, name).ok_or_else(|| {
                        MechError::MissingTrait {
                            actor: *target,
                            name: name.clone(),
                        }
                    })?;
                }
                Ok(total.max(0))
            }
        }
    }

    /// The penalty applied to the acting pool (the negated contest value).
    pub fn penalty(&self, traits: &dyn TraitProvider) -> MechResult<i32> {
        Ok(-self.resolve(traits)?)
    }
}

/// One side of an opposed roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The actor who initiated the roll.
    Attacker,
    /// The actor named after `vs`.
    Defender,
}

/// Both sides of an opposed roll and who won.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpposedResult {
    /// The initiating side.
    pub attacker: CheckResult,
    /// The opposing side.
    pub defender: CheckResult,
    /// Higher successes wins; `None` on a tie.
    pub winner: Option<Side>,
    /// Difference in successes.
    pub margin: u32,
}

impl OpposedResult {
    /// Compare two finished checks.
    pub fn new(attacker: CheckResult, defender: CheckResult) -> Self {
        let a = attacker.outcome.successes;
        let d = defender.outcome.successes;
        let winner = match a.cmp(&d) {
            std::cmp::Ordering::Greater => Some(Side::Attacker),
            std::cmp::Ordering::Less => Some(Side::Defender),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            attacker,
            defender,
            winner,
            margin: a.abs_diff(d),
        }
    }

    /// The winning check, if any.
    pub fn winning(&self) -> Option<&CheckResult> {
        match self.winner? {
            Side::Attacker => Some(&self.attacker),
            Side::Defender => Some(&self.defender),
        }
    }
}
