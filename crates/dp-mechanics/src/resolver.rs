//! Turning a [`PoolSpec`] into a final dice count.

use dp_core::{ActorId, TraitProvider};
use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};
use crate::parser::PoolSpec;

/// Adjustments that come from the situation rather than the expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situational {
    /// Wound penalty, zero or negative.
    pub wound_penalty: i32,
    /// Specialty bonus, 0 or 1.
    pub specialty_bonus: i32,
    /// Contest penalty, zero or negative.
    pub contest_penalty: i32,
}

impl Situational {
    /// Sum of all situational adjustments.
    pub fn total(&self) -> i32 {
        self.wound_penalty
            .saturating_add(self.specialty_bonus)
            .saturating_add(self.contest_penalty)
    }
}

/// A pool with every component looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPool {
    /// Each named trait and its value, in expression order.
    pub traits: Vec<(String, i32)>,
    /// Flat modifier from the expression.
    pub modifier: i32,
    /// Situational adjustments applied on top.
    pub situational: Situational,
    /// Unclamped total. May be zero or negative.
    pub final_pool: i32,
}

impl ResolvedPool {
    /// Traits plus the flat modifier, before situational adjustments.
    pub fn base(&self) -> i32 {
        self.traits
            .iter()
            .fold(self.modifier, |acc, (_, v)| acc.saturating_add(*v))
    }

    /// Number of dice actually rolled.
    pub fn dice_count(&self) -> u32 {
        self.final_pool.max(0) as u32
    }

    /// Value of a resolved trait by name.
    pub fn trait_value(&self, name: &str) -> Option<i32> {
        self.traits
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// Resolve every trait of `spec` for `actor` and apply the situational adjustments.
///
/// An unset trait is an error. The final pool is not clamped.
pub fn resolve_pool(
    spec: &PoolSpec,
    actor: ActorId,
    traits: &dyn TraitProvider,
    situational: Situational,
) -> MechResult<ResolvedPool> {
    let resolved = spec
        .components
        .iter()
        .map(|c| {
            traits
                .trait_value(actor, &c.name)
                .map(|v| (c.name.clone(), v))
                .ok_or_else(|| MechError::MissingTrait {
                    actor,
                    name: c.name.clone(),
                })
        })
        .collect::<MechResult<Vec<_>>>()?;

    let mut pool = ResolvedPool {
        traits: resolved,
        modifier: spec.modifier,
        situational,
        final_pool: 0,
    };
    pool.final_pool = pool.base().saturating_add(situational.total());
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_core::{CharacterSheet, Roster};

    fn roster() -> (Roster, ActorId) {
        let mut roster = Roster::new();
        let kael = roster
            .add(
                CharacterSheet::new("Kael")
                    .with_attribute("strength", 3)
                    .with_skill("weaponry", 2),
            )
            .unwrap();
        (roster, kael)
    }

    #[test]
    fn sums_traits_and_modifier() {
        let (roster, kael) = roster();
        let spec = PoolSpec::attribute_skill("strength", "weaponry", -2);
        let pool = resolve_pool(&spec, kael, &roster, Situational::default()).unwrap();
        assert_eq!(pool.traits, vec![("strength".to_string(), 3), ("weaponry".to_string(), 2)]);
        assert_eq!(pool.base(), 3);
        assert_eq!(pool.final_pool, 3);
        assert_eq!(pool.trait_value("Weaponry"), Some(2));
    }

    #[test]
    fn applies_situational_adjustments() {
        let (roster, kael) = roster();
        let spec = PoolSpec::attribute_skill("strength", "weaponry", 0);
        let situational = Situational {
            wound_penalty: -2,
            specialty_bonus: 1,
            contest_penalty: -3,
        };
        let pool = resolve_pool(&spec, kael, &roster, situational).unwrap();
        assert_eq!(pool.final_pool, 1);
    }

    #[test]
    fn negative_pool_is_kept() {
        let (roster, kael) = roster();
        let spec = PoolSpec::trait_only("weaponry", -5);
        let pool = resolve_pool(&spec, kael, &roster, Situational::default()).unwrap();
        assert_eq!(pool.final_pool, -3);
        assert_eq!(pool.dice_count(), 0);
    }

    #[test]
    fn direct_pool_needs_no_traits() {
        let (roster, kael) = roster();
        let pool =
            resolve_pool(&PoolSpec::direct(6), kael, &roster, Situational::default()).unwrap();
        assert!(pool.traits.is_empty());
        assert_eq!(pool.dice_count(), 6);
    }

    #[test]
    fn missing_trait_is_named() {
        let (roster, kael) = roster();
        let spec = PoolSpec::attribute_skill("strength", "occult", 0);
        let err = resolve_pool(&spec, kael, &roster, Situational::default()).unwrap_err();
        assert!(matches!(err, MechError::MissingTrait { ref name, .. } if name == "occult"));
        assert!(err.to_string().contains("occult"));
    }

    #[test]
    fn extreme_pools_saturate() {
        let (roster, kael) = roster();
        let situational = Situational {
            wound_penalty: -1,
            ..Situational::default()
        };
        let pool = resolve_pool(&PoolSpec::direct(i32::MIN), kael, &roster, situational).unwrap();
        assert_eq!(pool.final_pool, i32::MIN);
        assert_eq!(pool.dice_count(), 0);
    }
}
