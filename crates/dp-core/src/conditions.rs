//! The standard condition catalog and granted-condition tracking.
//!
//! Conditions are what a player accepts to keep going after a failed roll in
//! an extended action. The catalog lists them sorted by display name; the
//! tracker records which ones each actor has been granted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::provider::{ConditionCatalog, ConditionGranter};

/// A condition definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Stable catalog identifier (e.g., "confused").
    pub id: String,
    /// Display name (e.g., "Confused").
    pub name: String,
    /// Short rules summary.
    pub description: String,
    /// Persistent conditions do not fade on their own.
    pub persistent: bool,
}

impl Condition {
    fn temporary(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            persistent: false,
        }
    }
}

/// The built-in catalog of standard conditions.
#[derive(Debug, Clone)]
pub struct StandardConditions {
    conditions: Vec<Condition>,
}

impl StandardConditions {
    /// Build the standard catalog.
    pub fn new() -> Self {
        let mut conditions = vec![
            Condition::temporary(
                "confused",
                "Confused",
                "-2 dice on all Intelligence and Wits rolls.",
            ),
            Condition::temporary(
                "demoralized",
                "Demoralized",
                "Hesitant and shaken in the face of the enemy.",
            ),
            Condition::temporary(
                "distracted",
                "Distracted",
                "No extended actions; -2 dice to perception, concentration, and precision.",
            ),
            Condition::temporary(
                "exhausted",
                "Exhausted",
                "Run ragged and in desperate need of rest.",
            ),
            Condition::temporary(
                "frightened",
                "Frightened",
                "Must get away from the source of fear before anything else.",
            ),
            Condition::temporary(
                "guilty",
                "Guilty",
                "-2 dice to Resolve or Composure when resisting social pressure.",
            ),
            Condition::temporary(
                "informed",
                "Informed",
                "Resolve to raise the result of a related roll by one step.",
            ),
            Condition::temporary(
                "inspired",
                "Inspired",
                "Resolve on a related roll: exceptional success on three successes.",
            ),
            Condition::temporary(
                "intoxicated",
                "Intoxicated",
                "-2 dice to Dexterity and Wits pools.",
            ),
            Condition::temporary(
                "isolated",
                "Isolated",
                "Cut off from allies and cornered.",
            ),
            Condition::temporary(
                "leveraged",
                "Leveraged",
                "Blackmailed or tricked into doing another's bidding.",
            ),
            Condition::temporary(
                "lost",
                "Lost",
                "Cannot pursue the goal without first finding the way.",
            ),
            Condition::temporary(
                "notoriety",
                "Notoriety",
                "Social rolls and Social Maneuvering suffer a penalty.",
            ),
            Condition::temporary(
                "obsession",
                "Obsession",
                "9-again on rolls toward the obsession; no 10-again otherwise.",
            ),
            Condition::temporary(
                "shaken",
                "Shaken",
                "May choose to fail a roll the fear would hinder to resolve this.",
            ),
            Condition::temporary(
                "spooked",
                "Spooked",
                "Captivated by a glimpse of something otherworldly.",
            ),
            Condition::temporary(
                "steadfast",
                "Steadfast",
                "Resolve after a failed roll to treat it as a single success.",
            ),
            Condition::temporary(
                "stumbled",
                "Stumbled",
                "Each further roll in the extended action is at -3 dice.",
            ),
        ];
        conditions.sort_by(|a, b| a.name.cmp(&b.name));
        Self { conditions }
    }

    /// Look up a condition by id.
    pub fn get(&self, id: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    /// All conditions, sorted by display name.
    pub fn all(&self) -> &[Condition] {
        &self.conditions
    }
}

impl Default for StandardConditions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionCatalog for StandardConditions {
    fn list(&self) -> Vec<(String, String)> {
        self.conditions
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect()
    }

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

/// A condition granted to an actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantedCondition {
    /// Catalog id of the condition.
    pub id: String,
    /// When it was granted.
    pub granted_at: DateTime<Utc>,
}

/// Records the conditions granted to each actor.
#[derive(Debug, Clone, Default)]
pub struct ConditionTracker {
    granted: HashMap<ActorId, Vec<GrantedCondition>>,
}

impl ConditionTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Conditions granted to an actor, oldest first.
    pub fn conditions(&self, actor: ActorId) -> &[GrantedCondition] {
        self.granted.get(&actor).map_or(&[], Vec::as_slice)
    }

    /// Returns true if the actor currently has the condition.
    pub fn has(&self, actor: ActorId, id: &str) -> bool {
        self.conditions(actor).iter().any(|c| c.id == id)
    }
}

impl ConditionGranter for ConditionTracker {
    fn grant(&mut self, actor: ActorId, id: &str) {
        let list = self.granted.entry(actor).or_default();
        // Conditions do not stack; a second grant refreshes the timestamp.
        list.retain(|c| c.id != id);
        list.push(GrantedCondition {
            id: id.to_string(),
            granted_at: Utc::now(),
        });
    }
}
