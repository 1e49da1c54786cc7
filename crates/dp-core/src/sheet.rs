//! Character sheets with attributes, skills, advantages, merits, and specialties.
//!
//! Trait lookup is case-insensitive and searches the categories in a fixed
//! order: attributes, skills, advantages, then merits. The first hit wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::error::{CoreError, CoreResult};

/// A character's dice-relevant traits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Unique identifier, generated when absent from the source data.
    #[serde(default)]
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Attribute ratings (e.g., strength: 3, wits: 2).
    #[serde(default)]
    pub attributes: HashMap<String, i32>,
    /// Skill ratings (e.g., weaponry: 2, academics: 0).
    #[serde(default)]
    pub skills: HashMap<String, i32>,
    /// Derived advantages (e.g., defense: 3, initiative: 5).
    #[serde(default)]
    pub advantages: HashMap<String, i32>,
    /// Merit ratings (e.g., patient: 1).
    #[serde(default)]
    pub merits: HashMap<String, i32>,
    /// Specialty labels keyed by skill (e.g., weaponry: "Swords").
    #[serde(default)]
    pub specialties: HashMap<String, String>,
    /// Current wound penalty (zero or negative).
    #[serde(default)]
    pub wound_penalty: i32,
}

impl CharacterSheet {
    /// Create an empty sheet with a fresh ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute rating.
    pub fn with_attribute(mut self, name: &str, value: i32) -> Self {
        self.attributes.insert(name.to_lowercase(), value);
        self
    }

    /// Set a skill rating.
    pub fn with_skill(mut self, name: &str, value: i32) -> Self {
        self.skills.insert(name.to_lowercase(), value);
        self
    }

    /// Set an advantage rating.
    pub fn with_advantage(mut self, name: &str, value: i32) -> Self {
        self.advantages.insert(name.to_lowercase(), value);
        self
    }

    /// Set a merit rating.
    pub fn with_merit(mut self, name: &str, value: i32) -> Self {
        self.merits.insert(name.to_lowercase(), value);
        self
    }

    /// Add a specialty for a skill.
    pub fn with_specialty(mut self, skill: &str, label: impl Into<String>) -> Self {
        self.specialties.insert(skill.to_lowercase(), label.into());
        self
    }

    /// Set the wound penalty. Positive values are clamped to zero.
    pub fn with_wound_penalty(mut self, penalty: i32) -> Self {
        self.wound_penalty = penalty.min(0);
        self
    }

    /// Look up any trait by name, or `None` if it is unset.
    pub fn trait_value(&self, name: &str) -> Option<i32> {
        [&self.attributes, &self.skills, &self.advantages, &self.merits]
            .into_iter()
            .find_map(|table| lookup(table, name))
    }

    /// The specialty label for a skill, if the character has one.
    pub fn specialty(&self, skill: &str) -> Option<&str> {
        self.specialties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(skill.trim()))
            .map(|(_, v)| v.as_str())
    }

    /// Check that every rating is non-negative and the wound penalty is not positive.
    pub fn validate(&self) -> CoreResult<()> {
        let tables = [&self.attributes, &self.skills, &self.advantages, &self.merits];
        for (name, value) in tables.into_iter().flatten() {
            if *value < 0 {
                return Err(self.invalid(name, *value));
            }
        }
        if self.wound_penalty > 0 {
            return Err(self.invalid("wound_penalty", self.wound_penalty));
        }
        Ok(())
    }

    fn invalid(&self, name: &str, value: i32) -> CoreError {
        CoreError::InvalidTrait {
            actor: self.name.clone(),
            name: name.to_string(),
            value,
        }
    }
}

fn lookup(table: &HashMap<String, i32>, name: &str) -> Option<i32> {
    let name = name.trim();
    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| *v)
}
