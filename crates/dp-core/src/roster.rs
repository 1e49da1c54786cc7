//! The in-memory roster of character sheets.
//!
//! A [`Roster`] owns every sheet and answers the engine's trait, wound, and
//! specialty queries. It can be built programmatically or loaded from JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::error::{CoreError, CoreResult};
use crate::provider::{SpecialtyProvider, TraitProvider, WoundPenaltyProvider};
use crate::sheet::CharacterSheet;

/// On-disk shape of a roster file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RosterFile {
    characters: Vec<CharacterSheet>,
}

/// All actors known to the engine, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    sheets: HashMap<ActorId, CharacterSheet>,
    name_index: HashMap<String, ActorId>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a roster from JSON of the form `{"characters": [...]}`.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let file: RosterFile = serde_json::from_str(json)?;
        let mut roster = Self::new();
        for sheet in file.characters {
            roster.add(sheet)?;
        }
        Ok(roster)
    }

    /// Serialize the roster back to pretty-printed JSON, ordered by name.
    pub fn to_json(&self) -> CoreResult<String> {
        let mut characters: Vec<CharacterSheet> = self.sheets.values().cloned().collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(serde_json::to_string_pretty(&RosterFile { characters })?)
    }

    /// Add a sheet. Names must be unique (case-insensitive).
    pub fn add(&mut self, sheet: CharacterSheet) -> CoreResult<ActorId> {
        sheet.validate()?;
        let key = sheet.name.to_lowercase();
        if self.name_index.contains_key(&key) {
            return Err(CoreError::DuplicateName(sheet.name));
        }
        let id = sheet.id;
        self.name_index.insert(key, id);
        self.sheets.insert(id, sheet);
        Ok(id)
    }

    /// Find an actor by display name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> CoreResult<ActorId> {
        self.name_index
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| CoreError::ActorNotFound(name.to_string()))
    }

    /// Get a sheet by actor ID.
    pub fn get(&self, actor: ActorId) -> Option<&CharacterSheet> {
        self.sheets.get(&actor)
    }

    /// Get a mutable sheet by actor ID.
    pub fn get_mut(&mut self, actor: ActorId) -> Option<&mut CharacterSheet> {
        self.sheets.get_mut(&actor)
    }

    /// The display name of an actor, or its short ID if unknown.
    pub fn display_name(&self, actor: ActorId) -> String {
        self.get(actor)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| actor.to_string())
    }

    /// Iterate over all sheets.
    pub fn sheets(&self) -> impl Iterator<Item = &CharacterSheet> {
        self.sheets.values()
    }

    /// Number of actors on the roster.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Returns true if the roster has no actors.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl TraitProvider for Roster {
    fn has_actor(&self, actor: ActorId) -> bool {
        self.sheets.contains_key(&actor)
    }

    fn trait_value(&self, actor: ActorId, name: &str) -> Option<i32> {
        self.get(actor)?.trait_value(name)
    }

    fn has_merit(&self, actor: ActorId, merit: &str) -> bool {
        self.get(actor)
            .is_some_and(|s| s.merits.keys().any(|k| k.eq_ignore_ascii_case(merit)))
    }
}

impl WoundPenaltyProvider for Roster {
    fn wound_penalty(&self, actor: ActorId) -> i32 {
        self.get(actor).map_or(0, |s| s.wound_penalty.min(0))
    }
}

impl SpecialtyProvider for Roster {
    fn specialty(&self, actor: ActorId, skill: &str) -> (i32, Option<String>) {
        match self.get(actor).and_then(|s| s.specialty(skill)) {
            Some(label) => (1, Some(label.to_string())),
            None => (0, None),
        }
    }
}
