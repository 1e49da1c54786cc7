//! Ten-sided dice, reroll rules, and rolling.
//!
//! Every pool is a number of d10s. A die at or above the X-again threshold
//! adds another die (recursively). Rote quality rerolls each failed die once.
//! Dice come from a [`DieSource`] so rolls can be seeded or scripted.

pub mod pool;
pub mod roll;

pub use pool::DicePool;
pub use roll::{DieOrigin, DieResult, RawRoll};

use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Faces at or above this value count as a success.
pub const SUCCESS_THRESHOLD: u32 = 8;

/// Number of faces on every die in the engine.
pub const DIE_SIDES: u32 = 10;

/// Which faces grant an additional die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RerollRule {
    /// Only 10s reroll.
    #[default]
    TenAgain,
    /// 9s and 10s reroll.
    NineAgain,
    /// 8s, 9s, and 10s reroll.
    EightAgain,
}

impl RerollRule {
    /// The lowest face that grants another die.
    pub fn threshold(self) -> u32 {
        match self {
            Self::TenAgain => 10,
            Self::NineAgain => 9,
            Self::EightAgain => 8,
        }
    }

    /// Parse an X-again switch ("10", "9", "8").
    pub fn from_switch(s: &str) -> Option<Self> {
        match s {
            "10" => Some(Self::TenAgain),
            "9" => Some(Self::NineAgain),
            "8" => Some(Self::EightAgain),
            _ => None,
        }
    }
}

impl std::fmt::Display for RerollRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-again", self.threshold())
    }
}

/// The reroll rule plus the independent flags a roll can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOptions {
    /// X-again threshold.
    pub again: RerollRule,
    /// Reroll every failed die once.
    pub rote: bool,
    /// Reflexive action: wound penalties do not apply.
    pub reflexive: bool,
    /// Damage roll: wound penalties do not apply.
    pub damage: bool,
    /// Add the specialty bonus for the rolled skill.
    pub specialty: bool,
    /// Hide trait values from observers. No effect on the numbers.
    pub secret: bool,
}

impl RollOptions {
    /// Default options: 10-again, no flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the X-again rule.
    pub fn with_again(mut self, again: RerollRule) -> Self {
        self.again = again;
        self
    }

    /// Enable rote quality.
    pub fn with_rote(mut self) -> Self {
        self.rote = true;
        self
    }

    /// Mark as a reflexive action.
    pub fn with_reflexive(mut self) -> Self {
        self.reflexive = true;
        self
    }

    /// Mark as a damage roll.
    pub fn with_damage(mut self) -> Self {
        self.damage = true;
        self
    }

    /// Request the specialty bonus.
    pub fn with_specialty(mut self) -> Self {
        self.specialty = true;
        self
    }

    /// Returns true if wound penalties should be skipped.
    pub fn ignores_wounds(&self) -> bool {
        self.reflexive || self.damage
    }
}

/// Something that produces d10 faces.
pub trait DieSource {
    /// Roll one ten-sided die (1 to 10).
    fn roll_d10(&mut self) -> u32;
}

impl DieSource for StdRng {
    fn roll_d10(&mut self) -> u32 {
        self.random_range(1..=DIE_SIDES)
    }
}

/// A die source that replays a fixed sequence of faces.
///
/// Once the script runs out every die shows the fallback face, which
/// defaults to 5 (a plain failure that never rerolls).
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedDice {
    /// Script the given faces, in order. Values are clamped to 1..=10.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().map(|f| f.clamp(1, DIE_SIDES)).collect(),
            fallback: 5,
        }
    }

    /// Change the face shown once the script is exhausted.
    pub fn with_fallback(mut self, face: u32) -> Self {
        self.fallback = face.clamp(1, DIE_SIDES);
        self
    }

    /// Append more faces to the end of the script.
    pub fn push(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces
            .extend(faces.into_iter().map(|f| f.clamp(1, DIE_SIDES)));
    }

    /// Faces not yet consumed.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DieSource for ScriptedDice {
    fn roll_d10(&mut self) -> u32 {
        self.faces.pop_front().unwrap_or(self.fallback)
    }
}
