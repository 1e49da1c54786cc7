//! Parsing pool expressions, contest clauses, and full roll command lines.
//!
//! - [`PoolSpec`] is the structured form of a pool expression such as
//!   `strength + weaponry - 2`.
//! - [`ContestExpr`] is the clause after `vs`: a number or `target:traits±N`.
//! - [`RollCommand`] is a whole line with switches and mode clauses.
//!
//! Parsing is pure. Trait names are lowercased but never looked up here.

pub mod command;
pub mod contest;
pub mod expr;

pub use command::{RollCommand, RollMode};
pub use contest::ContestExpr;

use serde::{Deserialize, Serialize};

/// The role a named component plays in a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentRole {
    /// The first named trait of a pool.
    Attribute,
    /// A trait after the first (the skill in `attribute + skill`).
    Skill,
}

/// A named trait in a pool expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolComponent {
    /// Lowercased trait name.
    pub name: String,
    /// Attribute or skill position.
    pub role: ComponentRole,
}

impl PoolComponent {
    /// An attribute-position component.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: ComponentRole::Attribute,
        }
    }

    /// A skill-position component.
    pub fn skill(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: ComponentRole::Skill,
        }
    }
}

/// The shape of a pool expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    /// A bare number of dice.
    Direct,
    /// One trait, optionally with a modifier.
    TraitOnly,
    /// An attribute and a skill, optionally with a modifier.
    TraitPlusSkill,
    /// Three or more traits (from a contest clause).
    TraitSum,
}

/// A parsed pool expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    /// Named traits, in expression order.
    pub components: Vec<PoolComponent>,
    /// Flat dice added to (or removed from) the pool.
    pub modifier: i32,
    /// The expression shape.
    pub kind: PoolKind,
}

impl PoolSpec {
    /// A direct pool of `dice` dice.
    pub fn direct(dice: i32) -> Self {
        Self {
            components: Vec::new(),
            modifier: dice,
            kind: PoolKind::Direct,
        }
    }

    /// A single-trait pool.
    pub fn trait_only(name: impl Into<String>, modifier: i32) -> Self {
        Self {
            components: vec![PoolComponent::attribute(name)],
            modifier,
            kind: PoolKind::TraitOnly,
        }
    }

    /// An attribute + skill pool.
    pub fn attribute_skill(
        attribute: impl Into<String>,
        skill: impl Into<String>,
        modifier: i32,
    ) -> Self {
        Self {
            components: vec![PoolComponent::attribute(attribute), PoolComponent::skill(skill)],
            modifier,
            kind: PoolKind::TraitPlusSkill,
        }
    }

    /// A pool summing any number of traits; the first is the attribute.
    pub fn trait_sum(names: &[String], modifier: i32) -> Self {
        let components: Vec<PoolComponent> = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                if i == 0 {
                    PoolComponent::attribute(n.clone())
                } else {
                    PoolComponent::skill(n.clone())
                }
            })
            .collect();
        let kind = match components.len() {
            0 => PoolKind::Direct,
            1 => PoolKind::TraitOnly,
            2 => PoolKind::TraitPlusSkill,
            _ => PoolKind::TraitSum,
        };
        Self {
            components,
            modifier,
            kind,
        }
    }

    /// Parse a pool expression.
    pub fn parse(input: &str) -> Result<Self, crate::ParseError> {
        expr::parse_pool(input)
    }

    /// The attribute name, if the pool names one.
    pub fn attribute(&self) -> Option<&str> {
        self.components
            .iter()
            .find(|c| c.role == ComponentRole::Attribute)
            .map(|c| c.name.as_str())
    }

    /// The skill name, if the pool names one.
    pub fn skill(&self) -> Option<&str> {
        self.components
            .iter()
            .find(|c| c.role == ComponentRole::Skill)
            .map(|c| c.name.as_str())
    }
}

impl std::str::FromStr for PoolSpec {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for PoolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == PoolKind::Direct {
            return write!(f, "{}", self.modifier);
        }
        let names: Vec<&str> = self.components.iter().map(|c| c.name.as_str()).collect();
        write!(f, "{}", names.join(" + "))?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, " + {m}"),
            m => write!(f, " - {}", m.unsigned_abs()),
        }
    }
}
