//! The clause after `vs`: a static number or a target's trait sum.

use dp_core::ActorId;
use serde::{Deserialize, Serialize};

use crate::contest::ContestSpec;
use crate::error::ParseError;

use super::PoolSpec;
use super::expr::trait_name;

/// A parsed contest clause, before the target name is bound to an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestExpr {
    /// A fixed number (`vs 3`).
    Static(i32),
    /// A target's traits (`vs soma:strength+weaponry-1`).
    Named {
        /// Target name as written.
        target: String,
        /// Lowercased trait names to sum.
        components: Vec<String>,
        /// Trailing flat modifier.
        modifier: i32,
    },
}

impl ContestExpr {
    /// Parse `<number>` or `<target>:<trait>[+<trait>...][±N]`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::InvalidContest(String::new()));
        }
        if let Ok(value) = input.parse::<i32>() {
            return Ok(Self::Static(value));
        }

        let invalid = || ParseError::InvalidContest(input.to_string());
        let (target, traits) = input.split_once(':').ok_or_else(invalid)?;
        let target = target.trim();
        if target.is_empty() {
            return Err(invalid());
        }

        let (traits, modifier) = split_signed_suffix(traits.trim()).map_err(|_| invalid())?;
        let components = traits
            .split('+')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| trait_name(t, input).map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        if components.is_empty() {
            return Err(invalid());
        }

        Ok(Self::Named {
            target: target.to_string(),
            components,
            modifier,
        })
    }

    /// The target name, for named contests.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Named { target, .. } => Some(target),
        }
    }

    /// Bind the target name to a resolved actor.
    pub fn bind(&self, actor: ActorId) -> ContestSpec {
        match self {
            Self::Static(value) => ContestSpec::Static(*value),
            Self::Named {
                components,
                modifier,
                ..
            } => ContestSpec::TraitSum {
                target: actor,
                components: components.clone(),
                modifier: *modifier,
            },
        }
    }

    /// The defender's pool when this clause names the other side of an opposed roll.
    pub fn to_pool_spec(&self) -> PoolSpec {
        match self {
            Self::Static(value) => PoolSpec::direct(*value),
            Self::Named {
                components,
                modifier,
                ..
            } => PoolSpec::trait_sum(components, *modifier),
        }
    }
}

impl std::str::FromStr for ContestExpr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ContestExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(value) => write!(f, "{value}"),
            Self::Named {
                target,
                components,
                modifier,
            } => {
                write!(f, "{target}:{}", components.join("+"))?;
                if *modifier != 0 {
                    write!(f, "{modifier:+}")?;
                }
                Ok(())
            }
        }
    }
}

/// Split a trailing `+N` or `-N` off a trait list.
fn split_signed_suffix(s: &str) -> Result<(&str, i32), std::num::ParseIntError> {
    let head = s.trim_end_matches(|c: char| c.is_ascii_digit());
    if head.len() == s.len() {
        return Ok((s, 0));
    }
    let digits = &s[head.len()..];
    let head = head.trim_end();
    if let Some(rest) = head.strip_suffix('+') {
        return Ok((rest, digits.parse::<i32>()?));
    }
    if let Some(rest) = head.strip_suffix('-') {
        return Ok((rest, -digits.parse::<i32>()?));
    }
    Ok((s, 0))
}
