//! Full roll command lines.
//!
//! ```text
//! [/switch]* <pool> [vs <contest>] [=<target> [rolls:<n>]]
//! ```
//!
//! Switches are validated here so nothing downstream matches on strings.

use serde::{Deserialize, Serialize};

use crate::dice::{RerollRule, RollOptions};
use crate::error::ParseError;

use super::{ContestExpr, PoolSpec};

/// How the command resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollMode {
    /// One roll, optionally against a `vs` contest.
    Single,
    /// Both sides roll; higher successes wins.
    Opposed,
    /// Accumulate successes toward a target over several rolls.
    Extended {
        /// Successes needed.
        target: u32,
        /// Requested roll cap; `None` uses the computed maximum.
        max_rolls: Option<u32>,
    },
}

/// A parsed roll command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollCommand {
    /// Reroll rule and flags from the switches.
    pub options: RollOptions,
    /// Single, opposed, or extended.
    pub mode: RollMode,
    /// The acting side's pool.
    pub pool: PoolSpec,
    /// The `vs` clause, if any.
    pub contest: Option<ContestExpr>,
}

impl RollCommand {
    /// Parse a full command line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let (switches, rest) = split_switches(line.trim())?;

        let mut options = RollOptions::default();
        let mut again: Option<RerollRule> = None;
        let mut opposed = false;
        let mut extended = false;
        for switch in &switches {
            if let Some(rule) = RerollRule::from_switch(switch) {
                if again.is_some_and(|a| a != rule) {
                    return Err(ParseError::ConflictingAgain);
                }
                again = Some(rule);
                continue;
            }
            match switch.as_str() {
                "rote" => options.rote = true,
                "reflex" => options.reflexive = true,
                "damage" => options.damage = true,
                "specialty" => options.specialty = true,
                "secret" => options.secret = true,
                "opposed" => opposed = true,
                "extended" => extended = true,
                other => return Err(ParseError::UnknownSwitch(other.to_string())),
            }
        }
        options.again = again.unwrap_or_default();
        if opposed && extended {
            return Err(ParseError::ConflictingModes("opposed", "extended"));
        }

        let (rest, max_rolls) = split_rolls_clause(rest)?;
        if max_rolls.is_some() && !extended {
            return Err(ParseError::InvalidExtended(
                "rolls:<n> requires /extended".to_string(),
            ));
        }

        let (rest, target) = match rest.split_once('=') {
            Some((pool, target)) => {
                if !extended {
                    return Err(ParseError::InvalidExtended(
                        "=<target> requires /extended".to_string(),
                    ));
                }
                let target = target.trim();
                let value = target.parse::<u32>().map_err(|_| {
                    ParseError::InvalidExtended(format!("target '{target}' is not a number"))
                })?;
                (pool.trim(), Some(value))
            }
            None => (rest, None),
        };

        let (pool_text, contest) = match split_vs(rest) {
            Some((pool, contest)) => (pool, Some(ContestExpr::parse(contest)?)),
            None => (rest, None),
        };
        let pool = PoolSpec::parse(pool_text)?;

        let mode = if extended {
            if contest.is_some() {
                return Err(ParseError::InvalidExtended(
                    "extended actions cannot be contested".to_string(),
                ));
            }
            let target = target.ok_or_else(|| {
                ParseError::InvalidExtended("a target is required: <pool>=<target>".to_string())
            })?;
            RollMode::Extended {
                target,
                max_rolls: max_rolls.filter(|&n| n > 0),
            }
        } else if opposed {
            match &contest {
                Some(ContestExpr::Named { .. }) => RollMode::Opposed,
                Some(other) => return Err(ParseError::InvalidContest(other.to_string())),
                None => return Err(ParseError::InvalidContest(String::new())),
            }
        } else {
            RollMode::Single
        };

        Ok(Self {
            options,
            mode,
            pool,
            contest,
        })
    }

    /// Returns true for extended commands.
    pub fn is_extended(&self) -> bool {
        matches!(self.mode, RollMode::Extended { .. })
    }
}

impl std::str::FromStr for RollCommand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Peel leading `/switch` tokens off the line.
fn split_switches(mut rest: &str) -> Result<(Vec<String>, &str), ParseError> {
    let mut switches = Vec::new();
    while let Some(stripped) = rest.strip_prefix('/') {
        let end = stripped
            .find(|c: char| c == '/' || c.is_whitespace())
            .unwrap_or(stripped.len());
        let switch = &stripped[..end];
        if switch.is_empty() {
            return Err(ParseError::UnknownSwitch(String::new()));
        }
        switches.push(switch.to_ascii_lowercase());
        rest = stripped[end..].trim_start();
    }
    if rest.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok((switches, rest))
}

/// Remove a trailing `rolls:<n>` clause (case-insensitive).
fn split_rolls_clause(line: &str) -> Result<(&str, Option<u32>), ParseError> {
    let lower = line.to_ascii_lowercase();
    let Some(start) = lower.rfind("rolls:") else {
        return Ok((line, None));
    };
    let value = line[start + "rolls:".len()..].trim();
    let rolls = value
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidExtended(format!("rolls '{value}' is not a number")))?;
    Ok((line[..start].trim_end(), Some(rolls)))
}

/// Split on a whitespace-delimited `vs` (case-insensitive).
fn split_vs(line: &str) -> Option<(&str, &str)> {
    let lower = line.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    lower.match_indices("vs").find_map(move |(i, _)| {
        let before = i > 0 && bytes[i - 1].is_ascii_whitespace();
        let after = bytes.get(i + 2).is_some_and(u8::is_ascii_whitespace);
        (before && after).then(|| (line[..i].trim_end(), line[i + 2..].trim_start()))
    })
}
