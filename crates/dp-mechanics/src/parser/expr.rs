//! Pool expression grammar.
//!
//! ```text
//! pool  := int
//!        | term
//!        | term "+" int
//!        | term "+" term
//!        | term "+" term "+" int
//! term  := name [ "-" digits ]
//! ```
//!
//! A trailing `-N` is only a modifier when stripping it leaves a non-empty
//! name, so hyphenated names such as `animal-ken` survive intact.

use crate::error::ParseError;

use super::PoolSpec;

/// Parse a pool expression into a [`PoolSpec`].
pub fn parse_pool(input: &str) -> Result<PoolSpec, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    if let Ok(dice) = input.parse::<i32>() {
        return Ok(PoolSpec::direct(dice));
    }

    let parts: Vec<&str> = input.split('+').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(ParseError::UnknownFormat(input.to_string()));
    }

    match parts.as_slice() {
        [single] => {
            let (name, modifier) = split_trailing_modifier(single)?;
            Ok(PoolSpec::trait_only(trait_name(name, input)?, modifier))
        }
        [first, second] => {
            if let Ok(flat) = second.parse::<i32>() {
                let (name, attached) = split_trailing_modifier(first)?;
                return Ok(PoolSpec::trait_only(
                    trait_name(name, input)?,
                    sum_modifiers(&[attached, flat], input)?,
                ));
            }
            let (attribute, a_mod) = split_trailing_modifier(first)?;
            let (skill, s_mod) = split_trailing_modifier(second)?;
            Ok(PoolSpec::attribute_skill(
                trait_name(attribute, input)?,
                trait_name(skill, input)?,
                sum_modifiers(&[a_mod, s_mod], input)?,
            ))
        }
        [first, second, third] => {
            let flat = third
                .parse::<i32>()
                .map_err(|_| ParseError::InvalidModifier(third.to_string()))?;
            let (attribute, a_mod) = split_trailing_modifier(first)?;
            let (skill, s_mod) = split_trailing_modifier(second)?;
            Ok(PoolSpec::attribute_skill(
                trait_name(attribute, input)?,
                trait_name(skill, input)?,
                sum_modifiers(&[a_mod, s_mod, flat], input)?,
            ))
        }
        _ => Err(ParseError::UnknownFormat(input.to_string())),
    }
}

/// Split `name-N` (or `name - N`) into the name and `-N`.
///
/// Returns a zero modifier when the term has no trailing `-digits` or when
/// stripping it would leave nothing.
pub(crate) fn split_trailing_modifier(term: &str) -> Result<(&str, i32), ParseError> {
    let term = term.trim();
    let head = term.trim_end_matches(|c: char| c.is_ascii_digit());
    if head.len() == term.len() {
        return Ok((term, 0));
    }
    let Some(name) = head.trim_end().strip_suffix('-') else {
        return Ok((term, 0));
    };
    let name = name.trim_end();
    if name.is_empty() {
        return Ok((term, 0));
    }
    let digits = &term[head.len()..];
    let value = digits
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidModifier(format!("-{digits}")))?;
    Ok((name, -value))
}

/// Add modifier terms, rejecting totals that do not fit in an `i32`.
fn sum_modifiers(terms: &[i32], expr: &str) -> Result<i32, ParseError> {
    terms
        .iter()
        .try_fold(0i32, |acc, &m| acc.checked_add(m))
        .ok_or_else(|| ParseError::InvalidModifier(expr.to_string()))
}

/// Validate and normalize a trait name.
pub(crate) fn trait_name(raw: &str, expr: &str) -> Result<String, ParseError> {
    let name = raw.trim();
    if name.is_empty() || name.parse::<i32>().is_ok() || name.starts_with('-') {
        return Err(ParseError::UnknownFormat(expr.to_string()));
    }
    Ok(name.to_lowercase())
}
