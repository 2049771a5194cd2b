use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid format for '{input}'. Expected '{expected}' (e.g., '{example}').")]
    MissingSeparator {
        input: String,
        expected: &'static str,
        example: &'static str,
    },

    #[error("Stat name cannot be empty in '{0}'.")]
    EmptyName(String),

    #[error("Invalid number '{value}' in '{input}'.")]
    InvalidNumber { input: String, value: String },
}

/// A requirement as typed on the command line, before core validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementArg {
    pub name: String,
    pub value: i64,
    pub condition: Option<String>,
}

/// Parses `NAME=VALUE[:COND]`.
pub fn parse_requirement(input: &str) -> Result<RequirementArg, ParseError> {
    let (name, rest) = split_assignment(input, "NAME=VALUE[:COND]", "Strength=40:pre")?;
    let (value_str, condition) = match rest.split_once(':') {
        Some((value, cond)) => (value.trim(), Some(cond.trim().to_string())),
        None => (rest.trim(), None),
    };
    let value = value_str.parse().map_err(|_| ParseError::InvalidNumber {
        input: input.to_string(),
        value: value_str.to_string(),
    })?;

    Ok(RequirementArg {
        name,
        value,
        condition,
    })
}

/// Parses `NAME=POINTS`.
pub fn parse_allocation(input: &str) -> Result<(String, u32), ParseError> {
    let (name, points_str) = split_assignment(input, "NAME=POINTS", "Strength=60")?;
    let points_str = points_str.trim();
    let points = points_str.parse().map_err(|_| ParseError::InvalidNumber {
        input: input.to_string(),
        value: points_str.to_string(),
    })?;
    Ok((name, points))
}

fn split_assignment<'a>(
    input: &'a str,
    expected: &'static str,
    example: &'static str,
) -> Result<(String, &'a str), ParseError> {
    let (name, rest) = input
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator {
            input: input.to_string(),
            expected,
            example,
        })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName(input.to_string()));
    }
    Ok((name.to_string(), rest))
}
