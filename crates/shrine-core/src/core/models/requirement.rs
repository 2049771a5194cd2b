use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// When a required value has to hold relative to the shrine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Must be reached with pre-shrine investment alone.
    Pre,
    /// Must be reached after the shrine, topping up with post-shrine points if needed.
    Post,
    /// Either phase is acceptable; the optimizer picks whichever is cheaper.
    Any,
}

static CONDITION_TAGS: Map<&'static str, Condition> = phf_map! {
    "pre" => Condition::Pre,
    "pre-shrine" => Condition::Pre,
    "post" => Condition::Post,
    "post-shrine" => Condition::Post,
    "any" => Condition::Any,
};

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Pre => "pre",
            Condition::Post => "post",
            Condition::Any => "any",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        CONDITION_TAGS
            .get(tag.as_str())
            .copied()
            .ok_or_else(|| RequirementError::UnknownCondition(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RequirementError {
    #[error("Requirement value must be positive, got {value}")]
    NonPositiveValue { value: i64 },

    #[error("Requirement value {value} is too large")]
    ValueOutOfRange { value: i64 },

    #[error("Unknown condition '{0}'. Expected 'pre', 'post' or 'any'.")]
    UnknownCondition(String),
}

/// A minimum value a stat has to reach, tagged with when it has to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub value: u32,
    pub condition: Condition,
}

impl Requirement {
    pub fn new(value: u32, condition: Condition) -> Self {
        Self { value, condition }
    }

    pub fn pre(value: u32) -> Self {
        Self::new(value, Condition::Pre)
    }

    pub fn post(value: u32) -> Self {
        Self::new(value, Condition::Post)
    }

    pub fn any(value: u32) -> Self {
        Self::new(value, Condition::Any)
    }

    /// Builds a requirement from unvalidated input, rejecting non-positive values and
    /// unrecognized condition tags.
    pub fn try_new(value: i64, condition: &str) -> Result<Self, RequirementError> {
        if value <= 0 {
            return Err(RequirementError::NonPositiveValue { value });
        }
        let value = u32::try_from(value).map_err(|_| RequirementError::ValueOutOfRange { value })?;
        let condition = condition.parse()?;
        Ok(Self { value, condition })
    }
}

/// Every requirement declared for one stat, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRequirements {
    pub name: String,
    pub requirements: Vec<Requirement>,
}

/// The optimizer's input: stat names mapped to their requirements.
///
/// Insertion order is preserved. It decides the order in which "any" requirements are
/// enumerated, the scan order of the shrine's spare-point handout, and therefore which of
/// several equally good solutions is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesiredStats {
    stats: Vec<StatRequirements>,
}

impl DesiredStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stat(mut self, name: impl Into<String>, requirements: Vec<Requirement>) -> Self {
        self.push(name, requirements);
        self
    }

    /// Appends requirements for a stat. Repeated names are kept as separate entries and
    /// reported by validation instead of being merged silently.
    pub fn push(&mut self, name: impl Into<String>, requirements: Vec<Requirement>) {
        self.stats.push(StatRequirements {
            name: name.into(),
            requirements,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatRequirements> {
        self.stats.iter()
    }

    pub fn get(&self, name: &str) -> Option<&[Requirement]> {
        self.stats
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.requirements.as_slice())
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Number of requirements whose phase is left to the optimizer.
    pub fn flexible_count(&self) -> usize {
        self.stats
            .iter()
            .flat_map(|s| s.requirements.iter())
            .filter(|r| r.condition == Condition::Any)
            .count()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<Requirement>)> for DesiredStats {
    fn from_iter<I: IntoIterator<Item = (N, Vec<Requirement>)>>(iter: I) -> Self {
        let mut desired = Self::new();
        for (name, requirements) in iter {
            desired.push(name, requirements);
        }
        desired
    }
}
