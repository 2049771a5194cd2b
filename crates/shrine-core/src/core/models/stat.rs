use super::requirement::{Condition, Requirement};
use serde::{Deserialize, Serialize};

const POWER_BASE_POINTS: i64 = 15;
const POINTS_PER_POWER: i64 = 15;
const MAX_POWER: i64 = 20;

/// Whether a stat is protected by the shrine's bottleneck rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    /// Can lose at most the bottleneck limit relative to its pre-shrine investment.
    Ordinary,
    /// Exempt from capping and redistribution; keeps whatever the plain average gives it.
    Attunement,
}

impl StatKind {
    pub fn is_attunement(&self) -> bool {
        matches!(self, StatKind::Attunement)
    }
}

/// One stat's requirements, with every "pre" and "post" requirement already folded into a
/// single minimum per phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatConfig {
    pub name: String,
    pub kind: StatKind,
    pub min_pre: u32,
    pub min_post: u32,
    /// Requirements whose phase is still open, in input order.
    pub any_requirements: Vec<Requirement>,
}

impl StatConfig {
    pub fn from_requirements(
        name: impl Into<String>,
        kind: StatKind,
        requirements: &[Requirement],
    ) -> Self {
        let mut config = Self {
            name: name.into(),
            kind,
            min_pre: 0,
            min_post: 0,
            any_requirements: Vec::new(),
        };
        for req in requirements {
            match req.condition {
                Condition::Pre => config.min_pre = config.min_pre.max(req.value),
                Condition::Post => config.min_post = config.min_post.max(req.value),
                Condition::Any => config.any_requirements.push(*req),
            }
        }
        config
    }

    pub fn is_attunement(&self) -> bool {
        self.kind.is_attunement()
    }
}

/// A complete candidate: every stat with each "any" requirement assigned to a phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    stats: Vec<StatConfig>,
}

impl Configuration {
    pub fn new(stats: Vec<StatConfig>) -> Self {
        Self { stats }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatConfig> {
        self.stats.iter()
    }

    pub fn get(&self, name: &str) -> Option<&StatConfig> {
        self.stats.iter().find(|s| s.name == name)
    }

    pub(crate) fn stat_mut(&mut self, index: usize) -> Option<&mut StatConfig> {
        self.stats.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Power tier unlocked by a stat value: one tier per 15 points above the first 15, capped at 20.
pub fn power_for(points: i64) -> u32 {
    let power = (points - POWER_BASE_POINTS).div_euclid(POINTS_PER_POWER);
    power.clamp(0, MAX_POWER) as u32
}
