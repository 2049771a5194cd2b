use super::stat::StatKind;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Integer stat values keyed by stat name, kept in insertion order.
///
/// Post-shrine values are signed: when capped stats absorb more than the uncapped ones can
/// give back, the uncapped stats are pushed below zero before any top-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatValues {
    entries: Vec<(String, i64)>,
}

impl StatValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any existing entry for the same stat in place.
    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn total(&self) -> i64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for StatValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<N: Into<String>> FromIterator<(N, i64)> for StatValues {
    fn from_iter<I: IntoIterator<Item = (N, i64)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreShrineEntry {
    pub name: String,
    pub current_pre: u32,
    pub kind: StatKind,
}

/// Points invested in each stat before the shrine, in the order stats were seeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreShrineAllocation {
    entries: Vec<PreShrineEntry>,
}

impl PreShrineAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stat(mut self, name: impl Into<String>, current_pre: u32, kind: StatKind) -> Self {
        self.insert(name, current_pre, kind);
        self
    }

    /// Seeds a stat, replacing any earlier seed for the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, current_pre: u32, kind: StatKind) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.current_pre = current_pre;
                entry.kind = kind;
            }
            None => self.entries.push(PreShrineEntry {
                name,
                current_pre,
                kind,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PreShrineEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreShrineEntry> {
        self.entries.iter()
    }

    /// Sum of every seed. Widened so that seeds near `u32::MAX` cannot wrap.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.current_pre)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of running the shrine on a pre-shrine allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShrineResult {
    pub total_invested: u64,
    pub post_shrine: StatValues,
    /// Spare points that could not be handed to any stat after flooring.
    pub leftover_points: u32,
    /// Stats held back by the bottleneck rule, in the order they were capped.
    pub bottlenecked: Vec<String>,
}
