use crate::core::models::stat::{Configuration, StatConfig};

/// Largest number of "any" requirements whose placements fit in one bit pattern.
pub const MAX_FLEXIBLE_REQUIREMENTS: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FlexibleSlot {
    stat_index: usize,
    value: u32,
}

/// Every way of assigning each "any" requirement to the pre- or post-shrine phase.
///
/// The space is described by a base configuration plus the list of open requirements; the
/// configurations themselves are only built when iterated.
#[derive(Debug, Clone)]
pub struct ConfigurationSpace {
    base: Configuration,
    slots: Vec<FlexibleSlot>,
}

impl ConfigurationSpace {
    /// Builds the space from per-stat configurations. Callers must keep the number of "any"
    /// requirements at or below [`MAX_FLEXIBLE_REQUIREMENTS`].
    pub fn new(stats: Vec<StatConfig>) -> Self {
        let slots = stats
            .iter()
            .enumerate()
            .flat_map(|(stat_index, stat)| {
                stat.any_requirements.iter().map(move |req| FlexibleSlot {
                    stat_index,
                    value: req.value,
                })
            })
            .collect::<Vec<_>>();
        debug_assert!(slots.len() <= MAX_FLEXIBLE_REQUIREMENTS);

        Self {
            base: Configuration::new(stats),
            slots,
        }
    }

    pub fn flexible_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of configurations, `2^k` for `k` open requirements.
    pub fn len(&self) -> u64 {
        1u64 << self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Resolves one placement. Bit `i` of `pattern` set puts the i-th open requirement before
    /// the shrine; clear puts it after.
    pub fn resolve(&self, pattern: u64) -> Configuration {
        let mut configuration = self.base.clone();
        for (bit, slot) in self.slots.iter().enumerate() {
            let Some(stat) = configuration.stat_mut(slot.stat_index) else {
                continue;
            };
            if (pattern >> bit) & 1 == 1 {
                stat.min_pre = stat.min_pre.max(slot.value);
            } else {
                stat.min_post = stat.min_post.max(slot.value);
            }
        }
        configuration
    }

    pub fn iter(&self) -> Configurations<'_> {
        Configurations {
            space: self,
            next: 0,
            end: self.len(),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigurationSpace {
    type Item = Configuration;
    type IntoIter = Configurations<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over a [`ConfigurationSpace`] in bit-pattern order.
#[derive(Debug, Clone)]
pub struct Configurations<'a> {
    space: &'a ConfigurationSpace,
    next: u64,
    end: u64,
}

impl Iterator for Configurations<'_> {
    type Item = Configuration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let configuration = self.space.resolve(self.next);
        self.next += 1;
        Some(configuration)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
