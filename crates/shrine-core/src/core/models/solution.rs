use super::allocation::{PreShrineAllocation, StatValues};
use serde::Serialize;

/// A feasible build: what to invest before the shrine, what the shrine leaves behind, and
/// what has to be topped up afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub pre_shrine: PreShrineAllocation,
    pub post_shrine: StatValues,
    pub final_stats: StatValues,
    pub total_pre_investment: u32,
    pub total_post_investment: u32,
    /// Budget left unspent. This is the score the optimizer maximizes.
    pub leftover_points: u32,
    /// Points the shrine could not place after flooring. Reported only; never part of the score.
    pub shrine_leftover: u32,
}

impl Solution {
    pub fn total_points_used(&self) -> u32 {
        self.total_pre_investment + self.total_post_investment
    }

    pub fn score(&self) -> u32 {
        self.leftover_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::stat::StatKind;

    #[test]
    fn totals_are_derived_from_fields() {
        let solution = Solution {
            pre_shrine: PreShrineAllocation::new().with_stat("Strength", 1, StatKind::Ordinary),
            post_shrine: vec![("Strength", 1)].into_iter().collect(),
            final_stats: vec![("Strength", 50)].into_iter().collect(),
            total_pre_investment: 1,
            total_post_investment: 49,
            leftover_points: 280,
            shrine_leftover: 0,
        };

        assert_eq!(solution.total_points_used(), 50);
        assert_eq!(solution.score(), 280);
    }
}
