use crate::core::models::solution::Solution;

/// Running state of one optimizer search.
#[derive(Debug, Default)]
pub(crate) struct SearchState {
    best: Option<Solution>,
    pub configurations_tested: u64,
    pub feasible_configurations: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_infeasible(&mut self) {
        self.configurations_tested += 1;
    }

    /// Records a feasible candidate and keeps it only if it scores strictly higher than the
    /// current best, so the earliest candidate wins ties. Returns whether it was kept.
    pub fn offer(&mut self, candidate: Solution) -> bool {
        self.configurations_tested += 1;
        self.feasible_configurations += 1;

        let improves = self
            .best
            .as_ref()
            .is_none_or(|best| candidate.score() > best.score());
        if improves {
            self.best = Some(candidate);
        }
        improves
    }

    pub fn into_best(self) -> Option<Solution> {
        self.best
    }
}
