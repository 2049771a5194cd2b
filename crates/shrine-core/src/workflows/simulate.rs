use super::validate_stat_names;
use crate::core::models::allocation::{PreShrineAllocation, ShrineResult};
use crate::engine::config::OptimizationConfig;
use crate::engine::error::EngineError;
use crate::engine::shrine;
use tracing::{info, instrument};

/// Runs the shrine on a caller-supplied pre-shrine allocation.
///
/// The allocation's stat kinds are trusted as given; use [`classify`] to derive them from the
/// rules' attunement list first.
#[instrument(skip_all, name = "simulation_workflow", fields(stats = allocation.len()))]
pub fn run(
    allocation: &PreShrineAllocation,
    config: &OptimizationConfig,
) -> Result<ShrineResult, EngineError> {
    config.validate()?;
    validate_stat_names(allocation.iter().map(|entry| entry.name.as_str()))?;

    let result = shrine::simulate(allocation, config);
    info!(
        total_invested = result.total_invested,
        bottlenecked = result.bottlenecked.len(),
        leftover_points = result.leftover_points,
        "Shrine simulation complete."
    );
    Ok(result)
}

/// Builds an allocation from `(name, points)` pairs, classifying each stat with `config`.
pub fn classify<'a>(
    points: impl IntoIterator<Item = (&'a str, u32)>,
    config: &OptimizationConfig,
) -> PreShrineAllocation {
    let mut allocation = PreShrineAllocation::new();
    for (name, current_pre) in points {
        allocation.insert(name, current_pre, config.stat_kind(name));
    }
    allocation
}
