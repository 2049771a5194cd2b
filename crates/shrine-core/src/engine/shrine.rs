//! Simulation of the shrine averaging transform.
//!
//! The shrine pools every point invested in stats that received at least one point, hands the
//! pool back evenly, and then protects ordinary stats from losing more than the bottleneck
//! limit. Protected stats are clamped and the points they keep are taken back from the ordinary
//! stats that are still unprotected, which can push another stat over the limit, so the capping
//! repeats until it settles. Attunement stats take part in the average but never in capping or
//! redistribution.
//!
//! Values stay fractional until the transform settles. They are then floored and the points lost
//! to flooring are handed out one at a time in allocation order.

use crate::core::models::allocation::{PreShrineAllocation, ShrineResult, StatValues};
use crate::engine::config::OptimizationConfig;
use tracing::{debug, instrument, trace};

struct AffectedStat<'a> {
    name: &'a str,
    invested: f64,
    ordinary: bool,
}

struct Settled {
    values: Vec<f64>,
    capped: Vec<bool>,
    capped_order: Vec<usize>,
}

/// Runs the shrine on `allocation`.
///
/// Stats with zero pre-shrine investment are not affected and do not appear in the result.
/// Only `bottleneck_limit` and `max_stat_value` are read from `config`; whether a stat is an
/// attunement comes from the kind recorded in the allocation.
#[instrument(skip_all, name = "shrine_simulation", fields(stats = allocation.len()))]
pub fn simulate(allocation: &PreShrineAllocation, config: &OptimizationConfig) -> ShrineResult {
    let affected: Vec<AffectedStat> = allocation
        .iter()
        .filter(|entry| entry.current_pre > 0)
        .map(|entry| AffectedStat {
            name: &entry.name,
            invested: f64::from(entry.current_pre),
            ordinary: !entry.kind.is_attunement(),
        })
        .collect();

    if affected.is_empty() {
        return ShrineResult::default();
    }

    let total_invested = allocation.total();
    let average = total_invested as f64 / affected.len() as f64;
    let limit = f64::from(config.bottleneck_limit);
    trace!(total_invested, average, "Averaging pre-shrine investment.");

    let settled = settle_bottlenecks(&affected, average, limit);

    let mut floored: Vec<i64> = settled.values.iter().map(|v| v.floor() as i64).collect();
    let spare = i64::try_from(total_invested).unwrap_or(i64::MAX) - floored.iter().sum::<i64>();
    if spare < 0 {
        debug!(
            surplus = -spare,
            "Capping without redistribution left the shrine holding more points than were invested."
        );
    }
    let remaining = distribute_spare_points(
        &mut floored,
        &settled.capped,
        spare,
        i64::from(config.max_stat_value),
    );

    let post_shrine: StatValues = affected
        .iter()
        .zip(&floored)
        .map(|(stat, &value)| (stat.name, value))
        .collect();
    let bottlenecked = settled
        .capped_order
        .iter()
        .map(|&i| affected[i].name.to_string())
        .collect();

    ShrineResult {
        total_invested,
        post_shrine,
        leftover_points: remaining.clamp(0, i64::from(u32::MAX)) as u32,
        bottlenecked,
    }
}

/// Caps ordinary stats that dropped more than `limit` below their investment and takes the
/// points they keep back from the remaining uncapped ordinary stats, until no uncapped stat is
/// over the limit.
///
/// Every pass reads one snapshot of the values and produces the next one. A stat, once capped,
/// stays capped. Each repeated pass caps at least one more stat, so the loop runs at most once
/// per ordinary stat plus one.
fn settle_bottlenecks(affected: &[AffectedStat], average: f64, limit: f64) -> Settled {
    let mut values = vec![average; affected.len()];
    let mut capped = vec![false; affected.len()];
    let mut capped_order = Vec::new();
    let mut uncapped_ordinary = affected.iter().filter(|s| s.ordinary).count();

    loop {
        let snapshot = values;
        let mut next = snapshot.clone();
        let mut clamped_delta = 0.0;

        for (i, stat) in affected.iter().enumerate() {
            if !stat.ordinary || capped[i] {
                continue;
            }
            if stat.invested - snapshot[i] > limit {
                next[i] = stat.invested - limit;
                clamped_delta += next[i] - snapshot[i];
                capped[i] = true;
                capped_order.push(i);
                uncapped_ordinary -= 1;
                trace!(stat = stat.name, value = next[i], "Stat bottlenecked.");
            }
        }

        let mut overflowed = false;
        if uncapped_ordinary > 0 && clamped_delta != 0.0 {
            let share = clamped_delta / uncapped_ordinary as f64;
            for (i, stat) in affected.iter().enumerate() {
                if !stat.ordinary || capped[i] {
                    continue;
                }
                next[i] -= share;
                if stat.invested - next[i] > limit {
                    overflowed = true;
                }
            }
        }

        values = next;
        if !overflowed {
            break;
        }
    }

    Settled {
        values,
        capped,
        capped_order,
    }
}

/// Hands out `spare` points one at a time, scanning stats in order and skipping capped stats
/// and stats already at `max_value`. Stops when nothing is left or a full scan places nothing,
/// and returns what could not be placed.
fn distribute_spare_points(values: &mut [i64], capped: &[bool], mut spare: i64, max_value: i64) -> i64 {
    while spare > 0 {
        let mut changed = false;
        for (value, &is_capped) in values.iter_mut().zip(capped) {
            if spare <= 0 {
                break;
            }
            if is_capped || *value >= max_value {
                continue;
            }
            *value += 1;
            spare -= 1;
            changed = true;
        }
        if !changed {
            break;
        }
    }
    spare
}
