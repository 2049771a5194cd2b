use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use serde::Serialize;
use shrineplan::core::models::allocation::{PreShrineAllocation, ShrineResult, StatValues};
use shrineplan::core::models::solution::Solution;
use shrineplan::core::models::stat::power_for;
use shrineplan::engine::config::OptimizationConfig;
use shrineplan::workflows::optimize::OptimizationResult;
use std::fmt::{self, Write};

const NAME_WIDTH: usize = 16;

#[derive(Serialize)]
struct FinalStat<'a> {
    name: &'a str,
    value: i64,
    power: u32,
}

#[derive(Serialize)]
struct SolutionReport<'a> {
    #[serde(flatten)]
    solution: &'a Solution,
    total_points_used: u32,
    powers: Vec<FinalStat<'a>>,
}

#[derive(Serialize)]
struct OptimizationReport<'a> {
    max_total_points: u32,
    configurations_tested: u64,
    feasible_configurations: u64,
    solution: Option<SolutionReport<'a>>,
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    pre_shrine: &'a PreShrineAllocation,
    #[serde(flatten)]
    result: &'a ShrineResult,
}

fn powers(values: &StatValues) -> Vec<FinalStat<'_>> {
    values
        .iter()
        .map(|(name, value)| FinalStat {
            name,
            value,
            power: power_for(value),
        })
        .collect()
}

pub fn optimization(
    result: &OptimizationResult,
    config: &OptimizationConfig,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(&OptimizationReport {
            max_total_points: config.max_total_points,
            configurations_tested: result.configurations_tested,
            feasible_configurations: result.feasible_configurations,
            solution: result.solution.as_ref().map(|solution| SolutionReport {
                solution,
                total_points_used: solution.total_points_used(),
                powers: powers(&solution.final_stats),
            }),
        }),
        OutputFormat::Text => {
            let mut out = String::new();
            write_optimization(&mut out, result, config).map_err(|e| CliError::Other(e.into()))?;
            Ok(out)
        }
    }
}

pub fn simulation(
    allocation: &PreShrineAllocation,
    result: &ShrineResult,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(&SimulationReport {
            pre_shrine: allocation,
            result,
        }),
        OutputFormat::Text => {
            let mut out = String::new();
            write_simulation(&mut out, allocation, result).map_err(|e| CliError::Other(e.into()))?;
            Ok(out)
        }
    }
}

fn to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| CliError::Other(e.into()))
}

fn write_optimization(
    out: &mut impl Write,
    result: &OptimizationResult,
    config: &OptimizationConfig,
) -> fmt::Result {
    writeln!(out, "Search")?;
    writeln!(
        out,
        "  Configurations tested: {} ({} feasible)",
        result.configurations_tested, result.feasible_configurations
    )?;

    let Some(solution) = &result.solution else {
        writeln!(out)?;
        writeln!(out, "No build satisfies every requirement within the rules.")?;
        return Ok(());
    };

    writeln!(
        out,
        "  Points used: {} / {}",
        solution.total_points_used(),
        config.max_total_points
    )?;
    writeln!(out, "  Leftover points: {}", solution.leftover_points)?;
    if solution.shrine_leftover > 0 {
        writeln!(out, "  Points the shrine could not place: {}", solution.shrine_leftover)?;
    }

    writeln!(out)?;
    writeln!(out, "Pre-shrine build ({} points)", solution.total_pre_investment)?;
    for entry in solution.pre_shrine.iter() {
        writeln!(out, "  {:<NAME_WIDTH$}{:>4}", entry.name, entry.current_pre)?;
    }

    writeln!(out)?;
    writeln!(out, "After shrine")?;
    for (name, value) in solution.post_shrine.iter() {
        writeln!(out, "  {:<NAME_WIDTH$}{:>4}", name, value)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Final stats ({} points after shrine)",
        solution.total_post_investment
    )?;
    for stat in powers(&solution.final_stats) {
        writeln!(
            out,
            "  {:<NAME_WIDTH$}{:>4}  power {}",
            stat.name, stat.value, stat.power
        )?;
    }
    Ok(())
}

fn write_simulation(
    out: &mut impl Write,
    allocation: &PreShrineAllocation,
    result: &ShrineResult,
) -> fmt::Result {
    writeln!(out, "Shrine ({} points invested)", result.total_invested)?;
    for entry in allocation.iter() {
        let after = result.post_shrine.get(&entry.name);
        let marker = if result.bottlenecked.contains(&entry.name) {
            "  bottlenecked"
        } else {
            ""
        };
        match after {
            Some(value) => writeln!(
                out,
                "  {:<NAME_WIDTH$}{:>4} -> {:>4}{}",
                entry.name, entry.current_pre, value, marker
            )?,
            None => writeln!(out, "  {:<NAME_WIDTH$}{:>4}    (unaffected)", entry.name, entry.current_pre)?,
        }
    }
    if result.leftover_points > 0 {
        writeln!(out, "  Points the shrine could not place: {}", result.leftover_points)?;
    }
    Ok(())
}
