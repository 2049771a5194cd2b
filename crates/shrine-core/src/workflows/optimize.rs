use super::validate_stat_names;
use crate::core::models::requirement::{DesiredStats, RequirementError};
use crate::core::models::solution::Solution;
use crate::core::models::stat::StatConfig;
use crate::engine::combinations::{ConfigurationSpace, MAX_FLEXIBLE_REQUIREMENTS};
use crate::engine::config::OptimizationConfig;
use crate::engine::error::EngineError;
use crate::engine::evaluator::{self, Evaluation};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::SearchState;
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// The highest-scoring feasible build, or `None` when no placement fits the rules.
    pub solution: Option<Solution>,
    pub configurations_tested: u64,
    pub feasible_configurations: u64,
}

/// Searches every placement of the "any" requirements and returns the build that leaves the
/// most points unspent. Among equally good builds the first one in enumeration order wins.
///
/// Infeasibility is not an error: it is reported as a result without a solution. Errors are
/// only returned for malformed input or rules, before any search work starts.
#[instrument(skip_all, name = "optimization_workflow", fields(stats = desired.len()))]
pub fn run(
    desired: &DesiredStats,
    config: &OptimizationConfig,
    reporter: &ProgressReporter,
) -> Result<OptimizationResult, EngineError> {
    config.validate()?;
    validate_desired_stats(desired)?;

    let space = build_configuration_space(desired, config);
    let total_configurations = space.len();
    info!(
        configurations = total_configurations,
        flexible_requirements = space.flexible_count(),
        "Searching condition placements."
    );
    reporter.report(Progress::SearchStart {
        total_configurations,
    });

    let mut state = SearchState::new();
    for (pattern, configuration) in space.iter().enumerate() {
        match evaluator::evaluate(&configuration, config) {
            Evaluation::Feasible(solution) => {
                let leftover_points = solution.leftover_points;
                if state.offer(solution) {
                    debug!(pattern, leftover_points, "Found a better build.");
                    reporter.report(Progress::ImprovedSolution { leftover_points });
                }
            }
            Evaluation::Infeasible(reason) => {
                trace!(pattern, %reason, "Configuration rejected.");
                state.record_infeasible();
            }
        }
        reporter.report(Progress::ConfigurationEvaluated);
    }

    reporter.report(Progress::SearchFinish {
        feasible_configurations: state.feasible_configurations,
    });

    let configurations_tested = state.configurations_tested;
    let feasible_configurations = state.feasible_configurations;
    let solution = state.into_best();
    match &solution {
        Some(best) => info!(
            leftover_points = best.leftover_points,
            feasible_configurations, "Optimization complete."
        ),
        None => warn!(
            configurations_tested,
            "No configuration satisfies every requirement within the rules."
        ),
    }

    Ok(OptimizationResult {
        solution,
        configurations_tested,
        feasible_configurations,
    })
}

/// Convenience form of [`run`] without progress reporting.
pub fn optimize(
    desired: &DesiredStats,
    config: &OptimizationConfig,
) -> Result<Option<Solution>, EngineError> {
    run(desired, config, &ProgressReporter::new()).map(|result| result.solution)
}

fn validate_desired_stats(desired: &DesiredStats) -> Result<(), EngineError> {
    validate_stat_names(desired.iter().map(|s| s.name.as_str()))?;

    for stat in desired.iter() {
        if let Some(req) = stat.requirements.iter().find(|r| r.value == 0) {
            return Err(EngineError::InvalidRequirement {
                stat: stat.name.clone(),
                source: RequirementError::NonPositiveValue {
                    value: i64::from(req.value),
                },
            });
        }
    }

    let count = desired.flexible_count();
    if count > MAX_FLEXIBLE_REQUIREMENTS {
        return Err(EngineError::TooManyFlexibleRequirements {
            count,
            max: MAX_FLEXIBLE_REQUIREMENTS,
        });
    }
    Ok(())
}

fn build_configuration_space(
    desired: &DesiredStats,
    config: &OptimizationConfig,
) -> ConfigurationSpace {
    let stats = desired
        .iter()
        .filter(|stat| !stat.requirements.is_empty())
        .map(|stat| {
            let kind = config.stat_kind(&stat.name);
            debug!(stat = %stat.name, ?kind, requirements = stat.requirements.len(), "Collected requirements.");
            StatConfig::from_requirements(stat.name.as_str(), kind, &stat.requirements)
        })
        .collect();
    ConfigurationSpace::new(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::requirement::{Condition, Requirement};
    use crate::engine::config::{ConfigError, OptimizationConfigBuilder};
    use crate::engine::shrine;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn solve(desired: &DesiredStats) -> Option<Solution> {
        optimize(desired, &OptimizationConfig::default()).unwrap()
    }

    fn assert_invariants(desired: &DesiredStats, solution: &Solution, config: &OptimizationConfig) {
        assert!(solution.total_points_used() <= config.max_total_points);
        assert_eq!(
            solution.leftover_points,
            config.max_total_points - solution.total_points_used()
        );
        for (_, value) in solution.final_stats.iter() {
            assert!(value <= i64::from(config.max_stat_value));
        }
        for stat in desired.iter() {
            let min_pre = stat
                .requirements
                .iter()
                .filter(|r| r.condition == Condition::Pre)
                .map(|r| r.value)
                .max()
                .unwrap_or(0);
            let min_post = stat
                .requirements
                .iter()
                .filter(|r| r.condition == Condition::Post)
                .map(|r| r.value)
                .max()
                .unwrap_or(0);
            if min_pre > 0 {
                assert!(solution.pre_shrine.get(&stat.name).unwrap().current_pre >= min_pre);
            }
            if min_post > 0 {
                assert!(solution.final_stats.get(&stat.name).unwrap() >= i64::from(min_post));
            }
        }
        let replay = shrine::simulate(&solution.pre_shrine, config);
        for name in &replay.bottlenecked {
            assert!(!config.is_attunement(name), "attunement {name} was bottlenecked");
        }
    }

    #[test]
    fn single_post_requirement_leaves_280_points() {
        let desired = DesiredStats::new().with_stat("Strength", vec![Requirement::post(50)]);
        let solution = solve(&desired).unwrap();

        assert_eq!(solution.pre_shrine.get("Strength").unwrap().current_pre, 1);
        assert_eq!(solution.post_shrine.get("Strength"), Some(1));
        assert_eq!(solution.final_stats.get("Strength"), Some(50));
        assert_eq!(solution.total_pre_investment, 1);
        assert_eq!(solution.total_post_investment, 49);
        assert_eq!(solution.leftover_points, 280);
    }

    #[test]
    fn pre_requirement_alone_leaves_290_points_and_skips_empty_stats() {
        let desired = DesiredStats::new()
            .with_stat("Strength", vec![Requirement::pre(40)])
            .with_stat("Agility", vec![]);
        let solution = solve(&desired).unwrap();

        assert_eq!(solution.post_shrine.get("Strength"), Some(40));
        assert!(solution.final_stats.get("Agility").is_none());
        assert!(solution.pre_shrine.get("Agility").is_none());
        assert_eq!(solution.leftover_points, 290);
    }

    #[test]
    fn post_only_requirements_cost_exactly_their_sum() {
        let desired = DesiredStats::new()
            .with_stat("Strength", vec![Requirement::post(50)])
            .with_stat("Agility", vec![Requirement::post(30), Requirement::post(12)])
            .with_stat("Thundercall", vec![Requirement::post(20)]);
        let solution = solve(&desired).unwrap();

        assert_eq!(solution.total_pre_investment, 3);
        assert!(solution.pre_shrine.iter().all(|e| e.current_pre == 1));
        assert_eq!(solution.leftover_points, 330 - (50 + 30 + 20));
    }

    #[test]
    fn ties_are_resolved_in_favour_of_the_first_placement() {
        // Post placement: 1 + 39 points. Pre placement: 40 points. Both leave 290.
        let desired = DesiredStats::new().with_stat("Strength", vec![Requirement::any(40)]);
        let solution = solve(&desired).unwrap();

        assert_eq!(solution.leftover_points, 290);
        assert_eq!(solution.pre_shrine.get("Strength").unwrap().current_pre, 1);
    }

    #[test]
    fn picks_pre_placement_when_shrine_carries_points_into_post_needs() {
        // Investing Agility's 50 before the shrine averages 25 points into Strength, which
        // then needs only 24 more: 51 + 24 = 75 points instead of 100.
        let desired = DesiredStats::new()
            .with_stat("Strength", vec![Requirement::post(50)])
            .with_stat("Agility", vec![Requirement::any(50)]);
        let result = run(&desired, &OptimizationConfig::default(), &ProgressReporter::new()).unwrap();
        let solution = result.solution.unwrap();

        assert_eq!(result.configurations_tested, 2);
        assert_eq!(result.feasible_configurations, 2);
        assert_eq!(solution.pre_shrine.get("Agility").unwrap().current_pre, 50);
        assert_eq!(solution.post_shrine.get("Strength"), Some(26));
        assert_eq!(solution.final_stats.get("Strength"), Some(50));
        assert_eq!(solution.final_stats.get("Agility"), Some(25));
        assert_eq!(solution.leftover_points, 255);
        assert_invariants(&desired, &solution, &OptimizationConfig::default());
    }

    #[test]
    fn unreachable_requirements_return_no_solution() {
        let desired = DesiredStats::new().with_stat("Strength", vec![Requirement::pre(200)]);
        let result = run(&desired, &OptimizationConfig::default(), &ProgressReporter::new()).unwrap();

        assert!(result.solution.is_none());
        assert_eq!(result.configurations_tested, 1);
        assert_eq!(result.feasible_configurations, 0);
    }

    #[test]
    fn smaller_budget_can_make_a_build_infeasible() {
        let desired = DesiredStats::new()
            .with_stat("Strength", vec![Requirement::post(50)])
            .with_stat("Agility", vec![Requirement::post(20)]);
        let config = OptimizationConfigBuilder::new()
            .max_total_points(60)
            .build()
            .unwrap();

        assert!(optimize(&desired, &config).unwrap().is_none());

        let roomy = OptimizationConfigBuilder::new()
            .max_total_points(70)
            .build()
            .unwrap();
        assert_eq!(optimize(&desired, &roomy).unwrap().unwrap().leftover_points, 0);
    }

    #[test]
    fn returned_solutions_satisfy_invariants() {
        let config = OptimizationConfig::default();
        let cases = [
            DesiredStats::new()
                .with_stat("Fortitude", vec![Requirement::pre(90)])
                .with_stat("Strength", vec![Requirement::any(60), Requirement::post(40)])
                .with_stat("Agility", vec![Requirement::post(30)]),
            DesiredStats::new()
                .with_stat("Flamecharm", vec![Requirement::pre(80), Requirement::post(40)])
                .with_stat("Strength", vec![Requirement::any(35)])
                .with_stat("Willpower", vec![Requirement::any(20), Requirement::any(45)]),
            DesiredStats::new()
                .with_stat("Shadowcast", vec![Requirement::post(100)])
                .with_stat("Charisma", vec![Requirement::pre(75)])
                .with_stat("Intelligence", vec![Requirement::any(50)]),
        ];

        for desired in &cases {
            let solution = optimize(desired, &config)
                .unwrap()
                .expect("case should be feasible");
            assert_invariants(desired, &solution, &config);
        }
    }

    #[test]
    fn attunement_detection_ignores_case() {
        let desired = DesiredStats::new()
            .with_stat("FLAMECHARM", vec![Requirement::pre(60)])
            .with_stat("Strength", vec![Requirement::post(10)]);
        let solution = solve(&desired).unwrap();

        let entry = solution.pre_shrine.get("FLAMECHARM").unwrap();
        assert!(entry.kind.is_attunement());
        // Flamecharm is free to fall to the 30.5 average without being held at 35.
        assert_eq!(solution.post_shrine.get("FLAMECHARM"), Some(31));
    }

    #[test]
    fn zero_value_requirement_is_rejected() {
        let desired = DesiredStats::new().with_stat("Strength", vec![Requirement::post(0)]);
        let err = optimize(&desired, &OptimizationConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            EngineError::InvalidRequirement {
                source: RequirementError::NonPositiveValue { value: 0 },
                ..
            }
        ));
    }

    #[test]
    fn blank_and_duplicate_names_are_rejected() {
        let blank = DesiredStats::new().with_stat("  ", vec![Requirement::pre(1)]);
        assert_eq!(
            optimize(&blank, &OptimizationConfig::default()).unwrap_err(),
            EngineError::BlankStatName
        );

        let duplicate = DesiredStats::new()
            .with_stat("Strength", vec![Requirement::pre(1)])
            .with_stat("Strength", vec![Requirement::post(5)]);
        assert_eq!(
            optimize(&duplicate, &OptimizationConfig::default()).unwrap_err(),
            EngineError::DuplicateStat {
                name: "Strength".to_string()
            }
        );
    }

    #[test]
    fn too_many_flexible_requirements_are_rejected_before_search() {
        let desired = DesiredStats::new().with_stat(
            "Strength",
            vec![Requirement::any(1); MAX_FLEXIBLE_REQUIREMENTS + 1],
        );
        let err = optimize(&desired, &OptimizationConfig::default()).unwrap_err();

        assert_eq!(
            err,
            EngineError::TooManyFlexibleRequirements {
                count: MAX_FLEXIBLE_REQUIREMENTS + 1,
                max: MAX_FLEXIBLE_REQUIREMENTS
            }
        );
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let config = OptimizationConfig {
            max_total_points: 0,
            ..OptimizationConfig::default()
        };
        let desired = DesiredStats::new().with_stat("Strength", vec![Requirement::pre(1)]);

        assert!(matches!(
            optimize(&desired, &config),
            Err(EngineError::Config {
                source: ConfigError::InvalidParameter { .. }
            })
        ));
    }

    #[test]
    fn empty_input_yields_an_empty_solution() {
        let solution = solve(&DesiredStats::new()).unwrap();

        assert!(solution.pre_shrine.is_empty());
        assert!(solution.final_stats.is_empty());
        assert_eq!(solution.leftover_points, 330);
    }

    #[test]
    fn progress_reports_every_configuration() {
        let evaluated = AtomicU64::new(0);
        let total = AtomicU64::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::SearchStart {
                total_configurations,
            } => total.store(total_configurations, Ordering::SeqCst),
            Progress::ConfigurationEvaluated => {
                evaluated.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }));

        let desired = DesiredStats::new()
            .with_stat("Strength", vec![Requirement::any(20), Requirement::any(30)])
            .with_stat("Agility", vec![Requirement::any(10)]);
        run(&desired, &OptimizationConfig::default(), &reporter).unwrap();
        drop(reporter);

        assert_eq!(total.load(Ordering::SeqCst), 8);
        assert_eq!(evaluated.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn pre_requirements_summing_past_u32_are_infeasible() {
        let desired = DesiredStats::new()
            .with_stat("Flamecharm", vec![Requirement::pre(1 << 31)])
            .with_stat("Frostdraw", vec![Requirement::pre(1 << 31)]);

        assert!(solve(&desired).is_none());

        let ordinary = DesiredStats::new()
            .with_stat("Strength", vec![Requirement::pre(3_000_000_000)])
            .with_stat("Agility", vec![Requirement::pre(3_000_000_000)]);
        assert!(solve(&ordinary).is_none());
    }
}
