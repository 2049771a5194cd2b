use crate::core::models::allocation::{PreShrineAllocation, StatValues};
use crate::core::models::solution::Solution;
use crate::core::models::stat::Configuration;
use crate::engine::config::OptimizationConfig;
use crate::engine::shrine;
use thiserror::Error;

/// Why a configuration cannot be built within the rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Infeasibility {
    #[error("pre-shrine seeding needs {required} points, budget is {budget}")]
    PreShrineOverBudget { required: u64, budget: u32 },

    #[error("stat '{stat}' would end at {value}, above the cap of {max}")]
    StatAboveCap { stat: String, value: i64, max: u32 },

    #[error("stat '{stat}' has {invested} pre-shrine points, needs {required}")]
    PreShrineRequirementUnmet {
        stat: String,
        invested: u32,
        required: u32,
    },

    #[error("build needs {required} points in total, budget is {budget}")]
    TotalOverBudget { required: u64, budget: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Feasible(Solution),
    Infeasible(Infeasibility),
}

/// Seeds the pre-shrine allocation for a configuration.
///
/// Stats with a pre-shrine minimum start at that minimum. Stats that only need a post-shrine
/// value get a single point so the shrine includes them; without it they would come out of
/// the shrine at zero.
pub fn seed_allocation(configuration: &Configuration) -> PreShrineAllocation {
    let mut allocation = PreShrineAllocation::new();
    for stat in configuration.iter() {
        if stat.min_pre > 0 {
            allocation.insert(stat.name.as_str(), stat.min_pre, stat.kind);
        } else if stat.min_post > 0 {
            allocation.insert(stat.name.as_str(), 1, stat.kind);
        }
    }
    allocation
}

pub fn evaluate(configuration: &Configuration, config: &OptimizationConfig) -> Evaluation {
    let pre_shrine = seed_allocation(configuration);
    let budget = u64::from(config.max_total_points);
    let total_pre = pre_shrine.total();
    if total_pre > budget {
        return Evaluation::Infeasible(Infeasibility::PreShrineOverBudget {
            required: total_pre,
            budget: config.max_total_points,
        });
    }

    let shrine_result = shrine::simulate(&pre_shrine, config);

    let mut final_stats = StatValues::new();
    let mut total_post: u64 = 0;
    for stat in configuration.iter() {
        let post_value = shrine_result.post_shrine.get(&stat.name).unwrap_or(0);
        let needed_post = (i64::from(stat.min_post) - post_value).max(0);
        let final_value = post_value + needed_post;
        final_stats.insert(stat.name.as_str(), final_value);
        total_post = total_post.saturating_add(needed_post.unsigned_abs());

        if final_value > i64::from(config.max_stat_value) {
            return Evaluation::Infeasible(Infeasibility::StatAboveCap {
                stat: stat.name.clone(),
                value: final_value,
                max: config.max_stat_value,
            });
        }

        let invested = pre_shrine.get(&stat.name).map_or(0, |e| e.current_pre);
        if invested < stat.min_pre {
            return Evaluation::Infeasible(Infeasibility::PreShrineRequirementUnmet {
                stat: stat.name.clone(),
                invested,
                required: stat.min_pre,
            });
        }
    }

    let total_points = total_pre.saturating_add(total_post);
    if total_points > budget {
        return Evaluation::Infeasible(Infeasibility::TotalOverBudget {
            required: total_points,
            budget: config.max_total_points,
        });
    }

    // Every total below is bounded by the u32 budget from here on.
    Evaluation::Feasible(Solution {
        pre_shrine,
        post_shrine: shrine_result.post_shrine,
        final_stats,
        total_pre_investment: total_pre as u32,
        total_post_investment: total_post as u32,
        leftover_points: (budget - total_points) as u32,
        shrine_leftover: shrine_result.leftover_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::stat::{StatConfig, StatKind};
    use crate::engine::config::OptimizationConfigBuilder;

    fn configuration(stats: &[(&str, StatKind, u32, u32)]) -> Configuration {
        Configuration::new(
            stats
                .iter()
                .map(|&(name, kind, min_pre, min_post)| StatConfig {
                    name: name.to_string(),
                    kind,
                    min_pre,
                    min_post,
                    any_requirements: Vec::new(),
                })
                .collect(),
        )
    }

    fn feasible(evaluation: Evaluation) -> Solution {
        match evaluation {
            Evaluation::Feasible(solution) => solution,
            Evaluation::Infeasible(reason) => panic!("expected a feasible candidate, got: {reason}"),
        }
    }

    #[test]
    fn seeding_uses_pre_minimum_or_single_point_for_post_only() {
        let config = configuration(&[
            ("Strength", StatKind::Ordinary, 40, 60),
            ("Agility", StatKind::Ordinary, 0, 20),
            ("Flamecharm", StatKind::Attunement, 0, 0),
        ]);
        let allocation = seed_allocation(&config);

        assert_eq!(allocation.len(), 2);
        assert_eq!(allocation.get("Strength").unwrap().current_pre, 40);
        assert_eq!(allocation.get("Agility").unwrap().current_pre, 1);
        assert!(allocation.get("Flamecharm").is_none());
    }

    #[test]
    fn single_post_requirement_is_topped_up_after_shrine() {
        let solution = feasible(evaluate(
            &configuration(&[("Strength", StatKind::Ordinary, 0, 50)]),
            &OptimizationConfig::default(),
        ));

        assert_eq!(solution.pre_shrine.get("Strength").unwrap().current_pre, 1);
        assert_eq!(solution.post_shrine.get("Strength"), Some(1));
        assert_eq!(solution.final_stats.get("Strength"), Some(50));
        assert_eq!(solution.total_pre_investment, 1);
        assert_eq!(solution.total_post_investment, 49);
        assert_eq!(solution.leftover_points, 280);
    }

    #[test]
    fn single_pre_requirement_needs_no_top_up() {
        let solution = feasible(evaluate(
            &configuration(&[("Strength", StatKind::Ordinary, 40, 0)]),
            &OptimizationConfig::default(),
        ));

        assert_eq!(solution.post_shrine.get("Strength"), Some(40));
        assert_eq!(solution.total_post_investment, 0);
        assert_eq!(solution.leftover_points, 290);
    }

    #[test]
    fn shrine_output_above_post_minimum_needs_no_top_up() {
        // Shrine leaves Strength at 35 and Agility at 26.
        let solution = feasible(evaluate(
            &configuration(&[
                ("Strength", StatKind::Ordinary, 60, 30),
                ("Agility", StatKind::Ordinary, 0, 30),
            ]),
            &OptimizationConfig::default(),
        ));

        assert_eq!(solution.final_stats.get("Strength"), Some(35));
        assert_eq!(solution.final_stats.get("Agility"), Some(30));
        assert_eq!(solution.total_pre_investment, 61);
        assert_eq!(solution.total_post_investment, 4);
        assert_eq!(solution.leftover_points, 330 - 65);
    }

    #[test]
    fn pre_seeding_over_budget_is_infeasible() {
        let config = OptimizationConfigBuilder::new()
            .max_total_points(50)
            .build()
            .unwrap();
        let evaluation = evaluate(
            &configuration(&[
                ("Strength", StatKind::Ordinary, 30, 0),
                ("Agility", StatKind::Ordinary, 30, 0),
            ]),
            &config,
        );

        assert_eq!(
            evaluation,
            Evaluation::Infeasible(Infeasibility::PreShrineOverBudget {
                required: 60,
                budget: 50
            })
        );
    }

    #[test]
    fn final_value_above_cap_is_infeasible() {
        let evaluation = evaluate(
            &configuration(&[("Strength", StatKind::Ordinary, 0, 120)]),
            &OptimizationConfig::default(),
        );

        assert!(matches!(
            evaluation,
            Evaluation::Infeasible(Infeasibility::StatAboveCap { value: 120, .. })
        ));
    }

    #[test]
    fn total_over_budget_is_infeasible() {
        let evaluation = evaluate(
            &configuration(&[
                ("Strength", StatKind::Ordinary, 0, 100),
                ("Agility", StatKind::Ordinary, 0, 100),
                ("Charisma", StatKind::Ordinary, 0, 100),
                ("Willpower", StatKind::Ordinary, 0, 100),
            ]),
            &OptimizationConfig::default(),
        );

        assert_eq!(
            evaluation,
            Evaluation::Infeasible(Infeasibility::TotalOverBudget {
                required: 400,
                budget: 330
            })
        );
    }

    #[test]
    fn solution_satisfies_every_minimum() {
        let config = OptimizationConfig::default();
        let configuration = configuration(&[
            ("Fortitude", StatKind::Ordinary, 90, 0),
            ("Strength", StatKind::Ordinary, 60, 40),
            ("Flamecharm", StatKind::Attunement, 0, 50),
        ]);
        let solution = feasible(evaluate(&configuration, &config));

        for stat in configuration.iter() {
            let invested = solution.pre_shrine.get(&stat.name).unwrap().current_pre;
            let final_value = solution.final_stats.get(&stat.name).unwrap();
            assert!(invested >= stat.min_pre);
            assert!(final_value >= i64::from(stat.min_post));
            assert!(final_value <= i64::from(config.max_stat_value));
        }
        assert!(solution.total_points_used() <= config.max_total_points);
    }

    #[test]
    fn seeds_summing_past_u32_are_over_budget() {
        let evaluation = evaluate(
            &configuration(&[
                ("Strength", StatKind::Ordinary, 3_000_000_000, 0),
                ("Agility", StatKind::Ordinary, 3_000_000_000, 0),
            ]),
            &OptimizationConfig::default(),
        );

        assert_eq!(
            evaluation,
            Evaluation::Infeasible(Infeasibility::PreShrineOverBudget {
                required: 6_000_000_000,
                budget: 330
            })
        );
    }
}
