use crate::cli::RulesArgs;
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use shrineplan::engine::config as core_config;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RULES_FILE_NAME: &str = "rules.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPointsConfig {
    max_total: Option<u32>,
    max_stat: Option<u32>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialShrineConfig {
    bottleneck_limit: Option<u32>,
    attunement_stats: Option<Vec<String>>,
}

/// Rules as read from a TOML file, with every field optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRulesConfig {
    points: Option<PartialPointsConfig>,
    shrine: Option<PartialShrineConfig>,
}

impl PartialRulesConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading rules from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the explicitly requested rules file, else the user's default one if present,
    /// else an empty set of rules.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                info!("Using default rules file {:?}", path);
                Self::from_file(&path)
            }
            _ => {
                debug!("No rules file given; using built-in rules.");
                Ok(Self::default())
            }
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "shrineplan").map(|dirs| dirs.config_dir().join(RULES_FILE_NAME))
    }

    pub fn merge_with_cli(mut self, args: &RulesArgs) -> Result<core_config::OptimizationConfig> {
        let points = self.points.take().unwrap_or_default();
        let shrine = self.shrine.take().unwrap_or_default();

        let mut builder = core_config::OptimizationConfigBuilder::new();
        if let Some(value) = args.max_total_points.or(points.max_total) {
            builder = builder.max_total_points(value);
        }
        if let Some(value) = args.max_stat_value.or(points.max_stat) {
            builder = builder.max_stat_value(value);
        }
        if let Some(value) = args.bottleneck_limit.or(shrine.bottleneck_limit) {
            builder = builder.bottleneck_limit(value);
        }
        if let Some(stats) = shrine.attunement_stats {
            builder = builder.attunement_stats(stats);
        }

        let mut overrides = Self::default();
        overrides.apply_set_values(&args.set_values)?;
        builder = overrides.apply_to(builder);

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_to(
        self,
        mut builder: core_config::OptimizationConfigBuilder,
    ) -> core_config::OptimizationConfigBuilder {
        let points = self.points.unwrap_or_default();
        let shrine = self.shrine.unwrap_or_default();
        if let Some(value) = points.max_total {
            builder = builder.max_total_points(value);
        }
        if let Some(value) = points.max_stat {
            builder = builder.max_stat_value(value);
        }
        if let Some(value) = shrine.bottleneck_limit {
            builder = builder.bottleneck_limit(value);
        }
        if let Some(stats) = shrine.attunement_stats {
            builder = builder.attunement_stats(stats);
        }
        builder
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let parse_int = || -> Result<u32> {
                value_str.trim().parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })
            };

            match key.trim() {
                "points.max-total" => {
                    self.points.get_or_insert_with(Default::default).max_total = Some(parse_int()?);
                }
                "points.max-stat" => {
                    self.points.get_or_insert_with(Default::default).max_stat = Some(parse_int()?);
                }
                "shrine.bottleneck-limit" => {
                    self.shrine
                        .get_or_insert_with(Default::default)
                        .bottleneck_limit = Some(parse_int()?);
                }
                "shrine.attunement-stats" => {
                    let stats = value_str
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                    self.shrine
                        .get_or_insert_with(Default::default)
                        .attunement_stats = Some(stats);
                }
                other => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        other
                    )));
                }
            }
        }
        Ok(())
    }
}
