use crate::core::models::stat::StatKind;
use thiserror::Error;

pub const MAX_TOTAL_POINTS: u32 = 330;
pub const MAX_STAT_VALUE: u32 = 100;
pub const BOTTLENECK_LIMIT: u32 = 25;

/// Stats that ignore the bottleneck rule. Matched case-insensitively.
pub const ATTUNEMENT_STATS: [&str; 7] = [
    "flamecharm",
    "frostdraw",
    "thundercall",
    "galebreathe",
    "shadowcast",
    "ironsing",
    "bloodrend",
];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// The rules a build is optimized under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationConfig {
    pub max_total_points: u32,
    pub max_stat_value: u32,
    pub bottleneck_limit: u32,
    pub attunement_stats: Vec<String>,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            max_total_points: MAX_TOTAL_POINTS,
            max_stat_value: MAX_STAT_VALUE,
            bottleneck_limit: BOTTLENECK_LIMIT,
            attunement_stats: ATTUNEMENT_STATS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl OptimizationConfig {
    pub fn is_attunement(&self, stat: &str) -> bool {
        let stat = stat.trim();
        self.attunement_stats
            .iter()
            .any(|name| name.eq_ignore_ascii_case(stat))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_total_points == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_total_points",
                reason: "the point budget must be positive".to_string(),
            });
        }
        if self.max_stat_value == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_stat_value",
                reason: "the stat cap must be positive".to_string(),
            });
        }
        if self.attunement_stats.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::InvalidParameter {
                name: "attunement_stats",
                reason: "attunement names cannot be blank".to_string(),
            });
        }
        Ok(())
    }

    pub fn stat_kind(&self, stat: &str) -> StatKind {
        if self.is_attunement(stat) {
            StatKind::Attunement
        } else {
            StatKind::Ordinary
        }
    }
}

#[derive(Default)]
pub struct OptimizationConfigBuilder {
    max_total_points: Option<u32>,
    max_stat_value: Option<u32>,
    bottleneck_limit: Option<u32>,
    attunement_stats: Option<Vec<String>>,
}

impl OptimizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_total_points(mut self, points: u32) -> Self {
        self.max_total_points = Some(points);
        self
    }
    pub fn max_stat_value(mut self, value: u32) -> Self {
        self.max_stat_value = Some(value);
        self
    }
    pub fn bottleneck_limit(mut self, limit: u32) -> Self {
        self.bottleneck_limit = Some(limit);
        self
    }
    pub fn attunement_stats<I, S>(mut self, stats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attunement_stats = Some(stats.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<OptimizationConfig, ConfigError> {
        let defaults = OptimizationConfig::default();
        let config = OptimizationConfig {
            max_total_points: self.max_total_points.unwrap_or(defaults.max_total_points),
            max_stat_value: self.max_stat_value.unwrap_or(defaults.max_stat_value),
            bottleneck_limit: self.bottleneck_limit.unwrap_or(defaults.bottleneck_limit),
            attunement_stats: self
                .attunement_stats
                .unwrap_or(defaults.attunement_stats)
                .into_iter()
                .map(|s| s.trim().to_string())
                .collect(),
        };
        config.validate()?;
        Ok(config)
    }
}
