use super::config::ConfigError;
use crate::core::models::requirement::RequirementError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EngineError {
    #[error("Invalid requirement for stat '{stat}': {source}")]
    InvalidRequirement {
        stat: String,
        #[source]
        source: RequirementError,
    },

    #[error("Stat names cannot be blank")]
    BlankStatName,

    #[error("Stat '{name}' is listed more than once")]
    DuplicateStat { name: String },

    #[error("Too many 'any' requirements: {count} given, at most {max} can be enumerated")]
    TooManyFlexibleRequirements { count: usize, max: usize },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
