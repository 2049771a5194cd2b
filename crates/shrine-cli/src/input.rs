use crate::error::{CliError, Result};
use crate::utils::parser::{self, RequirementArg};
use serde::Deserialize;
use shrineplan::core::models::requirement::{Condition, DesiredStats, Requirement};
use shrineplan::engine::error::EngineError;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RequirementEntry {
    value: i64,
    condition: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct StatEntry {
    name: String,
    #[serde(default)]
    requirements: Vec<RequirementEntry>,
}

/// A requirements file: one `[[stat]]` table per stat.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RequirementsFile {
    #[serde(default, rename = "stat")]
    stats: Vec<StatEntry>,
}

impl RequirementsFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading requirements from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

/// Combines the requirements file with `-r` arguments into the optimizer input.
///
/// Command-line requirements for a stat already named in the file are appended to it; new
/// names are added after the file's stats. Zero values are skipped.
pub fn collect_requirements(file: RequirementsFile, args: &[String]) -> Result<DesiredStats> {
    let mut stats: Vec<(String, Vec<Requirement>)> = Vec::new();

    for entry in file.stats {
        let mut requirements = Vec::with_capacity(entry.requirements.len());
        for raw in entry.requirements {
            if let Some(req) = to_requirement(&entry.name, raw.value, raw.condition.as_deref())? {
                requirements.push(req);
            }
        }
        stats.push((entry.name, requirements));
    }

    for arg in args {
        let RequirementArg {
            name,
            value,
            condition,
        } = parser::parse_requirement(arg).map_err(|e| CliError::Argument(e.to_string()))?;
        let Some(req) = to_requirement(&name, value, condition.as_deref())? else {
            continue;
        };
        match stats.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, requirements)) => requirements.push(req),
            None => stats.push((name, vec![req])),
        }
    }

    Ok(stats.into_iter().collect())
}

fn to_requirement(stat: &str, value: i64, condition: Option<&str>) -> Result<Option<Requirement>> {
    if value == 0 {
        debug!(stat, "Skipping zero-valued requirement.");
        return Ok(None);
    }
    let condition = condition.unwrap_or(Condition::Any.as_str());
    Requirement::try_new(value, condition)
        .map(Some)
        .map_err(|source| {
            CliError::Engine(EngineError::InvalidRequirement {
                stat: stat.to_string(),
                source,
            })
        })
}
