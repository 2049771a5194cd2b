//! # Workflows Module
//!
//! Top-level entry points that validate raw input and run the engine end to end.
//!
//! ## Overview
//!
//! Workflows are where input is checked. Once a workflow hands data to [`crate::engine`], the
//! engine assumes it is well formed and performs no recovery of its own.
//!
//! - **Optimization Workflow** ([`optimize`]) - Finds the cheapest build satisfying every requirement
//! - **Simulation Workflow** ([`simulate`]) - Runs the shrine on an explicit pre-shrine allocation

pub mod optimize;
pub mod simulate;

use crate::engine::error::EngineError;
use std::collections::HashSet;

fn validate_stat_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(EngineError::BlankStatName);
        }
        if !seen.insert(name) {
            return Err(EngineError::DuplicateStat {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
