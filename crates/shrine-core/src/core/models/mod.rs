//! # Core Models Module
//!
//! The data structures that describe a build: what it needs, how one search candidate
//! resolves those needs, and where the points finally go.
//!
//! ## Key Components
//!
//! - [`requirement`] - Desired stat values, their timing conditions and the validated input map
//! - [`stat`] - Stat kinds, per-stat configurations and power tiers
//! - [`allocation`] - Pre-shrine allocations, ordered stat values and shrine results
//! - [`solution`] - The finished allocation returned by the optimizer
//!
//! ## Usage
//!
//! ```ignore
//! use shrineplan::core::models::requirement::{DesiredStats, Requirement};
//!
//! let desired = DesiredStats::new()
//!     .with_stat("Strength", vec![Requirement::pre(40)])
//!     .with_stat("Flamecharm", vec![Requirement::any(30), Requirement::post(60)]);
//! ```

pub mod allocation;
pub mod requirement;
pub mod solution;
pub mod stat;
