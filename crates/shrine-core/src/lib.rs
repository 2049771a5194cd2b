//! # Shrineplan Core Library
//!
//! An optimizer for character builds that are split into two investment phases around the
//! shrine averaging transform. Given the stat values a build must reach, and whether each
//! value has to hold before the shrine, after it, or at either point, the library finds the
//! cheapest point allocation that satisfies every requirement.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models: requirements and their timing
//!   conditions, per-stat configurations, pre-shrine allocations and finished solutions.
//!
//! - **[`engine`]: The Logic Core.** The shrine averaging simulator, the enumeration of
//!   condition placements, the candidate evaluator, the rule set (`OptimizationConfig`)
//!   and the error and progress plumbing shared by every search.
//!
//! - **[`workflows`]: The Public API.** Validates raw input and drives the engine end to end.
//!   Most callers only need [`workflows::optimize::run`] or [`workflows::simulate::run`].

pub mod core;
pub mod engine;
pub mod workflows;
