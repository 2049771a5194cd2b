//! # Engine Module
//!
//! The search machinery behind the optimizer.
//!
//! ## Overview
//!
//! A build is solved by brute force over condition placements. Every "any" requirement can
//! be satisfied either before or after the shrine, so the engine enumerates each placement,
//! seeds a pre-shrine allocation for it, runs the shrine averaging transform, tops up whatever
//! the shrine left short, and keeps the cheapest candidate that stays inside the rules.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Point budget, stat cap, bottleneck limit and attunement set
//! - **Shrine Simulation** ([`shrine`]) - Averaging, bottleneck capping and spare-point handout
//! - **Placement Enumeration** ([`combinations`]) - Lazy sequence of every "any" resolution
//! - **Candidate Evaluation** ([`evaluator`]) - Seeding, top-up and feasibility checks
//! - **Progress Monitoring** ([`progress`]) - Callback-based search reporting
//! - **Error Handling** ([`error`]) - Boundary validation errors

pub mod combinations;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod progress;
pub mod shrine;
pub(crate) mod state;
