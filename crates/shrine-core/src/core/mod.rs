//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! ## Overview
//!
//! Everything in this layer is plain data. Requirements describe what a build has to reach,
//! stat configurations describe one concrete way of satisfying them, and allocations and
//! solutions describe the points actually spent. None of these types run the search
//! themselves; they are produced and consumed by [`crate::engine`].
//!
//! ## Architecture
//!
//! - **Models** ([`models`]) - Requirements, stat configurations, allocations and solutions

pub mod models;
