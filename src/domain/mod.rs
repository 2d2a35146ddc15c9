//! Domain layer containing the decision-weighting logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, status, errors, events)
//! - `hierarchy` - Goal, criteria and alternatives as a validated tree
//! - `analysis` - Pure numerics: matrices, eigenvectors, consistency, propagation
//! - `group` - Multi-rater aggregation and consensus
//! - `evaluation` - Session aggregate and its orchestrating state machine
//! - `progress` - Per-node progress and pushed snapshots

pub mod analysis;
pub mod evaluation;
pub mod foundation;
pub mod group;
pub mod hierarchy;
pub mod progress;
