//! AHP Engine - Analytic Hierarchy Process decision weighting
//!
//! Raters judge sibling criteria and alternatives pairwise on the Saaty
//! 1–9 scale. The engine turns those judgments into priority vectors with
//! the Power Method, checks their consistency, propagates weights through
//! the hierarchy into an alternative ranking, and aggregates several raters
//! into a group result with consensus metrics.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
