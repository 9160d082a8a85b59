//! # Arbitrage Module
//!
//! Finding, pricing and executing arbitrage cycles over a financial graph.
//! A search enumerates cycles, a simulator prices each one without trading,
//! and an executor walks the chosen cycle trade by trade.

/// Live execution of a path
pub mod execution;
/// Scoring of simulated paths
pub mod fitness;
/// Path walk results
pub mod result;
/// Cycle search and ranking
pub mod search;
/// Dry runs of a path
pub mod simulation;
