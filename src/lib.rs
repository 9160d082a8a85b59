/*!
 * # Arbloop - Currency Arbitrage Detection and Execution
 *
 * Arbloop models markets, banks and crypto transfers as a directed graph of
 * currency accounts, finds conversion cycles that end with more than they
 * started with, and walks the best ones trade by trade.
 *
 * ## Core Features
 *
 * - **Cycle Search**: Enumerates every elementary cycle with Johnson's algorithm
 * - **Simulation**: Prices each cycle with integer basis point fee and rate arithmetic
 * - **Live Rates**: Keeps market edges priced from order books, offline until loaded
 * - **Execution**: Trades along a cycle with every hop gated by an authorizer
 *
 * ## Module Structure
 *
 * - `algo`: Graph algorithms: cycle finding, shortest paths, edge costs
 * - `arb`: Arbitrage search, simulation and execution
 * - `config`: Configuration read from the environment
 * - `error`: Library error type
 * - `graph`: Generic vertices, edges and graph container
 * - `market`: Currencies, exchanges, order books and the financial graph
 * - `utils`: Logging and constants
 */

/// Graph algorithms
pub mod algo;
/// Arbitrage search, simulation and execution
pub mod arb;
/// Configuration read from the environment
pub mod config;
/// Library error type
pub mod error;
/// Generic graph types
pub mod graph;
/// The financial domain
pub mod market;
/// Utility functions and helpers
pub mod utils;

#[cfg(test)]
mod test_helpers;
