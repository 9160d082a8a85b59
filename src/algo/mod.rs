//! # Graph Algorithms
//!
//! Shortest path search and elementary circuit enumeration over [`crate::graph::Graph`],
//! plus the cost functions that weight edges for path search.

/// Edge cost strategies
pub mod cost;
/// Dijkstra shortest path search
pub mod dijkstra;
/// Johnson's elementary circuit enumeration
pub mod johnson;

/// A named algorithm with its asymptotic cost, for reporting.
pub trait NamedAlgorithm {
    /// Display name
    fn name(&self) -> &'static str;

    /// Big-O complexity, as a display string
    fn complexity_order(&self) -> &'static str;
}
