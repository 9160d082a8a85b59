//! # Graph Module
//!
//! Generic directed multigraph used by every algorithm in the crate.
//! Vertices and edges are identified by string ids; the containers keep
//! insertion order, which the algorithms rely on for deterministic output.

/// Graph container with upsert and containment by id
mod container;
/// Edge trait and a plain edge type
mod edge;
/// Vertex trait and a plain vertex type
mod vertex;

pub use container::Graph;
pub use edge::{BasicEdge, Edge};
pub use vertex::{BasicVertex, Vertex};
