use std::fmt::{self, Debug, Display};

use serde::Serialize;

/// A node in a directed graph.
///
/// Vertices are compared by [`Vertex::id`] only. The label is for display.
pub trait Vertex: Clone + Debug {
    /// Stable key, unique within a graph
    fn id(&self) -> &str;

    /// Human readable name
    fn label(&self) -> &str;

    /// Whether two vertices share an id.
    fn same_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// A vertex carrying nothing but an id and a label.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BasicVertex {
    /// Unique id
    id: String,
    /// Display label
    label: String,
}

impl BasicVertex {
    /// Creates a vertex.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl Vertex for BasicVertex {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl Debug for BasicVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V({})", self.id)
    }
}

impl Display for BasicVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
