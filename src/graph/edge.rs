use std::fmt::{self, Debug, Display};

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::vertex::{BasicVertex, Vertex};

/// A directed edge between two vertices.
///
/// Edges are built with their destination first: `to`, then `from`.
pub trait Edge: Clone + Debug {
    /// The vertex type this edge connects
    type Vertex: Vertex;

    /// Stable key, unique within a graph
    fn id(&self) -> &str;

    /// Human readable name
    fn label(&self) -> &str;

    /// Destination vertex
    fn to(&self) -> &Self::Vertex;

    /// Source vertex
    fn from(&self) -> &Self::Vertex;

    /// Whether this edge leaves `from` and enters `to`.
    fn connects(&self, to: &Self::Vertex, from: &Self::Vertex) -> bool {
        self.to().same_as(to) && self.from().same_as(from)
    }
}

/// A plain directed edge, generic over its vertex type.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicEdge<V = BasicVertex> {
    /// Unique id
    id: String,
    /// Display label
    label: String,
    /// Destination
    to: V,
    /// Source
    from: V,
}

impl<V: Vertex> BasicEdge<V> {
    /// Creates an edge running from `from` into `to`.
    pub fn new(id: impl Into<String>, label: impl Into<String>, to: V, from: V) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            to,
            from,
        }
    }
}

impl<V: Vertex> Edge for BasicEdge<V> {
    type Vertex = V;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn to(&self) -> &V {
        &self.to
    }

    fn from(&self) -> &V {
        &self.from
    }
}

impl<V: Vertex> Debug for BasicEdge<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E({}: {}>{})", self.id, self.from.id(), self.to.id())
    }
}

impl<V: Vertex> Display for BasicEdge<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Edges travel over the wire as `{id, to, from, label}` with endpoints reduced to their ids.
impl<V: Vertex> Serialize for BasicEdge<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Edge", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("to", self.to.id())?;
        state.serialize_field("from", self.from.id())?;
        state.serialize_field("label", &self.label)?;
        state.end()
    }
}
