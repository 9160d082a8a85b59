use std::collections::HashMap;

use serde::Serialize;

use super::edge::Edge;
use super::vertex::Vertex;

/// A directed multigraph holding vertices and edges in insertion order.
///
/// Vertices and edges are keyed by id. Lookups scan linearly; graphs in this
/// crate are a few dozen nodes at most. Construction keeps whatever it is given,
/// duplicates included, and only the `upsert_*` methods deduplicate.
#[derive(Clone, Debug, Serialize)]
pub struct Graph<V, E> {
    /// Vertices in insertion order
    vertices: Vec<V>,
    /// Edges in insertion order
    edges: Vec<E>,
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<V, E> Graph<V, E>
where
    V: Vertex,
    E: Edge<Vertex = V>,
{
    /// Creates a graph from the given vertices and edges.
    #[must_use]
    pub const fn new(vertices: Vec<V>, edges: Vec<E>) -> Self {
        Self { vertices, edges }
    }

    /// All vertices, in insertion order.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// All edges, in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    /// Whether the graph has neither vertices nor edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    /// Replaces the vertex with the same id, or appends it.
    pub fn upsert_vertex(&mut self, vertex: V) {
        match self.vertices.iter().position(|v| v.same_as(&vertex)) {
            Some(index) => self.vertices[index] = vertex,
            None => self.vertices.push(vertex),
        }
    }

    /// Replaces the edge with the same id, or appends it.
    pub fn upsert_edge(&mut self, edge: E) {
        match self.edges.iter().position(|e| e.id() == edge.id()) {
            Some(index) => self.edges[index] = edge,
            None => self.edges.push(edge),
        }
    }

    /// Whether a vertex with the same id is present.
    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.vertices.iter().any(|v| v.same_as(vertex))
    }

    /// Whether an edge with the same id is present.
    pub fn contains_edge(&self, edge: &E) -> bool {
        self.edges.iter().any(|e| e.id() == edge.id())
    }

    /// Position of the vertex with the given id.
    pub fn vertex_index(&self, id: &str) -> Option<usize> {
        self.vertices.iter().position(|v| v.id() == id)
    }

    /// Maps every vertex id to its position. Used by algorithms that resolve
    /// edge endpoints many times.
    pub(crate) fn index_by_id(&self) -> HashMap<&str, usize> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, v)| (v.id(), index))
            .collect()
    }

    /// Edges leaving `vertex`, in insertion order.
    pub fn edges_from<'a, 'v>(&'a self, vertex: &'v V) -> impl Iterator<Item = &'a E> + 'v
    where
        'a: 'v,
    {
        self.edges.iter().filter(move |e| e.from().same_as(vertex))
    }

    /// The first edge leaving `vertex`.
    ///
    /// On a simple cycle this is the only such edge, which makes it the next hop of a walk.
    pub fn find_next_edge(&self, vertex: &V) -> Option<&E> {
        self.edges.iter().find(|e| e.from().same_as(vertex))
    }

    /// Builds the adjacency matrix in vertex insertion order.
    ///
    /// Cell `[i][j]` is 1 when some edge has `to = vertices[i]` and `from = vertices[j]`.
    /// Self-loops land on the diagonal. Edges whose endpoints are not in the graph are ignored.
    pub fn to_adjacency_matrix(&self) -> Vec<Vec<u8>> {
        let n = self.vertices.len();
        let index = self.index_by_id();
        let mut matrix = vec![vec![0; n]; n];
        for edge in &self.edges {
            if let (Some(&i), Some(&j)) = (index.get(edge.to().id()), index.get(edge.from().id())) {
                matrix[i][j] = 1;
            }
        }
        matrix
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::{BasicEdge, BasicVertex};
    use crate::test_helpers::*;

    #[test]
    fn test_upsert_vertex_then_contains() {
        let mut graph = basic_graph(3, &[]);
        let outsider = BasicVertex::new("x", "x");
        assert!(!graph.contains_vertex(&outsider));

        graph.upsert_vertex(outsider.clone());
        assert!(graph.contains_vertex(&outsider));
        assert_eq!(graph.vertices().len(), 4);

        graph.upsert_vertex(outsider.clone());
        assert_eq!(graph.vertices().len(), 4);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut graph = basic_graph(3, &[("a", 0, 1), ("b", 1, 2)]);

        graph.upsert_vertex(BasicVertex::new("1", "renamed"));
        assert_eq!(graph.vertices().len(), 3);
        assert_eq!(graph.vertices()[1].label(), "renamed");

        let v = graph.vertices().to_vec();
        graph.upsert_edge(BasicEdge::new("a", "relabelled", v[2].clone(), v[0].clone()));
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.edges()[0].label(), "relabelled");
        assert_eq!(graph.edges()[0].to().id(), "2");
        assert!(graph.contains_edge(&graph.edges()[1].clone()));
    }

    #[test]
    fn test_construction_keeps_duplicate_ids() {
        let graph = basic_graph(2, &[("dup", 0, 1), ("dup", 1, 0)]);
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn test_adjacency_matrix() {
        let mut graph = basic_graph(
            3,
            &[
                ("e1", 1, 0),
                ("e2", 2, 1),
                ("e3", 0, 2),
                ("e4", 0, 1),
                ("e5", 1, 2),
                ("e6", 2, 0),
            ],
        );
        assert_eq!(
            graph.to_adjacency_matrix(),
            vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]]
        );

        for i in 0..3 {
            let v = graph.vertices()[i].clone();
            graph.upsert_edge(BasicEdge::new(format!("self{i}"), "", v.clone(), v));
        }
        assert_eq!(graph.to_adjacency_matrix(), vec![vec![1; 3]; 3]);
    }

    #[test]
    fn test_adjacency_matrix_is_directed() {
        let graph = basic_graph(2, &[("e1", 0, 1)]);
        assert_eq!(graph.to_adjacency_matrix(), vec![vec![0, 1], vec![0, 0]]);
    }

    #[test]
    fn test_find_next_edge() {
        let graph = basic_graph(3, &[("e1", 1, 0), ("e2", 2, 0), ("e3", 0, 2)]);
        let v = graph.vertices();
        assert_eq!(graph.find_next_edge(&v[0]).unwrap().id(), "e1");
        assert_eq!(graph.edges_from(&v[0]).count(), 2);
        assert!(graph.find_next_edge(&v[1]).is_none());
    }

    #[test]
    fn test_found_edges_outlive_the_lookup_vertex() {
        let graph = basic_graph(3, &[("e1", 1, 0), ("e2", 2, 0), ("e3", 0, 2)]);
        let (next, outgoing) = {
            let lookup = BasicVertex::new("0", "zero");
            let next = graph.find_next_edge(&lookup);
            let outgoing: Vec<&BasicEdge> = graph.edges_from(&lookup).collect();
            (next, outgoing)
        };
        assert_eq!(next.unwrap().id(), "e1");
        assert_eq!(outgoing.iter().map(|e| e.id()).collect::<Vec<_>>(), vec!["e1", "e2"]);
    }

    #[test]
    fn test_serialize() {
        let graph = basic_graph(2, &[("e1", 1, 0)]);
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "vertices": [{"id": "0", "label": "0"}, {"id": "1", "label": "1"}],
                "edges": [{"id": "e1", "to": "1", "from": "0", "label": "e1"}],
            })
        );
    }
}
