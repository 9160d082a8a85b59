//! Johnson's elementary circuit enumeration.
//!
//! The search walks successor lists from a start vertex `s`, blocking every vertex on the
//! current path. A vertex that reaches `s` is unblocked on the way back; one that does not
//! stays blocked and is parked in the block list of each of its successors, to be released
//! only when one of them is unblocked.
//!
//! Every start vertex gets a fresh search over the whole graph, so a circuit through `k`
//! vertices is reported `k` times, once rooted at each of its members.

use log::debug;

use super::NamedAlgorithm;
use crate::error::{ArbError, Result};
use crate::graph::{Edge, Graph, Vertex};

/// Enumerates cycles of a graph as sub-graphs in traversal order.
pub trait CycleFinder {
    /// Finds cycles in `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph does not support the search, or if a circuit cannot be
    /// mapped back onto the graph's edges.
    fn find_cycles<V, E>(&self, graph: &Graph<V, E>) -> Result<Vec<Graph<V, E>>>
    where
        V: Vertex,
        E: Edge<Vertex = V>;
}

/// Finds the elementary circuits through every vertex.
#[derive(Debug, Clone, Copy, Default)]
pub struct JohnsonCycleFinder;

impl CycleFinder for JohnsonCycleFinder {
    fn find_cycles<V, E>(&self, graph: &Graph<V, E>) -> Result<Vec<Graph<V, E>>>
    where
        V: Vertex,
        E: Edge<Vertex = V>,
    {
        let mut search = CircuitSearch::new(graph);
        for start in 0..graph.vertices().len() {
            search.run(start);
        }
        debug!(
            "johnson: {} circuits over {} vertices and {} edges",
            search.circuits.len(),
            graph.vertices().len(),
            graph.edges().len()
        );
        search
            .circuits
            .iter()
            .map(|circuit| circuit_to_graph(graph, circuit))
            .collect()
    }
}

impl NamedAlgorithm for JohnsonCycleFinder {
    fn name(&self) -> &'static str {
        "Johnson's Elementary Circuit Algorithm"
    }

    fn complexity_order(&self) -> &'static str {
        "O(n*e*(c+1))"
    }
}

/// Finds the elementary circuits through one designated vertex.
#[derive(Debug, Clone)]
pub struct JohnsonNodeCycleFinder {
    /// Id of the vertex every circuit must pass through
    start_id: String,
}

impl JohnsonNodeCycleFinder {
    /// Creates a finder rooted at `start`.
    pub fn new<V: Vertex>(start: &V) -> Self {
        Self {
            start_id: start.id().to_string(),
        }
    }
}

impl CycleFinder for JohnsonNodeCycleFinder {
    /// Returns no circuits for a graph without vertices or edges.
    ///
    /// # Errors
    ///
    /// [`ArbError::VertexNotInGraph`] if the start vertex is missing from a non-empty graph.
    fn find_cycles<V, E>(&self, graph: &Graph<V, E>) -> Result<Vec<Graph<V, E>>>
    where
        V: Vertex,
        E: Edge<Vertex = V>,
    {
        if graph.vertices().is_empty() || graph.edges().is_empty() {
            return Ok(Vec::new());
        }
        let start = graph
            .vertex_index(&self.start_id)
            .ok_or_else(|| ArbError::VertexNotInGraph(self.start_id.clone()))?;

        let mut search = CircuitSearch::new(graph);
        search.run(start);
        debug!(
            "johnson: {} circuits through {}",
            search.circuits.len(),
            self.start_id
        );
        search
            .circuits
            .iter()
            .map(|circuit| circuit_to_graph(graph, circuit))
            .collect()
    }
}

impl NamedAlgorithm for JohnsonNodeCycleFinder {
    fn name(&self) -> &'static str {
        "Johnson's Elementary Circuit Algorithm (single start)"
    }

    fn complexity_order(&self) -> &'static str {
        "O(n*e*(c+1))"
    }
}

/// Mutable state of one circuit search.
struct CircuitSearch {
    /// `successors[v]` lists the vertices `v` has an edge into, deduplicated, in vertex order
    successors: Vec<Vec<usize>>,
    /// Vertices that may not be entered
    blocked: Vec<bool>,
    /// `block_lists[w]` holds vertices to unblock once `w` is unblocked
    block_lists: Vec<Vec<usize>>,
    /// Current path from the start vertex
    stack: Vec<usize>,
    /// Circuits found so far, each starting at its start vertex
    circuits: Vec<Vec<usize>>,
}

impl CircuitSearch {
    fn new<V, E>(graph: &Graph<V, E>) -> Self
    where
        V: Vertex,
        E: Edge<Vertex = V>,
    {
        let n = graph.vertices().len();
        let index = graph.index_by_id();
        let mut successors = vec![Vec::new(); n];
        for edge in graph.edges() {
            if let (Some(&from), Some(&to)) = (index.get(edge.from().id()), index.get(edge.to().id())) {
                successors[from].push(to);
            }
        }
        for list in &mut successors {
            list.sort_unstable();
            list.dedup();
        }
        Self {
            successors,
            blocked: vec![false; n],
            block_lists: vec![Vec::new(); n],
            stack: Vec::with_capacity(n),
            circuits: Vec::new(),
        }
    }

    /// Clears the blocking state and collects the circuits through `start`.
    fn run(&mut self, start: usize) {
        self.blocked.fill(false);
        self.block_lists.iter_mut().for_each(Vec::clear);
        self.circuit(start, start);
    }

    /// Extends the current path with `v`. Returns whether any circuit was closed below it.
    fn circuit(&mut self, v: usize, start: usize) -> bool {
        let mut found = false;
        self.stack.push(v);
        self.blocked[v] = true;

        for k in 0..self.successors[v].len() {
            let w = self.successors[v][k];
            if w == start {
                self.circuits.push(self.stack.clone());
                found = true;
            } else if !self.blocked[w] && self.circuit(w, start) {
                found = true;
            }
        }

        if found {
            self.unblock(v);
        } else {
            for k in 0..self.successors[v].len() {
                let w = self.successors[v][k];
                if !self.block_lists[w].contains(&v) {
                    self.block_lists[w].push(v);
                }
            }
        }

        self.stack.pop();
        found
    }

    /// Unblocks `u` and, transitively, everything parked on it.
    fn unblock(&mut self, u: usize) {
        self.blocked[u] = false;
        for w in std::mem::take(&mut self.block_lists[u]) {
            if self.blocked[w] {
                self.unblock(w);
            }
        }
    }
}

/// Maps a circuit of vertex indices onto the graph's vertices and edges.
///
/// Each consecutive pair, wrapping around, is resolved to the first edge joining them.
fn circuit_to_graph<V, E>(graph: &Graph<V, E>, circuit: &[usize]) -> Result<Graph<V, E>>
where
    V: Vertex,
    E: Edge<Vertex = V>,
{
    let vertices: Vec<V> = circuit
        .iter()
        .map(|&i| graph.vertices()[i].clone())
        .collect();
    let edges = (0..vertices.len())
        .map(|k| {
            let from = &vertices[k];
            let to = &vertices[(k + 1) % vertices.len()];
            graph
                .edges()
                .iter()
                .find(|edge| edge.connects(to, from))
                .cloned()
                .ok_or_else(|| ArbError::MalformedCircuit {
                    from: from.id().to_string(),
                    to: to.id().to_string(),
                })
        })
        .collect::<Result<Vec<E>>>()?;
    Ok(Graph::new(vertices, edges))
}
