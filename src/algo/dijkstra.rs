//! Dijkstra single-source shortest path.
//!
//! The frontier is a plain vector scanned on every step, so the search is O(n²) in
//! the number of vertices. Ties go to the vertex inserted into the graph first.

use log::debug;

use super::cost::{CostFunction, EqualCostFunction};
use super::NamedAlgorithm;
use crate::error::{ArbError, Result};
use crate::graph::{Edge, Graph, Vertex};

/// How the distance of a hop is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Every hop adds 1, regardless of the cost function
    #[default]
    Hops,
    /// Every hop adds the cost function's value for that edge
    EdgeCost,
}

/// Shortest path search parameterised by a cost function.
#[derive(Debug, Clone, Default)]
pub struct DijkstraShortestPath<C = EqualCostFunction> {
    /// Cost function consulted under [`DistanceMetric::EdgeCost`]
    cost: C,
    /// Distance metric for relaxation
    metric: DistanceMetric,
}

impl<C> DijkstraShortestPath<C> {
    /// Creates a hop counting search. The cost function is kept but not consulted.
    pub const fn new(cost: C) -> Self {
        Self {
            cost,
            metric: DistanceMetric::Hops,
        }
    }

    /// Creates a search that weights each hop by `cost`.
    pub const fn weighted(cost: C) -> Self {
        Self {
            cost,
            metric: DistanceMetric::EdgeCost,
        }
    }

    /// The distance metric in use.
    pub const fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Finds the shortest path leaving `from` and arriving at `to`.
    ///
    /// # Arguments
    ///
    /// * `graph` - The graph to search
    /// * `to` - Target vertex
    /// * `from` - Source vertex
    ///
    /// # Returns
    ///
    /// A sub-graph holding the path's vertices and edges in source-to-target order.
    /// The sub-graph is empty when no path exists or when `to` and `from` are the same vertex.
    ///
    /// # Errors
    ///
    /// * [`ArbError::VertexNotInGraph`] if either endpoint is missing from `graph`
    /// * Any error raised by the cost function under [`DistanceMetric::EdgeCost`]
    pub fn find_path<V, E>(&self, graph: &Graph<V, E>, to: &V, from: &V) -> Result<Graph<V, E>>
    where
        V: Vertex,
        E: Edge<Vertex = V>,
        C: CostFunction<E>,
    {
        let index = graph.index_by_id();
        let target = *index
            .get(to.id())
            .ok_or_else(|| ArbError::VertexNotInGraph(to.id().to_string()))?;
        let source = *index
            .get(from.id())
            .ok_or_else(|| ArbError::VertexNotInGraph(from.id().to_string()))?;

        let n = graph.vertices().len();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<usize>> = vec![None; n];
        let mut unvisited = vec![true; n];
        let mut queue: Vec<usize> = (0..n).collect();
        dist[source] = 0.0;

        while !queue.is_empty() {
            let mut min = f64::INFINITY;
            let mut pick = None;
            for (position, &q) in queue.iter().enumerate() {
                if dist[q] < min {
                    min = dist[q];
                    pick = Some(position);
                }
            }
            // Whatever is left is unreachable
            let Some(position) = pick else { break };

            let u = queue.remove(position);
            unvisited[u] = false;
            if u == target {
                break;
            }

            let u_vertex = &graph.vertices()[u];
            for (edge_index, edge) in graph.edges().iter().enumerate() {
                if !edge.from().same_as(u_vertex) {
                    continue;
                }
                let Some(&v) = index.get(edge.to().id()) else {
                    continue;
                };
                if !unvisited[v] {
                    continue;
                }
                let alt = dist[u] + self.step(edge)?;
                if alt < dist[v] {
                    dist[v] = alt;
                    prev[v] = Some(edge_index);
                }
            }
        }

        let mut vertices = Vec::new();
        let mut edges = Vec::new();
        if prev[target].is_some() {
            let mut current = target;
            vertices.push(graph.vertices()[current].clone());
            while let Some(edge_index) = prev[current] {
                let edge = &graph.edges()[edge_index];
                edges.push(edge.clone());
                current = index[edge.from().id()];
                vertices.push(graph.vertices()[current].clone());
            }
            vertices.reverse();
            edges.reverse();
        }
        debug!(
            "dijkstra: {} -> {} in {} hops",
            from.id(),
            to.id(),
            edges.len()
        );
        Ok(Graph::new(vertices, edges))
    }

    /// Distance added by one hop over `edge`.
    fn step<E>(&self, edge: &E) -> Result<f64>
    where
        C: CostFunction<E>,
    {
        match self.metric {
            DistanceMetric::Hops => Ok(1.0),
            DistanceMetric::EdgeCost => self.cost.edge_cost(edge),
        }
    }
}

impl<C> NamedAlgorithm for DijkstraShortestPath<C> {
    fn name(&self) -> &'static str {
        "Dijkstra's Shortest Path Algorithm"
    }

    fn complexity_order(&self) -> &'static str {
        "O(n^2)"
    }
}
