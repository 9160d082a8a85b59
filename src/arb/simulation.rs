//! Dry runs of a path: every hop is priced with the edge's fee and rate arithmetic,
//! nothing is traded.

use std::sync::Arc;

use itertools::Itertools;
use log::debug;

use super::fitness::FitnessFunction;
use super::result::{FinancialPathResult, PathTotals};
use crate::algo::NamedAlgorithm;
use crate::error::{ArbError, Result};
use crate::graph::{Edge, Vertex};
use crate::market::{Bps, CurrencyVertex, FinancialGraph};

/// Prices a walk along a path without trading.
pub trait PathSimulator {
    /// Walks `graph` from `start` with `amount_bps`, following the first outgoing edge of each
    /// vertex, for at most one hop per edge.
    ///
    /// # Errors
    ///
    /// * [`ArbError::NoOutgoingEdge`] if nothing leaves `start`
    /// * [`ArbError::EdgeOffline`] if the walk crosses an offline edge
    fn calculate_expected_result(
        &self,
        graph: &FinancialGraph,
        start: &CurrencyVertex,
        amount_bps: Bps,
    ) -> Result<FinancialPathResult>;
}

/// Walks a path hop by hop and scores the outcome.
#[derive(Clone, Default)]
pub struct SimplePathSimulator {
    /// Scores results as they are built
    fitness: Option<Arc<dyn FitnessFunction>>,
}

impl SimplePathSimulator {
    /// Creates a simulator scoring results with `fitness`.
    #[must_use]
    pub fn new(fitness: Arc<dyn FitnessFunction>) -> Self {
        Self {
            fitness: Some(fitness),
        }
    }

    /// Creates a simulator that leaves results unscored.
    #[must_use]
    pub const fn unscored() -> Self {
        Self { fitness: None }
    }
}

impl PathSimulator for SimplePathSimulator {
    fn calculate_expected_result(
        &self,
        graph: &FinancialGraph,
        start: &CurrencyVertex,
        amount_bps: Bps,
    ) -> Result<FinancialPathResult> {
        let mut vertex = start;
        let mut amount = amount_bps;
        let mut time_sec: u64 = 0;
        let mut labels = vec![start.label()];

        for _ in 0..graph.edges().len() {
            let Some(edge) = graph.find_next_edge(vertex) else {
                break;
            };
            amount = edge.calculate_edge_outcome(amount)?;
            time_sec = time_sec.saturating_add(edge.time_estimate_sec());
            vertex = edge.to();
            labels.push(vertex.label());
        }
        if labels.len() == 1 {
            return Err(ArbError::NoOutgoingEdge(start.id().to_string()));
        }

        let name = labels.iter().join("->");
        debug!("simulated {name}: {amount_bps} -> {amount}");
        Ok(FinancialPathResult::new(
            name,
            graph.clone(),
            PathTotals {
                start_bps: amount_bps,
                end_bps: amount,
                time_sec,
            },
            start.clone(),
            vertex.clone(),
            self.fitness.as_deref(),
        ))
    }
}

impl NamedAlgorithm for SimplePathSimulator {
    fn name(&self) -> &'static str {
        "Simple Path Simulation"
    }

    fn complexity_order(&self) -> &'static str {
        "~O(n^2)"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::fitness::ProfitFitness;
    use crate::market::Fees;
    use crate::test_helpers::*;

    #[test]
    fn test_walks_a_cycle() {
        let graph = triangle(&[20_000, 5_000, 11_000]);
        let start = graph.vertices()[0].clone();

        let result = SimplePathSimulator::new(Arc::new(ProfitFitness))
            .calculate_expected_result(&graph, &start, 10_000)
            .unwrap();
        assert_eq!(result.name(), "X A->X B->X C->X A");
        assert_eq!(result.start_bps(), 10_000);
        // 10_000 * 2 * 0.5 * 1.1
        assert_eq!(result.end_bps(), 11_000);
        assert_eq!(result.profit_bps(), 1_000);
        assert_eq!(result.time_sec(), 3);
        assert_eq!(result.end_vertex().id(), "XA");
        assert_eq!(result.fitness(), Some(1_000.0));
    }

    #[test]
    fn test_unscored() {
        let graph = triangle(&[10_000, 10_000, 10_000]);
        let start = graph.vertices()[1].clone();

        let result = SimplePathSimulator::unscored()
            .calculate_expected_result(&graph, &start, 10_000)
            .unwrap();
        assert_eq!(result.name(), "X B->X C->X A->X B");
        assert_eq!(result.fitness(), None);
    }

    #[test]
    fn test_walk_is_bounded_by_edge_count() {
        let a = vertex("X", "A", 10_000);
        let edge = currency_edge("loop", &a, &a, Some(10_000), Fees { to_bps: 1, ..Fees::default() }, 1);
        let graph = FinancialGraph::new(vec![a.clone()], vec![edge]);

        let result = SimplePathSimulator::unscored()
            .calculate_expected_result(&graph, &a, 100)
            .unwrap();
        assert_eq!(result.end_bps(), 99);
        assert_eq!(result.name(), "X A->X A");
    }

    #[test]
    fn test_latency_saturates() {
        let a = vertex("X", "A", 10_000);
        let b = vertex("X", "B", 10_000);
        let edges = vec![
            currency_edge("ab", &b, &a, Some(10_000), Fees::default(), u64::MAX),
            currency_edge("ba", &a, &b, Some(10_000), Fees::default(), 1),
        ];
        let graph = FinancialGraph::new(vec![a.clone(), b], edges);

        let result = SimplePathSimulator::unscored()
            .calculate_expected_result(&graph, &a, 10_000)
            .unwrap();
        assert_eq!(result.time_sec(), u64::MAX);
    }

    #[test]
    fn test_errors() {
        let graph = triangle(&[10_000, 10_000, 10_000]);
        let outsider = vertex("Y", "A", 10_000);
        assert_eq!(
            SimplePathSimulator::unscored()
                .calculate_expected_result(&graph, &outsider, 10_000)
                .err()
                .unwrap(),
            ArbError::NoOutgoingEdge("YA".to_string())
        );

        let mut offline = triangle(&[10_000, 10_000, 10_000]);
        let dead = offline.edges()[1].offline();
        offline.upsert_edge(dead);
        let start = offline.vertices()[0].clone();
        assert_eq!(
            SimplePathSimulator::unscored()
                .calculate_expected_result(&offline, &start, 10_000)
                .err()
                .unwrap(),
            ArbError::EdgeOffline("e1".to_string())
        );
    }
}
