//! Arbitrage search: enumerate the cycles of a graph, simulate each one and rank them.

use std::cmp::Ordering;
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, info};

use super::fitness::{FitnessFunction, ProfitFitness};
use super::result::FinancialPathResult;
use super::simulation::{PathSimulator, SimplePathSimulator};
use crate::algo::johnson::{CycleFinder, JohnsonCycleFinder};
use crate::algo::NamedAlgorithm;
use crate::error::{ArbError, Result};
use crate::graph::Edge;
use crate::market::FinancialGraph;

/// Finds and ranks arbitrage cycles.
pub trait ArbitrageSearch {
    /// Every cycle in `graph`, simulated and sorted best first.
    ///
    /// # Errors
    ///
    /// [`ArbError::EdgeOffline`] if any edge of `graph` is offline, before anything is simulated.
    fn find_paths(&self, graph: &FinancialGraph) -> Result<Vec<FinancialPathResult>>;

    /// The best cycle in `graph`, if there is any.
    ///
    /// # Errors
    ///
    /// See [`ArbitrageSearch::find_paths`].
    fn find_best_path(&self, graph: &FinancialGraph) -> Result<Option<FinancialPathResult>> {
        Ok(self.find_paths(graph)?.into_iter().next())
    }
}

/// Runs a cycle finder, then simulates each cycle from its first vertex.
///
/// Each simulation starts with that vertex's own start amount. Results are sorted by fitness,
/// highest first; unscored results go last, and ties keep enumeration order.
#[derive(Clone)]
pub struct SimpleArbitrageSearch<C = JohnsonCycleFinder, S = SimplePathSimulator> {
    /// Enumerates candidate cycles
    cycle_finder: C,
    /// Prices each cycle
    simulator: S,
}

impl<C, S> SimpleArbitrageSearch<C, S> {
    /// Creates a search from its parts.
    pub const fn new(cycle_finder: C, simulator: S) -> Self {
        Self {
            cycle_finder,
            simulator,
        }
    }
}

impl SimpleArbitrageSearch {
    /// Johnson's cycle finder with results scored by `fitness`.
    #[must_use]
    pub fn with_fitness(fitness: Arc<dyn FitnessFunction>) -> Self {
        Self::new(JohnsonCycleFinder, SimplePathSimulator::new(fitness))
    }
}

impl Default for SimpleArbitrageSearch {
    fn default() -> Self {
        Self::with_fitness(Arc::new(ProfitFitness))
    }
}

impl<C, S> ArbitrageSearch for SimpleArbitrageSearch<C, S>
where
    C: CycleFinder,
    S: PathSimulator,
{
    fn find_paths(&self, graph: &FinancialGraph) -> Result<Vec<FinancialPathResult>> {
        if let Some(edge) = graph.edges().iter().find(|edge| !edge.is_online()) {
            return Err(ArbError::EdgeOffline(edge.id().to_string()));
        }

        let cycles = self.cycle_finder.find_cycles(graph)?;
        debug!("search: simulating {} cycles", cycles.len());

        let results = cycles
            .iter()
            .filter_map(|cycle| cycle.vertices().first().map(|start| (cycle, start)))
            .map(|(cycle, start)| {
                self.simulator
                    .calculate_expected_result(cycle, start, start.start_amount_bps())
            })
            .collect::<Result<Vec<_>>>()?;

        let ranked: Vec<FinancialPathResult> = results
            .into_iter()
            .sorted_by(|a, b| by_fitness_descending(a.fitness(), b.fitness()))
            .collect();
        if let Some(best) = ranked.first() {
            info!("search: {} paths, best {best}", ranked.len());
        }
        Ok(ranked)
    }
}

/// Orders scores highest first, with unscored results last.
fn by_fitness_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl<C, S> NamedAlgorithm for SimpleArbitrageSearch<C, S> {
    fn name(&self) -> &'static str {
        "Simple Arbitrage Search"
    }

    fn complexity_order(&self) -> &'static str {
        "~O(n^4)"
    }
}
