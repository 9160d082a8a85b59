use std::fmt::{self, Debug, Display};
use std::time::Duration;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::fitness::FitnessFunction;
use crate::market::{Bps, CurrencyVertex, FinancialGraph, TradeResult, BPS_PER_UNIT};

/// Amounts and latency accumulated over a path walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTotals {
    /// Amount put in at the start vertex
    pub start_bps: Bps,
    /// Amount held at the end vertex
    pub end_bps: Bps,
    /// Sum of the edges' expected latencies
    pub time_sec: u64,
}

/// Outcome of walking a path once.
#[derive(Clone)]
pub struct FinancialPathResult {
    /// Visited vertex labels joined by `->`
    name: String,
    /// The path walked, in traversal order
    path: FinancialGraph,
    /// Amounts and latency
    totals: PathTotals,
    /// Where the walk began
    start_vertex: CurrencyVertex,
    /// Where the walk ended
    end_vertex: CurrencyVertex,
    /// Score given at construction, if a fitness function was supplied
    fitness: Option<f64>,
}

impl FinancialPathResult {
    /// Creates a result, scoring it with `fitness` when one is given.
    #[must_use]
    pub fn new(
        name: String,
        path: FinancialGraph,
        totals: PathTotals,
        start_vertex: CurrencyVertex,
        end_vertex: CurrencyVertex,
        fitness: Option<&dyn FitnessFunction>,
    ) -> Self {
        let mut result = Self {
            name,
            path,
            totals,
            start_vertex,
            end_vertex,
            fitness: None,
        };
        result.fitness = fitness.map(|f| f.fitness(&result));
        result
    }

    /// Visited vertex labels joined by `->`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path walked.
    #[must_use]
    pub const fn path(&self) -> &FinancialGraph {
        &self.path
    }

    /// Amount put in.
    #[must_use]
    pub const fn start_bps(&self) -> Bps {
        self.totals.start_bps
    }

    /// Amount held at the end.
    #[must_use]
    pub const fn end_bps(&self) -> Bps {
        self.totals.end_bps
    }

    /// End amount minus start amount. Only meaningful when both are in one currency.
    #[must_use]
    pub const fn profit_bps(&self) -> Bps {
        self.totals.end_bps - self.totals.start_bps
    }

    /// Profit in whole units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn profit(&self) -> f64 {
        self.profit_bps() as f64 / BPS_PER_UNIT as f64
    }

    /// Expected latency of the whole path.
    #[must_use]
    pub const fn time_sec(&self) -> u64 {
        self.totals.time_sec
    }

    /// Where the walk began.
    #[must_use]
    pub const fn start_vertex(&self) -> &CurrencyVertex {
        &self.start_vertex
    }

    /// Where the walk ended.
    #[must_use]
    pub const fn end_vertex(&self) -> &CurrencyVertex {
        &self.end_vertex
    }

    /// Score, if a fitness function was supplied.
    #[must_use]
    pub const fn fitness(&self) -> Option<f64> {
        self.fitness
    }
}

impl Debug for FinancialPathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FinancialPathResult({}: {} -> {} bps, fitness {:?})",
            self.name, self.totals.start_bps, self.totals.end_bps, self.fitness
        )
    }
}

impl Display for FinancialPathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:+.4} {} in {}s: {}",
            self.profit(),
            self.start_vertex.currency(),
            self.totals.time_sec,
            self.name
        )
    }
}

impl Serialize for FinancialPathResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FinancialPathResult", 10)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("startBps", &self.totals.start_bps)?;
        state.serialize_field("endBps", &self.totals.end_bps)?;
        state.serialize_field("profitBps", &self.profit_bps())?;
        state.serialize_field("profit", &self.profit())?;
        state.serialize_field("timeSec", &self.totals.time_sec)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("startVertex", &self.start_vertex)?;
        state.serialize_field("endVertex", &self.end_vertex)?;
        state.serialize_field("fitness", &self.fitness)?;
        state.end()
    }
}

/// Outcome of executing a path: the walk plus every trade made along it.
#[derive(Clone, Debug)]
pub struct FinancialPathExecutionResult {
    /// The walk, without a fitness score
    result: FinancialPathResult,
    /// Trades in execution order
    trades: Vec<TradeResult>,
    /// Wall clock time spent executing
    elapsed: Duration,
}

impl FinancialPathExecutionResult {
    /// Creates an execution result.
    #[must_use]
    pub const fn new(
        result: FinancialPathResult,
        trades: Vec<TradeResult>,
        elapsed: Duration,
    ) -> Self {
        Self {
            result,
            trades,
            elapsed,
        }
    }

    /// The walk.
    #[must_use]
    pub const fn result(&self) -> &FinancialPathResult {
        &self.result
    }

    /// Trades in execution order.
    #[must_use]
    pub fn trades(&self) -> &[TradeResult] {
        &self.trades
    }

    /// Wall clock time spent executing.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Serialize for FinancialPathExecutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let result = &self.result;
        let mut state = serializer.serialize_struct("FinancialPathExecutionResult", 12)?;
        state.serialize_field("name", &result.name)?;
        state.serialize_field("startBps", &result.totals.start_bps)?;
        state.serialize_field("endBps", &result.totals.end_bps)?;
        state.serialize_field("profitBps", &result.profit_bps())?;
        state.serialize_field("profit", &result.profit())?;
        state.serialize_field("timeSec", &result.totals.time_sec)?;
        state.serialize_field("path", &result.path)?;
        state.serialize_field("startVertex", &result.start_vertex)?;
        state.serialize_field("endVertex", &result.end_vertex)?;
        state.serialize_field("fitness", &result.fitness)?;
        state.serialize_field(
            "elapsedMs",
            &u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
        )?;
        state.serialize_field("trades", &self.trades)?;
        state.end()
    }
}
