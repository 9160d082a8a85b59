//! Live execution of a path: every hop is authorized and traded in turn.

use std::time::Instant;

use async_trait::async_trait;
use itertools::Itertools;
use log::{info, warn};

use super::result::{FinancialPathExecutionResult, FinancialPathResult, PathTotals};
use crate::algo::NamedAlgorithm;
use crate::error::{ArbError, Result};
use crate::graph::{Edge, Vertex};
use crate::market::{Bps, CurrencyVertex, FinancialGraph, TradeAuthorizer};

/// Trades along a path.
#[async_trait]
pub trait PathExecutor {
    /// Walks `graph` from `start`, trading `amount_bps` across the first hop and each hop's
    /// credit across the next one.
    ///
    /// # Arguments
    ///
    /// * `graph` - The path to execute, usually a cycle returned by a search
    /// * `start` - Vertex holding the funds
    /// * `amount_bps` - Amount traded across the first hop
    ///
    /// # Returns
    ///
    /// The walk and every trade made along it
    ///
    /// # Errors
    ///
    /// Stops at the first hop that fails, so earlier trades stand:
    ///
    /// * [`ArbError::TradeNotAuthorized`] if a trade is declined
    /// * [`ArbError::EdgeOffline`] if a hop has no rate
    /// * [`ArbError::NoOutgoingEdge`] if nothing leaves `start`
    async fn execute(
        &self,
        graph: &FinancialGraph,
        start: &CurrencyVertex,
        amount_bps: Bps,
    ) -> Result<FinancialPathExecutionResult>;
}

/// Executes hops one after another, asking an authorizer before each trade.
#[derive(Debug, Clone)]
pub struct SimplePathExecutor<A> {
    /// Approves or declines every trade
    authorizer: A,
}

impl<A: TradeAuthorizer> SimplePathExecutor<A> {
    /// Creates an executor gated by `authorizer`.
    pub const fn new(authorizer: A) -> Self {
        Self { authorizer }
    }
}

#[async_trait]
impl<A: TradeAuthorizer> PathExecutor for SimplePathExecutor<A> {
    async fn execute(
        &self,
        graph: &FinancialGraph,
        start: &CurrencyVertex,
        amount_bps: Bps,
    ) -> Result<FinancialPathExecutionResult> {
        let started = Instant::now();
        let mut vertex = start;
        let mut amount = amount_bps;
        let mut time_sec: u64 = 0;
        let mut trades = Vec::new();

        for _ in 0..graph.edges().len() {
            let Some(edge) = graph.find_next_edge(vertex) else {
                break;
            };
            let trade = match edge.execute_trade(&self.authorizer, amount).await {
                Ok(trade) => trade,
                Err(err) => {
                    warn!(
                        "execution stopped at {} after {} trades: {err}",
                        edge.id(),
                        trades.len()
                    );
                    return Err(err);
                }
            };
            amount = trade.credit_amount_bps();
            time_sec = time_sec.saturating_add(edge.time_estimate_sec());
            vertex = edge.to();
            trades.push(trade);
        }
        if trades.is_empty() {
            return Err(ArbError::NoOutgoingEdge(start.id().to_string()));
        }

        let name = std::iter::once(start.label())
            .chain(trades.iter().map(|trade| trade.edge().to().label()))
            .join("->");
        info!("executed {name}: {amount_bps} -> {amount}");

        let result = FinancialPathResult::new(
            name,
            graph.clone(),
            PathTotals {
                start_bps: amount_bps,
                end_bps: amount,
                time_sec,
            },
            start.clone(),
            vertex.clone(),
            None,
        );
        Ok(FinancialPathExecutionResult::new(
            result,
            trades,
            started.elapsed(),
        ))
    }
}

impl<A> NamedAlgorithm for SimplePathExecutor<A> {
    fn name(&self) -> &'static str {
        "Simple Path Execution"
    }

    fn complexity_order(&self) -> &'static str {
        "~Async O(n)"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::market::trade::AmountLimitTradeAuthorizer;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn test_executes_every_hop() {
        let graph = triangle(&[20_000, 5_000, 11_000]);
        let start = graph.vertices()[0].clone();

        let executor = SimplePathExecutor::new(AmountLimitTradeAuthorizer::new(1_000_000));
        let executed = executor.execute(&graph, &start, 10_000).await.unwrap();

        let trades = executed.trades();
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[0].debit_amount_bps(), 10_000);
        assert_eq!(trades[0].credit_amount_bps(), 20_000);
        assert_eq!(trades[1].debit_amount_bps(), 20_000);
        assert_eq!(trades[2].credit_amount_bps(), 11_000);
        assert!(trades
            .windows(2)
            .all(|w| w[0].executed_at() <= w[1].executed_at()));

        let result = executed.result();
        assert_eq!(result.name(), "X A->X B->X C->X A");
        assert_eq!(result.end_bps(), 11_000);
        assert_eq!(result.time_sec(), 3);
        assert_eq!(result.fitness(), None);

        let json = serde_json::to_value(&executed).unwrap();
        assert_eq!(json["profitBps"], 1_000);
        assert_eq!(json["trades"].as_array().unwrap().len(), 3);
        assert_eq!(json["timeSec"], 3);
        assert_eq!(json["startVertex"]["id"], "XA");
        // An execution carries every field of the walk it made
        let walk = serde_json::to_value(executed.result()).unwrap();
        for (key, value) in walk.as_object().unwrap() {
            assert_eq!(&json[key], value, "{key}");
        }
    }

    #[tokio::test]
    async fn test_denial_aborts_remaining_hops() {
        let graph = triangle(&[20_000, 5_000, 11_000]);
        let start = graph.vertices()[0].clone();

        let authorizer = ScriptedAuthorizer::new(vec![Ok(true), Ok(false), Ok(true)]);
        let executor = SimplePathExecutor::new(authorizer);
        assert_eq!(
            executor.execute(&graph, &start, 10_000).await.err().unwrap(),
            ArbError::TradeNotAuthorized("e1".to_string())
        );
        assert_eq!(executor.authorizer.calls(), 2);
    }

    #[tokio::test]
    async fn test_authorizer_failure_aborts_remaining_hops() {
        let graph = triangle(&[20_000, 5_000, 11_000]);
        let start = graph.vertices()[0].clone();

        let authorizer = ScriptedAuthorizer::new(vec![
            Ok(true),
            Err(ArbError::AuthorizationFailed("stdin closed".to_string())),
            Ok(true),
        ]);
        let executor = SimplePathExecutor::new(authorizer);
        assert_eq!(
            executor.execute(&graph, &start, 10_000).await.err().unwrap(),
            ArbError::AuthorizationFailed("stdin closed".to_string())
        );
        assert_eq!(executor.authorizer.calls(), 2);
    }

    #[tokio::test]
    async fn test_limit_applies_to_running_amount() {
        let graph = triangle(&[20_000, 5_000, 11_000]);
        let start = graph.vertices()[0].clone();

        // The first hop doubles the amount past the limit
        let executor = SimplePathExecutor::new(AmountLimitTradeAuthorizer::new(15_000));
        assert_eq!(
            executor.execute(&graph, &start, 10_000).await.err().unwrap(),
            ArbError::TradeNotAuthorized("e1".to_string())
        );
    }

    #[tokio::test]
    async fn test_nothing_to_execute() {
        let graph = triangle(&[10_000, 10_000, 10_000]);
        let outsider = vertex("Y", "A", 10_000);
        let executor = SimplePathExecutor::new(AmountLimitTradeAuthorizer::new(1));
        assert_eq!(
            executor.execute(&graph, &outsider, 1).await.err().unwrap(),
            ArbError::NoOutgoingEdge("YA".to_string())
        );
        assert_eq!(executor.name(), "Simple Path Execution");
    }
}
