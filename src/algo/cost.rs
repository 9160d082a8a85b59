use crate::error::Result;
use crate::market::{Bps, CurrencyEdge};

/// Maps an edge to a scalar cost for path search.
pub trait CostFunction<E> {
    /// Cost of traversing `edge`.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge cannot be priced, for example when it is offline.
    fn edge_cost(&self, edge: &E) -> Result<f64>;
}

/// Every edge costs 1, which turns path search into hop counting.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualCostFunction;

impl<E> CostFunction<E> for EqualCostFunction {
    fn edge_cost(&self, _edge: &E) -> Result<f64> {
        Ok(1.0)
    }
}

/// Costs an edge by its expected settlement time in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeCostFunction;

impl CostFunction<CurrencyEdge> for TimeCostFunction {
    #[allow(clippy::cast_precision_loss)]
    fn edge_cost(&self, edge: &CurrencyEdge) -> Result<f64> {
        Ok(edge.time_estimate_sec() as f64)
    }
}

/// Costs an edge by the amount that comes out of it when `amount_bps` goes in.
#[derive(Debug, Clone, Copy)]
pub struct FeeCostFunction {
    /// Amount pushed through each edge
    amount_bps: Bps,
}

impl FeeCostFunction {
    /// Creates a cost function that prices edges for `amount_bps`.
    #[must_use]
    pub const fn new(amount_bps: Bps) -> Self {
        Self { amount_bps }
    }
}

impl CostFunction<CurrencyEdge> for FeeCostFunction {
    #[allow(clippy::cast_precision_loss)]
    fn edge_cost(&self, edge: &CurrencyEdge) -> Result<f64> {
        Ok(edge.calculate_edge_outcome(self.amount_bps)? as f64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ArbError;
    use crate::market::Fees;
    use crate::test_helpers::*;

    #[test]
    fn test_cost_functions() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let edge = currency_edge("e", &eth, &usd, Some(5_000), Fees::default(), 30);

        assert!((EqualCostFunction.edge_cost(&edge).unwrap() - 1.0).abs() < f64::EPSILON);
        assert!((TimeCostFunction.edge_cost(&edge).unwrap() - 30.0).abs() < f64::EPSILON);
        assert!((FeeCostFunction::new(20_000).edge_cost(&edge).unwrap() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fee_cost_of_offline_edge() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let edge = currency_edge("e", &eth, &usd, None, Fees::default(), 30);

        assert_eq!(
            FeeCostFunction::new(20_000).edge_cost(&edge).err().unwrap(),
            ArbError::EdgeOffline("e".to_string())
        );
    }
}
