#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::Result;
use crate::graph::{BasicEdge, BasicVertex, Graph};
use crate::market::{
    Bps, Currency, CurrencyEdge, CurrencyVertex, Exchange, Fees, FinancialGraph, ProductStyle,
    TradeAuthorizer,
};

/// A graph of `n` vertices named `"0"` to `"n-1"` with edges given as `(id, to, from)` indices.
#[allow(dead_code)]
pub fn basic_graph(n: usize, edges: &[(&str, usize, usize)]) -> Graph<BasicVertex, BasicEdge> {
    let vertices: Vec<BasicVertex> = (0..n)
        .map(|i| BasicVertex::new(i.to_string(), i.to_string()))
        .collect();
    let edges = edges
        .iter()
        .map(|(id, to, from)| {
            BasicEdge::new(
                *id,
                *id,
                vertices[*to].clone(),
                vertices[*from].clone(),
            )
        })
        .collect();
    Graph::new(vertices, edges)
}

/// `symbol` held at a dashed-style market called `exchange`.
#[allow(dead_code)]
pub fn vertex(exchange: &str, symbol: &str, start_amount_bps: Bps) -> CurrencyVertex {
    CurrencyVertex::new(
        Arc::new(Currency::new(symbol, symbol)),
        Arc::new(Exchange::market(exchange, ProductStyle::Dashed)),
        start_amount_bps,
    )
    .unwrap()
}

/// A basic edge labelled with its id. A `None` rate leaves it offline.
#[allow(dead_code)]
pub fn currency_edge(
    id: &str,
    to: &CurrencyVertex,
    from: &CurrencyVertex,
    rate_bps: Option<Bps>,
    fees: Fees,
    time_estimate_sec: u64,
) -> CurrencyEdge {
    CurrencyEdge::basic(id, id, to.clone(), from.clone(), rate_bps, fees)
        .unwrap()
        .with_time_estimate(time_estimate_sec)
}

/// `X A -> X B -> X C -> X A` as edges `e0`, `e1`, `e2`, one second each.
#[allow(dead_code)]
pub fn triangle(rates_bps: &[Bps; 3]) -> FinancialGraph {
    let a = vertex("X", "A", 10_000);
    let b = vertex("X", "B", 10_000);
    let c = vertex("X", "C", 10_000);
    let edges = vec![
        currency_edge("e0", &b, &a, Some(rates_bps[0]), Fees::default(), 1),
        currency_edge("e1", &c, &b, Some(rates_bps[1]), Fees::default(), 1),
        currency_edge("e2", &a, &c, Some(rates_bps[2]), Fees::default(), 1),
    ];
    FinancialGraph::new(vec![a, b, c], edges)
}

/// Answers authorization requests from a script, in order.
#[allow(dead_code)]
pub struct ScriptedAuthorizer {
    responses: Mutex<VecDeque<Result<bool>>>,
    calls: Mutex<usize>,
}

#[allow(dead_code)]
impl ScriptedAuthorizer {
    pub fn new(responses: Vec<Result<bool>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        }
    }

    /// How many trades were put to the authorizer.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TradeAuthorizer for ScriptedAuthorizer {
    async fn authorize_trade(&self, _edge: &CurrencyEdge, _amount_bps: Bps) -> Result<bool> {
        *self.calls.lock().unwrap() += 1;
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(false))
    }
}
