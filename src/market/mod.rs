//! # Market Module
//!
//! The financial domain: currencies and exchanges, accounts as vertices,
//! conversions as edges, and the machinery that keeps a graph of them priced.
//!
//! Amounts and rates are integer basis points: 10,000 bps is one unit.

/// Currencies and exchanges
pub mod currency;
/// Currency edges and their economics
pub mod edge;
/// Edge factories and rate sources
pub mod factory;
/// Load signals and the graph loader
pub mod loader;
/// Declarative model configuration
pub mod model;
/// Order books
pub mod order_book;
/// Trade authorization and trade records
pub mod trade;
/// Currency accounts
pub mod vertex;

pub use currency::{Currency, Exchange, ExchangeKind, ProductStyle};
pub use edge::{CurrencyEdge, EdgeKind, Fees, Rate};
pub use trade::{TradeAuthorizer, TradeResult};
pub use vertex::CurrencyVertex;

use crate::graph::Graph;

/// Fixed-point amount or rate; 10,000 bps is one unit.
pub type Bps = i64;

/// Bps in one unit.
pub const BPS_PER_UNIT: Bps = 10_000;

/// A graph whose vertices are currency accounts and whose edges are currency conversions.
pub type FinancialGraph = Graph<CurrencyVertex, CurrencyEdge>;
