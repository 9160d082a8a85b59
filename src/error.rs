//! Error types shared by the graph, market and arbitrage modules.

use thiserror::Error;

/// Errors raised by graph construction, path search and trade execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbError {
    /// An object was constructed with values that break its invariants.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A path search referenced a vertex the graph does not hold.
    #[error("vertex {0} is not in the graph")]
    VertexNotInGraph(String),

    /// An offline edge was used for simulation, search or execution.
    #[error("edge {0} is offline")]
    EdgeOffline(String),

    /// A circuit produced by cycle enumeration has no backing edge between two of its vertices.
    #[error("malformed circuit: no edge from {from} to {to}")]
    MalformedCircuit {
        /// Id of the vertex the missing edge should leave
        from: String,
        /// Id of the vertex the missing edge should enter
        to: String,
    },

    /// A path walk started at a vertex with nowhere to go.
    #[error("no outgoing edge from vertex {0}")]
    NoOutgoingEdge(String),

    /// The authorizer declined the trade.
    #[error("trade on edge {0} was not authorized")]
    TradeNotAuthorized(String),

    /// The authorizer could not reach a decision.
    #[error("trade authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Market data needed to price an edge is missing or too thin.
    #[error("market data unavailable: {0}")]
    MarketData(String),

    /// A fire-once load signal fired a second time.
    #[error("load signal {0} fired more than once")]
    LoadedTwice(String),
}

/// Result alias defaulting to [`ArbError`].
pub type Result<T, E = ArbError> = std::result::Result<T, E>;
