//! Edge factories: producers of fresh edges for a refresh cycle.
//!
//! A factory never fails. When its market data cannot be read it hands back
//! an offline copy of its edge, so the graph keeps its shape.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::RwLock;

use super::edge::{CurrencyEdge, Fees, Rate};
use super::order_book::OrderBookCache;
use super::vertex::CurrencyVertex;
use super::Bps;
use crate::error::{ArbError, Result};
use crate::graph::Edge;

/// Produces the current version of one edge.
#[async_trait]
pub trait EdgeFactory: Send + Sync {
    /// Id of the edge this factory produces
    fn edge_id(&self) -> &str;

    /// The edge, online if its data loaded and offline otherwise.
    async fn get_edge(&self) -> CurrencyEdge;
}

/// A request for the rate of one market edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuery {
    /// Exchange name
    pub exchange: String,
    /// Pair id as the exchange spells it
    pub product_id: String,
    /// `false` when selling the base currency at the bid, `true` when buying it at the ask
    pub inverted: bool,
    /// Amount of the edge's source currency to be traded
    pub volume_bps: Bps,
}

/// Prices market edges.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// The edge's conversion rate. Inverted queries answer with a [`Rate::Reciprocal`] price.
    ///
    /// # Errors
    ///
    /// [`ArbError::MarketData`] when the rate cannot be determined.
    async fn rate(&self, query: &RateQuery) -> Result<Rate>;
}

/// Serves a transfer edge, which always moves money at par.
#[derive(Debug, Clone)]
pub struct TransferEdgeFactory {
    /// The edge served on every call
    edge: CurrencyEdge,
}

impl TransferEdgeFactory {
    /// Factory for moving a crypto currency between exchanges.
    ///
    /// # Errors
    ///
    /// See [`CurrencyEdge::crypto_transfer`].
    pub fn crypto(
        to: CurrencyVertex,
        from: CurrencyVertex,
        fees: Fees,
        time_estimate_sec: u64,
    ) -> Result<Self> {
        Ok(Self {
            edge: CurrencyEdge::crypto_transfer(to, from, fees, time_estimate_sec)?,
        })
    }

    /// Factory for moving fiat with the given transfer product.
    ///
    /// # Errors
    ///
    /// See [`CurrencyEdge::bank_transfer`].
    pub fn bank(
        to: CurrencyVertex,
        from: CurrencyVertex,
        product: impl Into<String>,
        fees: Fees,
        time_estimate_sec: u64,
    ) -> Result<Self> {
        Ok(Self {
            edge: CurrencyEdge::bank_transfer(to, from, product, fees, time_estimate_sec)?,
        })
    }
}

#[async_trait]
impl EdgeFactory for TransferEdgeFactory {
    fn edge_id(&self) -> &str {
        self.edge.id()
    }

    async fn get_edge(&self) -> CurrencyEdge {
        self.edge.clone()
    }
}

/// Prices a market edge from a [`RateSource`].
///
/// Selling the base currency (`from` = base, `to` = quote) takes the highest bid.
/// Buying it (`from` = quote, `to` = base) is inverted and takes the reciprocal of the lowest ask.
pub struct MarketEdgeFactory {
    /// Offline edge the priced edges are derived from
    template: CurrencyEdge,
    /// What to ask the rate source
    query: RateQuery,
    /// Where rates come from
    source: Arc<dyn RateSource>,
}

impl MarketEdgeFactory {
    /// Creates a factory for trading `from` into `to` on their common exchange.
    ///
    /// # Arguments
    ///
    /// * `to` - Account receiving the converted currency
    /// * `from` - Account paying; its start amount is the volume priced
    /// * `inverted` - Whether `to` holds the pair's base currency
    /// * `fees` - Exchange fees
    /// * `time_estimate_sec` - Expected fill time
    /// * `source` - Rate source
    ///
    /// # Errors
    ///
    /// See [`CurrencyEdge::market`].
    pub fn new(
        to: CurrencyVertex,
        from: CurrencyVertex,
        inverted: bool,
        fees: Fees,
        time_estimate_sec: u64,
        source: Arc<dyn RateSource>,
    ) -> Result<Self> {
        let (base, quote) = if inverted { (&to, &from) } else { (&from, &to) };
        let exchange = from.exchange();
        let query = RateQuery {
            exchange: exchange.name().to_string(),
            product_id: exchange
                .product_style()
                .product_id(&base.currency().symbol, &quote.currency().symbol),
            inverted,
            volume_bps: from.start_amount_bps(),
        };
        Ok(Self {
            template: CurrencyEdge::market(to, from, inverted, fees, time_estimate_sec)?,
            query,
            source,
        })
    }

    /// Creates the two factories trading `base` against `quote`: selling the base, then buying it.
    ///
    /// # Errors
    ///
    /// See [`CurrencyEdge::market`].
    pub fn pair(
        base: &CurrencyVertex,
        quote: &CurrencyVertex,
        fees: Fees,
        time_estimate_sec: u64,
        source: &Arc<dyn RateSource>,
    ) -> Result<(Self, Self)> {
        let sell = Self::new(
            quote.clone(),
            base.clone(),
            false,
            fees,
            time_estimate_sec,
            Arc::clone(source),
        )?;
        let buy = Self::new(
            base.clone(),
            quote.clone(),
            true,
            fees,
            time_estimate_sec,
            Arc::clone(source),
        )?;
        Ok((sell, buy))
    }

    /// What this factory asks the rate source.
    #[must_use]
    pub const fn query(&self) -> &RateQuery {
        &self.query
    }
}

#[async_trait]
impl EdgeFactory for MarketEdgeFactory {
    fn edge_id(&self) -> &str {
        self.template.id()
    }

    async fn get_edge(&self) -> CurrencyEdge {
        match self.source.rate(&self.query).await {
            Ok(rate) => {
                debug!("{}: {rate:?}", self.template.id());
                self.template.priced(rate)
            }
            Err(e) => {
                warn!("{}: {e}", self.template.id());
                self.template.offline()
            }
        }
    }
}

/// Prices market edges from order book caches, one per exchange.
#[derive(Default)]
pub struct OrderBookRateSource {
    /// Caches keyed by exchange name
    caches: HashMap<String, Arc<RwLock<OrderBookCache>>>,
}

impl OrderBookRateSource {
    /// Creates a source with no caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the cache serving `exchange`.
    #[must_use]
    pub fn with_exchange(
        mut self,
        exchange: impl Into<String>,
        cache: Arc<RwLock<OrderBookCache>>,
    ) -> Self {
        self.caches.insert(exchange.into(), cache);
        self
    }
}

#[async_trait]
impl RateSource for OrderBookRateSource {
    async fn rate(&self, query: &RateQuery) -> Result<Rate> {
        let cache = self.caches.get(&query.exchange).ok_or_else(|| {
            ArbError::MarketData(format!("no order book feed for {}", query.exchange))
        })?;
        let cache = cache.read().await;
        if !cache.is_online(&query.product_id) {
            return Err(ArbError::MarketData(format!(
                "{} {} is offline",
                query.exchange, query.product_id
            )));
        }

        let rate = if query.inverted {
            cache
                .lowest_ask_for_quote_volume(&query.product_id, query.volume_bps)
                .map(Rate::Reciprocal)
        } else {
            cache
                .highest_bid_for_volume(&query.product_id, query.volume_bps)
                .map(Rate::Direct)
        };
        rate.filter(|rate| rate.price_bps() > 0).ok_or_else(|| {
            ArbError::MarketData(format!(
                "{} {} is too thin for {} bps",
                query.exchange, query.product_id, query.volume_bps
            ))
        })
    }
}
