//! Declarative description of a currency network and the builder that turns it into
//! vertices and edge factories.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use eyre::{Result as EyreResult, WrapErr};
use log::info;
use serde::Deserialize;

use super::currency::{Currency, Exchange, ProductStyle};
use super::edge::Fees;
use super::factory::{EdgeFactory, MarketEdgeFactory, RateSource, TransferEdgeFactory};
use super::loader::GraphLoader;
use super::order_book::OrderBook;
use super::vertex::CurrencyVertex;
use super::Bps;
use crate::error::{ArbError, Result};
use crate::graph::Vertex;
use crate::utils::constants::DEFAULT_MARKET_TIME_ESTIMATE_SEC;

/// A currency network: what exists, where it is held and how it moves.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialModelConfig {
    /// Every currency in the model
    pub currencies: Vec<Currency>,
    /// Every market and bank
    pub exchanges: Vec<ExchangeConfig>,
    /// Accounts, one per exchange and currency
    pub vertices: Vec<VertexConfig>,
    /// Trading pairs; each yields a sell and a buy edge
    #[serde(default)]
    pub markets: Vec<MarketConfig>,
    /// Transfers between accounts holding the same currency
    #[serde(default)]
    pub transfers: Vec<TransferConfig>,
    /// Order book snapshots keyed by exchange name, then product id
    #[serde(default)]
    pub order_books: HashMap<String, HashMap<String, OrderBook>>,
}

/// A market or bank.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExchangeConfig {
    /// A market trading currency pairs
    #[serde(rename_all = "camelCase")]
    Market {
        /// Unique name
        name: String,
        /// Pair id spelling
        #[serde(default)]
        product_style: ProductStyle,
    },
    /// A bank holding one currency
    Bank {
        /// Unique name
        name: String,
        /// Symbol of the currency held
        currency: String,
    },
}

/// An account: a currency held at an exchange.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexConfig {
    /// Exchange name
    pub exchange: String,
    /// Currency symbol
    pub currency: String,
    /// Trade size simulated from this account
    pub start_amount_bps: Bps,
}

/// A trading pair on one exchange.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConfig {
    /// Exchange name
    pub exchange: String,
    /// Base currency symbol
    pub base: String,
    /// Quote currency symbol
    pub quote: String,
    /// Trading fees
    #[serde(default)]
    pub fees: Fees,
    /// Expected fill time
    #[serde(default = "default_market_time_estimate_sec")]
    pub time_estimate_sec: u64,
}

/// Serde default for [`MarketConfig::time_estimate_sec`].
const fn default_market_time_estimate_sec() -> u64 {
    DEFAULT_MARKET_TIME_ESTIMATE_SEC
}

/// How a transfer moves money.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransferKind {
    /// On-chain crypto transfer
    Crypto,
    /// Bank transfer with a named product
    Bank {
        /// Product name, e.g. "ACH"
        product: String,
    },
}

/// A transfer of one currency from one exchange to another.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferConfig {
    /// Crypto or bank
    #[serde(flatten)]
    pub kind: TransferKind,
    /// Currency symbol
    pub currency: String,
    /// Exchange sending
    pub from: String,
    /// Exchange receiving
    pub to: String,
    /// Transfer fees
    #[serde(default)]
    pub fees: Fees,
    /// Expected settlement time
    pub time_estimate_sec: u64,
    /// Whether the reverse transfer exists too
    #[serde(default)]
    pub bidirectional: bool,
}

impl FinancialModelConfig {
    /// Reads a model from a JSON file.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or is not a valid model.
    pub fn from_path(path: &Path) -> EyreResult<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading model {}", path.display()))?;
        serde_json::from_str(&raw).wrap_err_with(|| format!("parsing model {}", path.display()))
    }
}

/// A built model: shared currencies and exchanges, the accounts, and one factory per edge.
pub struct FinancialModel {
    /// Currencies by symbol
    currencies: HashMap<String, Arc<Currency>>,
    /// Exchanges by name
    exchanges: HashMap<String, Arc<Exchange>>,
    /// Accounts, in configuration order
    vertices: Vec<CurrencyVertex>,
    /// Edge producers
    factories: Vec<Box<dyn EdgeFactory>>,
}

impl FinancialModel {
    /// Builds a model, resolving every name in `config`. Market edges are priced by `source`.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] for unknown or duplicate names and for edges that break
    /// their kind's constraints.
    pub fn build(config: &FinancialModelConfig, source: &Arc<dyn RateSource>) -> Result<Self> {
        let mut model = Self {
            currencies: HashMap::new(),
            exchanges: HashMap::new(),
            vertices: Vec::new(),
            factories: Vec::new(),
        };

        for currency in &config.currencies {
            if model
                .currencies
                .insert(currency.symbol.clone(), Arc::new(currency.clone()))
                .is_some()
            {
                return Err(invalid(format!("duplicate currency {}", currency.symbol)));
            }
        }

        for exchange in &config.exchanges {
            let exchange = match exchange {
                ExchangeConfig::Market {
                    name,
                    product_style,
                } => Exchange::market(name.clone(), *product_style),
                ExchangeConfig::Bank { name, currency } => {
                    Exchange::bank(name.clone(), model.currency(currency)?)
                }
            };
            let name = exchange.name().to_string();
            if model.exchanges.insert(name.clone(), Arc::new(exchange)).is_some() {
                return Err(invalid(format!("duplicate exchange {name}")));
            }
        }

        for vertex in &config.vertices {
            let built = CurrencyVertex::new(
                model.currency(&vertex.currency)?,
                model.exchange(&vertex.exchange)?,
                vertex.start_amount_bps,
            )?;
            if model.vertices.iter().any(|v| v.same_as(&built)) {
                return Err(invalid(format!("duplicate vertex {}", built.id())));
            }
            model.vertices.push(built);
        }

        for market in &config.markets {
            let base = model.vertex(&market.exchange, &market.base)?;
            let quote = model.vertex(&market.exchange, &market.quote)?;
            let (sell, buy) = MarketEdgeFactory::pair(
                &base,
                &quote,
                market.fees,
                market.time_estimate_sec,
                source,
            )?;
            model.factories.push(Box::new(sell));
            model.factories.push(Box::new(buy));
        }

        for transfer in &config.transfers {
            model.add_transfer(transfer, &transfer.to, &transfer.from)?;
            if transfer.bidirectional {
                model.add_transfer(transfer, &transfer.from, &transfer.to)?;
            }
        }

        info!(
            "model built: {} currencies, {} exchanges, {} vertices, {} edges",
            model.currencies.len(),
            model.exchanges.len(),
            model.vertices.len(),
            model.factories.len()
        );
        Ok(model)
    }

    /// Adds the factory for one direction of a transfer.
    fn add_transfer(&mut self, transfer: &TransferConfig, to: &str, from: &str) -> Result<()> {
        let to = self.vertex(to, &transfer.currency)?;
        let from = self.vertex(from, &transfer.currency)?;
        let factory = match &transfer.kind {
            TransferKind::Crypto => {
                TransferEdgeFactory::crypto(to, from, transfer.fees, transfer.time_estimate_sec)?
            }
            TransferKind::Bank { product } => TransferEdgeFactory::bank(
                to,
                from,
                product.clone(),
                transfer.fees,
                transfer.time_estimate_sec,
            )?,
        };
        self.factories.push(Box::new(factory));
        Ok(())
    }

    /// The currency with `symbol`.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if there is none.
    pub fn currency(&self, symbol: &str) -> Result<Arc<Currency>> {
        self.currencies
            .get(symbol)
            .cloned()
            .ok_or_else(|| invalid(format!("unknown currency {symbol}")))
    }

    /// The exchange called `name`.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if there is none.
    pub fn exchange(&self, name: &str) -> Result<Arc<Exchange>> {
        self.exchanges
            .get(name)
            .cloned()
            .ok_or_else(|| invalid(format!("unknown exchange {name}")))
    }

    /// The account holding `symbol` at `exchange`.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if there is none.
    pub fn vertex(&self, exchange: &str, symbol: &str) -> Result<CurrencyVertex> {
        self.vertices
            .iter()
            .find(|v| v.exchange().name() == exchange && v.currency().symbol == symbol)
            .cloned()
            .ok_or_else(|| invalid(format!("unknown vertex {exchange} {symbol}")))
    }

    /// All accounts.
    #[must_use]
    pub fn vertices(&self) -> &[CurrencyVertex] {
        &self.vertices
    }

    /// Number of edges the model produces.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.factories.len()
    }

    /// Hands the accounts and factories to a loader.
    #[must_use]
    pub fn into_loader(self) -> GraphLoader {
        GraphLoader::new(self.vertices, self.factories)
    }
}

/// Shorthand for an [`ArbError::InvalidArgument`].
fn invalid(message: String) -> ArbError {
    ArbError::InvalidArgument(message)
}
