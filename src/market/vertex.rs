use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::currency::{Currency, Exchange, ExchangeKind};
use super::Bps;
use crate::error::{ArbError, Result};
use crate::graph::Vertex;

/// An account holding one currency at one exchange or bank.
#[derive(Clone)]
pub struct CurrencyVertex {
    /// Exchange name followed by the currency symbol
    id: String,
    /// "{exchange} {symbol}"
    label: String,
    /// Currency held
    currency: Arc<Currency>,
    /// Where it is held
    exchange: Arc<Exchange>,
    /// Amount to simulate trades with when a path starts here
    start_amount_bps: Bps,
}

impl CurrencyVertex {
    /// Creates a vertex for `currency` held at `exchange`.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if the start amount is negative, or if `exchange` is a bank
    /// that holds a different currency.
    pub fn new(
        currency: Arc<Currency>,
        exchange: Arc<Exchange>,
        start_amount_bps: Bps,
    ) -> Result<Self> {
        if start_amount_bps < 0 {
            return Err(ArbError::InvalidArgument(format!(
                "start amount for {} {} must not be negative",
                exchange.name(),
                currency.symbol
            )));
        }
        if let ExchangeKind::Bank { currency: held } = exchange.kind() {
            if held.symbol != currency.symbol {
                return Err(ArbError::InvalidArgument(format!(
                    "bank {} only holds {}, not {}",
                    exchange.name(),
                    held.symbol,
                    currency.symbol
                )));
            }
        }
        Ok(Self {
            id: format!("{}{}", exchange.name(), currency.symbol),
            label: format!("{} {}", exchange.name(), currency.symbol),
            currency,
            exchange,
            start_amount_bps,
        })
    }

    /// Currency held.
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Where the currency is held.
    #[must_use]
    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    /// Shared handle to the exchange.
    #[must_use]
    pub fn exchange_handle(&self) -> Arc<Exchange> {
        Arc::clone(&self.exchange)
    }

    /// Trade size used when a simulated path starts at this vertex.
    #[must_use]
    pub const fn start_amount_bps(&self) -> Bps {
        self.start_amount_bps
    }
}

impl Vertex for CurrencyVertex {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl Debug for CurrencyVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Serialize for CurrencyVertex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CurrencyVertex", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("startAmountBps", &self.start_amount_bps)?;
        state.serialize_field("currency", self.currency.as_ref())?;
        state.end()
    }
}
