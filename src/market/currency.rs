use std::sync::Arc;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Symbols quoted with a `Z` prefix in Kraken pair names.
const FIAT_SYMBOLS: [&str; 5] = ["USD", "EUR", "GBP", "CAD", "JPY"];

/// A currency, unique by symbol.
#[derive(Clone, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display("{symbol}")]
pub struct Currency {
    /// Full name, e.g. "Ether"
    pub name: String,
    /// Ticker symbol, e.g. "ETH"
    pub symbol: String,
}

impl Currency {
    /// Creates a currency.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// How an exchange spells the id of a trading pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStyle {
    /// `BASE-QUOTE`, e.g. `ETH-USD`
    #[default]
    Dashed,
    /// Kraken asset codes: `XETHZUSD`, `XXBTZUSD`, `XETHXXBT`
    Kraken,
}

impl ProductStyle {
    /// The pair id for trading `base` against `quote`.
    #[must_use]
    pub fn product_id(self, base: &str, quote: &str) -> String {
        match self {
            Self::Dashed => format!("{base}-{quote}"),
            Self::Kraken => format!("{}{}", kraken_asset(base), kraken_asset(quote)),
        }
    }
}

/// Kraken's four letter asset code for a symbol.
fn kraken_asset(symbol: &str) -> String {
    let symbol = if symbol == "BTC" { "XBT" } else { symbol };
    if FIAT_SYMBOLS.contains(&symbol) {
        format!("Z{symbol}")
    } else {
        format!("X{symbol}")
    }
}

/// What kind of venue an exchange is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeKind {
    /// A market trading currency pairs
    Market {
        /// Pair id spelling
        product_style: ProductStyle,
    },
    /// A bank holding a single currency
    Bank {
        /// The only currency the bank holds
        currency: Arc<Currency>,
    },
}

/// A market or bank where currency can be held. Unique by name.
#[derive(Clone, Debug, Display)]
#[display("{name}")]
pub struct Exchange {
    /// Unique name, e.g. "GDAX"
    name: String,
    /// Market or bank
    kind: ExchangeKind,
}

impl Exchange {
    /// Creates a market exchange.
    pub fn market(name: impl Into<String>, product_style: ProductStyle) -> Self {
        Self {
            name: name.into(),
            kind: ExchangeKind::Market { product_style },
        }
    }

    /// Creates a bank that holds `currency`.
    pub fn bank(name: impl Into<String>, currency: Arc<Currency>) -> Self {
        Self {
            name: name.into(),
            kind: ExchangeKind::Bank { currency },
        }
    }

    /// Unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Market or bank.
    #[must_use]
    pub const fn kind(&self) -> &ExchangeKind {
        &self.kind
    }

    /// Pair id spelling; banks fall back to the dashed style.
    #[must_use]
    pub const fn product_style(&self) -> ProductStyle {
        match self.kind {
            ExchangeKind::Market { product_style } => product_style,
            ExchangeKind::Bank { .. } => ProductStyle::Dashed,
        }
    }
}

impl PartialEq for Exchange {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Exchange {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_ids() {
        for (style, base, quote, expected) in &[
            (ProductStyle::Dashed, "ETH", "USD", "ETH-USD"),
            (ProductStyle::Dashed, "LTC", "BTC", "LTC-BTC"),
            (ProductStyle::Kraken, "ETH", "USD", "XETHZUSD"),
            (ProductStyle::Kraken, "BTC", "USD", "XXBTZUSD"),
            (ProductStyle::Kraken, "ETH", "BTC", "XETHXXBT"),
        ] {
            assert_eq!(style.product_id(base, quote), *expected);
        }
    }

    #[test]
    fn test_exchange_identity_is_name() {
        let usd = Arc::new(Currency::new("US Dollar", "USD"));
        let a = Exchange::market("GDAX", ProductStyle::Dashed);
        let b = Exchange::bank("GDAX", usd);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "GDAX");
        assert_eq!(b.product_style(), ProductStyle::Dashed);
    }
}
