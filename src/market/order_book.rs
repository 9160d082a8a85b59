//! In-memory order books, the synchronous query surface that market edges price against.

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::loader::LoadSignal;
use super::{Bps, BPS_PER_UNIT};
use crate::error::{ArbError, Result};

/// One price level of a book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevel {
    /// Price in quote currency bps per unit of base currency
    pub price_bps: Bps,
    /// Available base currency, in bps
    pub volume_bps: Bps,
}

impl PriceLevel {
    /// Creates a price level.
    #[must_use]
    pub const fn new(price_bps: Bps, volume_bps: Bps) -> Self {
        Self {
            price_bps,
            volume_bps,
        }
    }

    /// Value of the whole level in quote currency bps.
    fn quote_volume_bps(&self) -> i128 {
        i128::from(self.price_bps) * i128::from(self.volume_bps) / i128::from(BPS_PER_UNIT)
    }
}

/// Side of the book.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Buy orders
    Bid,
    /// Sell orders
    Ask,
}

/// Bids and asks for one trading pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Buy orders
    #[serde(default)]
    bids: Vec<PriceLevel>,
    /// Sell orders
    #[serde(default)]
    asks: Vec<PriceLevel>,
}

impl OrderBook {
    /// Creates a book from a snapshot.
    #[must_use]
    pub const fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }

    /// Sets the volume at a price. Zero volume removes the level.
    pub fn apply_update(&mut self, side: Side, level: PriceLevel) {
        let levels = match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        levels.retain(|l| l.price_bps != level.price_bps);
        if level.volume_bps > 0 {
            levels.push(level);
        }
    }

    /// Best bid among levels holding more than `volume_bps` of the base currency.
    #[must_use]
    pub fn highest_bid_for_volume(&self, volume_bps: Bps) -> Option<Bps> {
        self.bids
            .iter()
            .filter(|l| l.volume_bps > volume_bps)
            .map(|l| l.price_bps)
            .max()
    }

    /// Best ask among levels holding more than `volume_bps` of the base currency.
    #[must_use]
    pub fn lowest_ask_for_volume(&self, volume_bps: Bps) -> Option<Bps> {
        self.asks
            .iter()
            .filter(|l| l.volume_bps > volume_bps)
            .map(|l| l.price_bps)
            .min()
    }

    /// Best ask among levels worth more than `quote_volume_bps` of the quote currency.
    #[must_use]
    pub fn lowest_ask_for_quote_volume(&self, quote_volume_bps: Bps) -> Option<Bps> {
        self.asks
            .iter()
            .filter(|l| l.quote_volume_bps() > i128::from(quote_volume_bps))
            .map(|l| l.price_bps)
            .min()
    }
}

/// Order books for every product an exchange feed tracks.
///
/// The cache is loaded once each tracked product has received a snapshot.
#[derive(Debug)]
pub struct OrderBookCache {
    /// Books keyed by product id
    books: HashMap<String, OrderBook>,
    /// Products the feed subscribes to
    products: Vec<String>,
    /// Whether the feed is connected
    connected: bool,
    /// Fires once every product has a book
    loaded: LoadSignal,
}

impl OrderBookCache {
    /// Creates an empty, disconnected cache tracking `products`.
    pub fn new(name: impl Into<String>, products: Vec<String>) -> Self {
        Self {
            books: HashMap::new(),
            products,
            connected: false,
            loaded: LoadSignal::new(name),
        }
    }

    /// Marks the feed as connected or not.
    pub fn set_connected(&mut self, connected: bool) {
        if self.connected && !connected {
            warn!("order book feed {} disconnected", self.loaded.name());
        }
        self.connected = connected;
    }

    /// Replaces a product's book with a snapshot.
    ///
    /// # Errors
    ///
    /// * [`ArbError::InvalidArgument`] if `product` is not tracked
    /// * [`ArbError::LoadedTwice`] if the load signal was fired elsewhere
    pub fn apply_snapshot(&mut self, product: &str, book: OrderBook) -> Result<()> {
        self.ensure_tracked(product)?;
        self.books.insert(product.to_string(), book);
        debug!("order book {}: snapshot for {product}", self.loaded.name());
        if !self.loaded.is_loaded() && self.products.iter().all(|p| self.books.contains_key(p)) {
            self.loaded.fire()?;
        }
        Ok(())
    }

    /// Applies one level change to a product's book.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if `product` is not tracked.
    pub fn apply_update(&mut self, product: &str, side: Side, level: PriceLevel) -> Result<()> {
        self.ensure_tracked(product)?;
        self.books
            .entry(product.to_string())
            .or_default()
            .apply_update(side, level);
        Ok(())
    }

    /// Fails for products the feed does not track.
    fn ensure_tracked(&self, product: &str) -> Result<()> {
        if self.products.iter().any(|p| p == product) {
            Ok(())
        } else {
            Err(ArbError::InvalidArgument(format!(
                "order book {} does not track {product}",
                self.loaded.name()
            )))
        }
    }

    /// Whether a snapshot has arrived for `product`.
    #[must_use]
    pub fn has_order_book(&self, product: &str) -> bool {
        self.books.contains_key(product)
    }

    /// Whether `product` can be priced right now.
    #[must_use]
    pub fn is_online(&self, product: &str) -> bool {
        self.connected && self.has_order_book(product)
    }

    /// The book for `product`, if any.
    #[must_use]
    pub fn book(&self, product: &str) -> Option<&OrderBook> {
        self.books.get(product)
    }

    /// Best bid for `volume_bps` of the base currency.
    #[must_use]
    pub fn highest_bid_for_volume(&self, product: &str, volume_bps: Bps) -> Option<Bps> {
        self.book(product)?.highest_bid_for_volume(volume_bps)
    }

    /// Best ask for `volume_bps` of the base currency.
    #[must_use]
    pub fn lowest_ask_for_volume(&self, product: &str, volume_bps: Bps) -> Option<Bps> {
        self.book(product)?.lowest_ask_for_volume(volume_bps)
    }

    /// Best ask for `quote_volume_bps` worth of the quote currency.
    #[must_use]
    pub fn lowest_ask_for_quote_volume(&self, product: &str, quote_volume_bps: Bps) -> Option<Bps> {
        self.book(product)?.lowest_ask_for_quote_volume(quote_volume_bps)
    }

    /// Fires once every tracked product has a book.
    #[must_use]
    pub const fn loaded(&self) -> &LoadSignal {
        &self.loaded
    }
}
