//! Currency edges and the fixed-point arithmetic of moving money across them.

use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use chrono::Utc;
use log::info;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use super::currency::Exchange;
use super::trade::{TradeAuthorizer, TradeResult};
use super::vertex::CurrencyVertex;
use super::{Bps, BPS_PER_UNIT};
use crate::error::{ArbError, Result};
use crate::graph::{Edge, Vertex};
use crate::utils::constants::OFFLINE_EDGE_LABEL;

/// The four fee components of an edge, all in bps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fees {
    /// Flat fee taken from the destination currency
    pub to_bps: Bps,
    /// Flat fee taken from the source currency
    pub from_bps: Bps,
    /// Share of the converted amount taken on the destination side
    pub to_proportional_bps: Bps,
    /// Share of the converted amount taken on the source side
    pub from_proportional_bps: Bps,
}

impl Fees {
    /// Fails if any component is negative.
    fn validate(&self) -> Result<()> {
        if self.to_bps < 0
            || self.from_bps < 0
            || self.to_proportional_bps < 0
            || self.from_proportional_bps < 0
        {
            return Err(ArbError::InvalidArgument(format!(
                "fees must not be negative: {self:?}"
            )));
        }
        Ok(())
    }
}

/// How an edge converts an amount of its source currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rate {
    /// Units of `to` received per unit of `from`, in bps
    Direct(Bps),
    /// Units of `from` paid per unit of `to`, in bps, e.g. the ask when buying a base currency.
    /// Amounts are divided by it, so no precision is lost to a reciprocal.
    Reciprocal(Bps),
}

impl Rate {
    /// The underlying price, which must be positive for the rate to be usable.
    #[must_use]
    pub const fn price_bps(self) -> Bps {
        match self {
            Self::Direct(price) | Self::Reciprocal(price) => price,
        }
    }

    /// Units of `to` per unit of `from`, in bps, truncated toward zero.
    #[must_use]
    pub const fn as_bps(self) -> Bps {
        match self {
            Self::Direct(rate) => rate,
            Self::Reciprocal(price) => BPS_PER_UNIT * BPS_PER_UNIT / price,
        }
    }

    /// Converts `amount`, truncating toward zero.
    fn convert(self, amount: i128) -> i128 {
        let unit = i128::from(BPS_PER_UNIT);
        match self {
            Self::Direct(rate) => amount * i128::from(rate) / unit,
            Self::Reciprocal(price) => amount * unit / i128::from(price),
        }
    }
}

/// What an edge models. Each kind carries only its own data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// A bare conversion with no extra constraints
    Basic,
    /// A trade on an exchange's order book
    Market {
        /// The exchange both endpoints live on
        exchange: Arc<Exchange>,
        /// Whether the rate is the reciprocal of the pair's ask
        inverted: bool,
    },
    /// Moving fiat between banks and exchanges
    BankTransfer {
        /// Transfer product, e.g. "ACH" or "Wire"
        product: String,
    },
    /// Moving a crypto currency between exchanges
    CryptoTransfer,
}

impl EdgeKind {
    /// Short wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Market { .. } => "market",
            Self::BankTransfer { .. } => "bankTransfer",
            Self::CryptoTransfer => "cryptoTransfer",
        }
    }
}

/// A directed conversion from one currency account into another.
///
/// An edge is immutable. When market data changes, build a new one with
/// [`CurrencyEdge::with_rate`] or [`CurrencyEdge::offline`] and upsert it.
#[derive(Clone)]
pub struct CurrencyEdge {
    /// Unique id
    id: String,
    /// Display label
    label: String,
    /// Destination account
    to: CurrencyVertex,
    /// Source account
    from: CurrencyVertex,
    /// Conversion rate. Absent when offline
    rate: Option<Rate>,
    /// Fee components
    fees: Fees,
    /// Expected settlement latency
    time_estimate_sec: u64,
    /// What the edge models
    kind: EdgeKind,
}

impl CurrencyEdge {
    /// Creates an edge with no kind specific constraints.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if a fee is negative or the rate is not positive.
    pub fn basic(
        id: impl Into<String>,
        label: impl Into<String>,
        to: CurrencyVertex,
        from: CurrencyVertex,
        rate_bps: Option<Bps>,
        fees: Fees,
    ) -> Result<Self> {
        Self::build(id.into(), label.into(), to, from, rate_bps, fees, EdgeKind::Basic)
    }

    /// Creates an offline market edge for trading `from` into `to` on their common exchange.
    ///
    /// The id is the exchange name followed by the `to` and `from` symbols.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if the endpoints sit on different exchanges, hold the same
    /// currency, or if a fee is negative.
    pub fn market(
        to: CurrencyVertex,
        from: CurrencyVertex,
        inverted: bool,
        fees: Fees,
        time_estimate_sec: u64,
    ) -> Result<Self> {
        if to.exchange() != from.exchange() {
            return Err(ArbError::InvalidArgument(format!(
                "Cannot create a market edge between different exchanges: {} and {}",
                from.exchange(),
                to.exchange()
            )));
        }
        if to.currency() == from.currency() {
            return Err(ArbError::InvalidArgument(format!(
                "Cannot create a market edge trading {} for itself",
                to.currency()
            )));
        }
        let exchange = to.exchange_handle();
        let id = format!(
            "{}{}{}",
            exchange.name(),
            to.currency().symbol,
            from.currency().symbol
        );
        let kind = EdgeKind::Market { exchange, inverted };
        let edge = Self::build(id, OFFLINE_EDGE_LABEL.to_string(), to, from, None, fees, kind)?;
        Ok(edge.with_time_estimate(time_estimate_sec))
    }

    /// Creates an online edge moving one crypto currency between two exchanges at par.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if the endpoints hold different currencies or a fee is negative.
    pub fn crypto_transfer(
        to: CurrencyVertex,
        from: CurrencyVertex,
        fees: Fees,
        time_estimate_sec: u64,
    ) -> Result<Self> {
        if to.currency() != from.currency() {
            return Err(ArbError::InvalidArgument(format!(
                "Cannot create a crypto transfer edge between different currencies: {} and {}",
                from.currency(),
                to.currency()
            )));
        }
        let symbol = to.currency().symbol.clone();
        let id = format!("{}-{}-{symbol}-Transfer", to.exchange(), from.exchange());
        let edge = Self::build(
            id,
            symbol,
            to,
            from,
            Some(BPS_PER_UNIT),
            fees,
            EdgeKind::CryptoTransfer,
        )?;
        Ok(edge.with_time_estimate(time_estimate_sec))
    }

    /// Creates an online edge moving fiat between banks or exchanges at par.
    ///
    /// # Errors
    ///
    /// [`ArbError::InvalidArgument`] if the endpoints hold different currencies or a fee is negative.
    pub fn bank_transfer(
        to: CurrencyVertex,
        from: CurrencyVertex,
        product: impl Into<String>,
        fees: Fees,
        time_estimate_sec: u64,
    ) -> Result<Self> {
        if to.currency() != from.currency() {
            return Err(ArbError::InvalidArgument(format!(
                "Cannot create a bank transfer edge between different currencies: {} and {}",
                from.currency(),
                to.currency()
            )));
        }
        let product = product.into();
        let id = format!("{}-{}-{product}-Transfer", to.exchange(), from.exchange());
        let kind = EdgeKind::BankTransfer {
            product: product.clone(),
        };
        let edge = Self::build(id, product, to, from, Some(BPS_PER_UNIT), fees, kind)?;
        Ok(edge.with_time_estimate(time_estimate_sec))
    }

    /// Shared validation for every constructor.
    fn build(
        id: String,
        label: String,
        to: CurrencyVertex,
        from: CurrencyVertex,
        rate_bps: Option<Bps>,
        fees: Fees,
        kind: EdgeKind,
    ) -> Result<Self> {
        fees.validate()?;
        if let Some(rate) = rate_bps {
            if rate <= 0 {
                return Err(ArbError::InvalidArgument(format!(
                    "rate for edge {id} must be positive, got {rate}"
                )));
            }
        }
        Ok(Self {
            id,
            label,
            to,
            from,
            rate: rate_bps.map(Rate::Direct),
            fees,
            time_estimate_sec: 0,
            kind,
        })
    }

    /// Returns this edge with a new expected latency.
    #[must_use]
    pub fn with_time_estimate(mut self, time_estimate_sec: u64) -> Self {
        self.time_estimate_sec = time_estimate_sec;
        self
    }

    /// Returns an online copy of this edge priced at `rate_bps`, labelled with the rate.
    ///
    /// A non-positive rate yields an offline copy instead.
    #[must_use]
    pub fn with_rate(&self, rate_bps: Bps) -> Self {
        self.priced(Rate::Direct(rate_bps))
    }

    /// Returns an online copy of this edge converting at `rate`, labelled with it.
    ///
    /// A non-positive price yields an offline copy instead.
    #[must_use]
    pub fn priced(&self, rate: Rate) -> Self {
        if rate.price_bps() <= 0 {
            return self.offline();
        }
        Self {
            label: rate_label(rate),
            rate: Some(rate),
            ..self.clone()
        }
    }

    /// Returns an offline copy of this edge.
    #[must_use]
    pub fn offline(&self) -> Self {
        Self {
            label: OFFLINE_EDGE_LABEL.to_string(),
            rate: None,
            ..self.clone()
        }
    }

    /// Units of `to` received per unit of `from`, in bps.
    ///
    /// A [`Rate::Reciprocal`] is truncated here; outcomes use the exact rate.
    #[must_use]
    pub fn rate_bps(&self) -> Option<Bps> {
        self.rate.map(Rate::as_bps)
    }

    /// Conversion rate, if online.
    #[must_use]
    pub const fn rate(&self) -> Option<Rate> {
        self.rate
    }

    /// Fee components.
    #[must_use]
    pub const fn fees(&self) -> &Fees {
        &self.fees
    }

    /// Flat fee on the destination side.
    #[must_use]
    pub const fn fee_to_bps(&self) -> Bps {
        self.fees.to_bps
    }

    /// Flat fee on the source side.
    #[must_use]
    pub const fn fee_from_bps(&self) -> Bps {
        self.fees.from_bps
    }

    /// Proportional fee on the destination side.
    #[must_use]
    pub const fn fee_to_proportional_bps(&self) -> Bps {
        self.fees.to_proportional_bps
    }

    /// Proportional fee on the source side.
    #[must_use]
    pub const fn fee_from_proportional_bps(&self) -> Bps {
        self.fees.from_proportional_bps
    }

    /// Expected settlement latency.
    #[must_use]
    pub const fn time_estimate_sec(&self) -> u64 {
        self.time_estimate_sec
    }

    /// What the edge models.
    #[must_use]
    pub const fn kind(&self) -> &EdgeKind {
        &self.kind
    }

    /// Whether a rate backs this edge.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.rate.is_some()
    }

    /// Amount of the destination currency received for `amount_bps` of the source currency.
    ///
    /// Applied in order, truncating toward zero at each step:
    /// 1. subtract the flat source fee
    /// 2. convert at the rate
    /// 3. subtract the proportional source fee
    /// 4. subtract the proportional destination fee
    /// 5. subtract the flat destination fee
    ///
    /// # Errors
    ///
    /// * [`ArbError::EdgeOffline`] if the edge has no rate
    /// * [`ArbError::InvalidArgument`] if the result does not fit in [`Bps`]
    pub fn calculate_edge_outcome(&self, amount_bps: Bps) -> Result<Bps> {
        let rate = self
            .rate
            .ok_or_else(|| ArbError::EdgeOffline(self.id.clone()))?;
        let unit = i128::from(BPS_PER_UNIT);

        let mut amount = i128::from(amount_bps);
        amount -= i128::from(self.fees.from_bps);
        amount = rate.convert(amount);
        amount -= amount * i128::from(self.fees.from_proportional_bps) / unit;
        amount -= amount * i128::from(self.fees.to_proportional_bps) / unit;
        amount -= i128::from(self.fees.to_bps);

        Bps::try_from(amount).map_err(|_| {
            ArbError::InvalidArgument(format!(
                "outcome of {amount_bps} bps across {} overflows",
                self.id
            ))
        })
    }

    /// Asks `authorizer` for approval, then trades `amount_bps` across this edge.
    ///
    /// # Errors
    ///
    /// * [`ArbError::TradeNotAuthorized`] if the authorizer declines
    /// * Whatever error the authorizer itself raises
    /// * [`ArbError::EdgeOffline`] if the edge has no rate
    pub async fn execute_trade(
        &self,
        authorizer: &dyn TradeAuthorizer,
        amount_bps: Bps,
    ) -> Result<TradeResult> {
        if !authorizer.authorize_trade(self, amount_bps).await? {
            return Err(ArbError::TradeNotAuthorized(self.id.clone()));
        }
        self.execute_authorized_trade(amount_bps)
    }

    /// Settles an approved trade. Only reachable through [`CurrencyEdge::execute_trade`].
    fn execute_authorized_trade(&self, amount_bps: Bps) -> Result<TradeResult> {
        let credit_amount_bps = self.calculate_edge_outcome(amount_bps)?;
        info!(
            "trade {}: debit {amount_bps} {} credit {credit_amount_bps} {}",
            self.id,
            self.from.currency(),
            self.to.currency()
        );
        Ok(TradeResult::new(
            Utc::now(),
            self.clone(),
            amount_bps,
            credit_amount_bps,
        ))
    }
}

/// Formats a rate for display: `1/x.xxx` below par, `x.xxx` at or above it.
#[allow(clippy::cast_precision_loss)]
fn rate_label(rate: Rate) -> String {
    let unit = BPS_PER_UNIT as f64;
    match rate {
        Rate::Direct(rate_bps) if rate_bps < BPS_PER_UNIT => {
            format!("1/{:.3}", unit / rate_bps as f64)
        }
        Rate::Direct(rate_bps) => format!("{:.3}", rate_bps as f64 / unit),
        Rate::Reciprocal(price_bps) if price_bps > BPS_PER_UNIT => {
            format!("1/{:.3}", price_bps as f64 / unit)
        }
        Rate::Reciprocal(price_bps) => format!("{:.3}", unit / price_bps as f64),
    }
}

impl Edge for CurrencyEdge {
    type Vertex = CurrencyVertex;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn to(&self) -> &CurrencyVertex {
        &self.to
    }

    fn from(&self) -> &CurrencyVertex {
        &self.from
    }
}

impl Debug for CurrencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}>{:?} ", self.id, self.from, self.to)?;
        match self.rate {
            Some(Rate::Direct(rate)) => write!(f, "@{rate})"),
            Some(Rate::Reciprocal(price)) => write!(f, "@1/{price})"),
            None => write!(f, "offline)"),
        }
    }
}

impl Display for CurrencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.from.label(),
            self.to.label(),
            self.label
        )
    }
}

impl Serialize for CurrencyEdge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CurrencyEdge", 13)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("to", self.to.id())?;
        state.serialize_field("from", self.from.id())?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("kind", self.kind.as_str())?;
        state.serialize_field("online", &self.is_online())?;
        state.serialize_field(
            "inverseRateBps",
            &match self.rate {
                Some(Rate::Reciprocal(price)) => Some(price),
                _ => None,
            },
        )?;
        state.serialize_field("rateBps", &self.rate_bps())?;
        state.serialize_field("feeToBps", &self.fees.to_bps)?;
        state.serialize_field("feeFromBps", &self.fees.from_bps)?;
        state.serialize_field("feeToProportionalBps", &self.fees.to_proportional_bps)?;
        state.serialize_field("feeFromProportionalBps", &self.fees.from_proportional_bps)?;
        state.serialize_field("timeEstimateSec", &self.time_estimate_sec)?;
        state.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn test_outcome_with_every_fee() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let fees = Fees {
            to_bps: 50,
            from_bps: 100,
            to_proportional_bps: 30,
            from_proportional_bps: 20,
        };
        let edge = currency_edge("e", &usd, &eth, Some(25_000), fees, 0);

        // 1_000_000 - 100 = 999_900
        // 999_900 * 2.5 = 2_499_750
        // 2_499_750 - 4_999 = 2_494_751
        // 2_494_751 - 7_484 = 2_487_267
        // 2_487_267 - 50 = 2_487_217
        assert_eq!(edge.calculate_edge_outcome(1_000_000).unwrap(), 2_487_217);
    }

    #[test]
    fn test_outcome_fee_order_matters() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let flat_from = Fees {
            from_bps: 1_000,
            ..Fees::default()
        };
        let flat_to = Fees {
            to_bps: 1_000,
            ..Fees::default()
        };

        for (fees, amount_in, amount_out) in &[
            (Fees::default(), 10_000, 20_000),
            (flat_from, 10_000, 18_000),
            (flat_to, 10_000, 19_000),
        ] {
            let edge = currency_edge("e", &usd, &eth, Some(20_000), *fees, 0);
            assert_eq!(edge.calculate_edge_outcome(*amount_in).unwrap(), *amount_out);
        }
    }

    #[test]
    fn test_offline_edge_cannot_be_priced() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let edge = currency_edge("e", &usd, &eth, Some(20_000), Fees::default(), 0).offline();

        assert!(!edge.is_online());
        assert_eq!(edge.label(), OFFLINE_EDGE_LABEL);
        assert_eq!(
            edge.calculate_edge_outcome(10_000).err().unwrap(),
            ArbError::EdgeOffline("e".to_string())
        );
    }

    #[test]
    fn test_rate_labels() {
        for (rate, label) in &[
            (10_000, "1.000"),
            (25_000, "2.500"),
            (5_000, "1/2.000"),
            (3, "1/3333.333"),
        ] {
            assert_eq!(rate_label(Rate::Direct(*rate)), *label);
        }
    }

    #[test]
    fn test_reciprocal_rate_keeps_precision() {
        let usd = vertex("GDAX", "USD", 10_000_000);
        let btc = vertex("GDAX", "BTC", 10_000);
        let template = CurrencyEdge::market(btc, usd, true, Fees::default(), 5).unwrap();
        // BTC ask 4001 USD: a whole-bps rate would be 2 and lose a fifth of every buy
        let edge = template.priced(Rate::Reciprocal(40_010_000));

        assert_eq!(edge.rate(), Some(Rate::Reciprocal(40_010_000)));
        assert_eq!(edge.rate_bps(), Some(2));
        assert_eq!(edge.label(), "1/4001.000");
        // 1000 USD buys 0.2499 BTC
        assert_eq!(edge.calculate_edge_outcome(10_000_000).unwrap(), 2_499);
        assert_eq!(rate_label(Rate::Reciprocal(5_000)), "2.000");
        assert!(!template.priced(Rate::Reciprocal(0)).is_online());
    }

    #[test]
    fn test_market_edge() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let kraken_eth = vertex("Kraken", "ETH", 10_000);

        let edge = CurrencyEdge::market(usd.clone(), eth.clone(), false, Fees::default(), 5).unwrap();
        assert_eq!(edge.id(), "GDAXUSDETH");
        assert!(!edge.is_online());
        assert_eq!(edge.time_estimate_sec(), 5);

        let online = edge.with_rate(30_000_000);
        assert!(online.is_online());
        assert_eq!(online.label(), "3000.000");
        assert!(!edge.with_rate(0).is_online());

        assert_eq!(
            CurrencyEdge::market(usd, kraken_eth, false, Fees::default(), 5)
                .err()
                .unwrap()
                .to_string(),
            "invalid argument: Cannot create a market edge between different exchanges: Kraken and GDAX"
        );
        assert!(CurrencyEdge::market(eth.clone(), eth, false, Fees::default(), 5).is_err());
    }

    #[test]
    fn test_transfer_edges() {
        let gdax_eth = vertex("GDAX", "ETH", 10_000);
        let kraken_eth = vertex("Kraken", "ETH", 10_000);
        let gdax_usd = vertex("GDAX", "USD", 10_000);
        let kraken_usd = vertex("Kraken", "USD", 10_000);
        let fee = Fees {
            to_bps: 26,
            ..Fees::default()
        };

        let crypto = CurrencyEdge::crypto_transfer(kraken_eth.clone(), gdax_eth.clone(), fee, 20).unwrap();
        assert_eq!(crypto.id(), "Kraken-GDAX-ETH-Transfer");
        assert_eq!(crypto.label(), "ETH");
        assert_eq!(crypto.rate_bps(), Some(BPS_PER_UNIT));
        assert_eq!(crypto.calculate_edge_outcome(10_000).unwrap(), 9_974);

        let bank = CurrencyEdge::bank_transfer(kraken_usd, gdax_usd.clone(), "Wire", Fees::default(), 172_800).unwrap();
        assert_eq!(bank.id(), "Kraken-GDAX-Wire-Transfer");
        assert_eq!(bank.label(), "Wire");
        assert_eq!(bank.kind().as_str(), "bankTransfer");

        assert_eq!(
            CurrencyEdge::crypto_transfer(gdax_usd.clone(), gdax_eth.clone(), fee, 20)
                .err()
                .unwrap()
                .to_string(),
            "invalid argument: Cannot create a crypto transfer edge between different currencies: ETH and USD"
        );
        assert!(CurrencyEdge::bank_transfer(gdax_usd, gdax_eth, "ACH", Fees::default(), 0).is_err());
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let negative = Fees {
            to_bps: -1,
            ..Fees::default()
        };
        assert!(CurrencyEdge::basic("e", "e", usd.clone(), eth.clone(), Some(10_000), negative).is_err());
        assert!(CurrencyEdge::basic("e", "e", usd, eth, Some(0), Fees::default()).is_err());
    }

    #[test]
    fn test_serialize() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let edge = currency_edge("e", &usd, &eth, Some(20_000), Fees::default(), 7);
        let json = serde_json::to_value(&edge).unwrap();

        assert_eq!(json["id"], "e");
        assert_eq!(json["to"], "GDAXUSD");
        assert_eq!(json["from"], "GDAXETH");
        assert_eq!(json["rateBps"], 20_000);
        assert_eq!(json["online"], true);
        assert_eq!(json["timeEstimateSec"], 7);
    }

    #[tokio::test]
    async fn test_execute_trade() {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        let edge = currency_edge("e", &usd, &eth, Some(20_000), Fees::default(), 0);

        let approve = ScriptedAuthorizer::new(vec![Ok(true)]);
        let trade = edge.execute_trade(&approve, 5_000).await.unwrap();
        assert_eq!(trade.debit_amount_bps(), 5_000);
        assert_eq!(trade.credit_amount_bps(), 10_000);
        assert_eq!(trade.edge().id(), "e");

        let deny = ScriptedAuthorizer::new(vec![Ok(false)]);
        assert_eq!(
            edge.execute_trade(&deny, 5_000).await.err().unwrap(),
            ArbError::TradeNotAuthorized("e".to_string())
        );

        let broken = ScriptedAuthorizer::new(vec![Err(ArbError::AuthorizationFailed(
            "stdin closed".to_string(),
        ))]);
        assert_eq!(
            edge.execute_trade(&broken, 5_000).await.err().unwrap().to_string(),
            "trade authorization failed: stdin closed"
        );
    }
}
