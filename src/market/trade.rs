//! Trade authorization and trade records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::Mutex;

use super::edge::CurrencyEdge;
use super::Bps;
use crate::error::{ArbError, Result};
use crate::graph::Edge;

/// Decides whether a trade may go ahead.
#[async_trait]
pub trait TradeAuthorizer: Send + Sync {
    /// Whether `amount_bps` may be traded across `edge`.
    ///
    /// # Errors
    ///
    /// Returns an error when no decision can be reached.
    async fn authorize_trade(&self, edge: &CurrencyEdge, amount_bps: Bps) -> Result<bool>;
}

/// Record of one executed trade.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResult {
    /// When the trade settled
    executed_at: DateTime<Utc>,
    /// Edge traded across
    edge: CurrencyEdge,
    /// Amount taken from the source account
    debit_amount_bps: Bps,
    /// Amount credited to the destination account
    credit_amount_bps: Bps,
}

impl TradeResult {
    /// Creates a trade record.
    #[must_use]
    pub const fn new(
        executed_at: DateTime<Utc>,
        edge: CurrencyEdge,
        debit_amount_bps: Bps,
        credit_amount_bps: Bps,
    ) -> Self {
        Self {
            executed_at,
            edge,
            debit_amount_bps,
            credit_amount_bps,
        }
    }

    /// When the trade settled.
    #[must_use]
    pub const fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    /// Edge traded across.
    #[must_use]
    pub const fn edge(&self) -> &CurrencyEdge {
        &self.edge
    }

    /// Amount taken from the source account.
    #[must_use]
    pub const fn debit_amount_bps(&self) -> Bps {
        self.debit_amount_bps
    }

    /// Amount credited to the destination account.
    #[must_use]
    pub const fn credit_amount_bps(&self) -> Bps {
        self.credit_amount_bps
    }
}

/// Approves any trade up to a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct AmountLimitTradeAuthorizer {
    /// Largest amount approved
    max_amount_bps: Bps,
}

impl AmountLimitTradeAuthorizer {
    /// Creates an authorizer approving trades of at most `max_amount_bps`.
    #[must_use]
    pub const fn new(max_amount_bps: Bps) -> Self {
        Self { max_amount_bps }
    }
}

#[async_trait]
impl TradeAuthorizer for AmountLimitTradeAuthorizer {
    async fn authorize_trade(&self, edge: &CurrencyEdge, amount_bps: Bps) -> Result<bool> {
        let approved = amount_bps <= self.max_amount_bps;
        debug!(
            "limit authorizer: {} bps across {} -> {approved}",
            amount_bps,
            edge.id()
        );
        Ok(approved)
    }
}

/// Asks an operator to confirm each trade by typing `Yes`.
pub struct PromptTradeAuthorizer<R> {
    /// Where answers are read from
    input: Mutex<R>,
}

/// A [`PromptTradeAuthorizer`] reading from the process's standard input.
pub type HumanInputTradeAuthorizer = PromptTradeAuthorizer<BufReader<Stdin>>;

impl HumanInputTradeAuthorizer {
    /// Creates an authorizer that prompts on stdout and reads stdin.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> PromptTradeAuthorizer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Creates an authorizer reading answers from `input`.
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

#[async_trait]
impl<R> TradeAuthorizer for PromptTradeAuthorizer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn authorize_trade(&self, edge: &CurrencyEdge, amount_bps: Bps) -> Result<bool> {
        let prompt = format!(
            "Trade {amount_bps} bps of {} across {edge}? Type \"Yes\" to confirm: ",
            edge.from().currency()
        );
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| ArbError::AuthorizationFailed(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| ArbError::AuthorizationFailed(e.to_string()))?;

        let mut answer = String::new();
        let read = self
            .input
            .lock()
            .await
            .read_line(&mut answer)
            .await
            .map_err(|e| ArbError::AuthorizationFailed(e.to_string()))?;
        if read == 0 {
            return Err(ArbError::AuthorizationFailed(
                "input closed before an answer was given".to_string(),
            ));
        }

        let approved = answer.trim() == "Yes";
        info!("operator answered {:?} for {}", answer.trim(), edge.id());
        Ok(approved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::market::Fees;
    use crate::test_helpers::*;

    fn edge() -> CurrencyEdge {
        let usd = vertex("GDAX", "USD", 10_000);
        let eth = vertex("GDAX", "ETH", 10_000);
        currency_edge("e", &usd, &eth, Some(20_000), Fees::default(), 0)
    }

    #[tokio::test]
    async fn test_amount_limit() {
        let authorizer = AmountLimitTradeAuthorizer::new(1_000);
        for (amount, approved) in &[(999, true), (1_000, true), (1_001, false)] {
            assert_eq!(
                authorizer.authorize_trade(&edge(), *amount).await.unwrap(),
                *approved
            );
        }
    }

    #[tokio::test]
    async fn test_prompt_answers() {
        let authorizer = PromptTradeAuthorizer::new(&b"Yes\nyes\n  Yes  \nno\n"[..]);
        let edge = edge();
        for approved in [true, false, true, false] {
            assert_eq!(authorizer.authorize_trade(&edge, 10).await.unwrap(), approved);
        }
        assert_eq!(
            authorizer.authorize_trade(&edge, 10).await.err().unwrap().to_string(),
            "trade authorization failed: input closed before an answer was given"
        );
    }
}
