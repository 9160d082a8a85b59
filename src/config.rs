//! Process configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first, so either source works:
//!
//! * `ARB_MODEL_PATH` - Model file to load, `models/example.json` when unset
//! * `ARB_MAX_TRADE_BPS` - Largest trade `execute` approves on its own; unset means every trade
//!   is confirmed by hand

use std::env;
use std::path::PathBuf;

use eyre::{Result, WrapErr};

use crate::market::Bps;
use crate::utils::constants::{DEFAULT_MODEL_PATH, MAX_TRADE_BPS_ENV, MODEL_PATH_ENV};

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Model file to load
    pub model_path: PathBuf,
    /// Largest trade approved without a prompt
    pub max_trade_bps: Option<Bps>,
}

impl Config {
    /// Reads the configuration from `.env` and the process environment.
    ///
    /// # Returns
    /// * `Result<Self>` - The configuration
    ///
    /// # Errors
    /// * If `ARB_MAX_TRADE_BPS` is set but is not an integer
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let model_path = lookup(MODEL_PATH_ENV)
            .filter(|path| !path.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH), PathBuf::from);

        let max_trade_bps = lookup(MAX_TRADE_BPS_ENV)
            .map(|raw| {
                raw.trim()
                    .parse::<Bps>()
                    .wrap_err_with(|| format!("{MAX_TRADE_BPS_ENV} must be an integer, got {raw:?}"))
            })
            .transpose()?;

        Ok(Self {
            model_path,
            max_trade_bps,
        })
    }
}
