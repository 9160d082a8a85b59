/// Label carried by an edge that has no current rate
pub const OFFLINE_EDGE_LABEL: &str = "offline";

/// Expected latency of a market trade when the model does not give one
pub const DEFAULT_MARKET_TIME_ESTIMATE_SEC: u64 = 5;

/// Model file read when `ARB_MODEL_PATH` is unset
pub const DEFAULT_MODEL_PATH: &str = "models/example.json";

/// Environment variable naming the model file
pub const MODEL_PATH_ENV: &str = "ARB_MODEL_PATH";

/// Environment variable capping the size of an executed trade, in bps
pub const MAX_TRADE_BPS_ENV: &str = "ARB_MAX_TRADE_BPS";

