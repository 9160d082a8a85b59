use super::result::FinancialPathResult;

/// Scores a simulated path. Higher is better.
pub trait FitnessFunction: Send + Sync {
    /// Display name
    fn name(&self) -> &'static str;

    /// Score of `result`
    fn fitness(&self, result: &FinancialPathResult) -> f64;
}

/// Scores a path by its raw profit in bps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitFitness;

impl FitnessFunction for ProfitFitness {
    fn name(&self) -> &'static str {
        "profit"
    }

    #[allow(clippy::cast_precision_loss)]
    fn fitness(&self, result: &FinancialPathResult) -> f64 {
        result.profit_bps() as f64
    }
}

/// Scores a path by profit per second of expected latency.
///
/// Paths with no latency count as taking one second.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitPerSecondFitness;

impl FitnessFunction for ProfitPerSecondFitness {
    fn name(&self) -> &'static str {
        "profit per second"
    }

    #[allow(clippy::cast_precision_loss)]
    fn fitness(&self, result: &FinancialPathResult) -> f64 {
        result.profit_bps() as f64 / result.time_sec().max(1) as f64
    }
}
