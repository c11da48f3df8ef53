use crate::entities::backtest_result::BacktestResult;
use crate::errors::LoadError;

/// Port to the external backtest engine.
///
/// Implementations issue exactly one request per call and never retry.
pub trait BacktestResultSource {
    fn fetch_result(&self, strategy_id: &str) -> Result<BacktestResult, LoadError>;
}
