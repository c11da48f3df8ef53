use crate::value_objects::equity_point::EquityPoint;
use crate::value_objects::metrics::Metrics;
use serde::{Deserialize, Serialize};

/// The full payload of `GET /backtest/{strategy_id}`.
///
/// Unknown top-level keys are ignored so the engine can grow its response
/// without breaking the dashboard.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BacktestResult {
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: Metrics,
}

impl BacktestResult {
    pub fn point_count(&self) -> usize {
        self.equity_curve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equity_curve.is_empty()
    }
}
