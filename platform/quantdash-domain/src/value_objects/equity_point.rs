use serde::{Deserialize, Serialize};

/// One sample of the account value as reported by the backtest engine.
///
/// `datetime` is kept as the raw ISO-8601 string the engine sent; parsing
/// happens at validation and labeling time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EquityPoint {
    pub datetime: String,
    pub equity: f64,
}

impl EquityPoint {
    pub fn new(datetime: impl Into<String>, equity: f64) -> Self {
        Self {
            datetime: datetime.into(),
            equity,
        }
    }
}
