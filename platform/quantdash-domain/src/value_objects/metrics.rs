use serde::{Deserialize, Serialize};

/// Summary metrics computed server-side.
///
/// `total_return`, `cagr` and `max_drawdown` are fractions (0.125 = 12.5%).
/// Drawdown arrives as a negative fraction and is kept that way.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Metrics {
    pub total_return: f64,
    pub cagr: f64,
    pub max_drawdown: f64,
    pub sharpe: f64,
    pub sortino: f64,
}

impl Metrics {
    /// Field name/value pairs in display order.
    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("total_return", self.total_return),
            ("cagr", self.cagr),
            ("max_drawdown", self.max_drawdown),
            ("sharpe", self.sharpe),
            ("sortino", self.sortino),
        ]
    }
}
