//! Display strings for the summary metrics.
//!
//! Ratios (`total_return`, `cagr`, `max_drawdown`) are shown as percentages
//! with one decimal; `sharpe` and `sortino` are shown raw with two decimals.
//! Values are never clamped and keep their sign.

use quantdash_domain::value_objects::metrics::Metrics;
use serde::Serialize;

pub const LABEL_TOTAL_RETURN: &str = "Total Return";
pub const LABEL_CAGR: &str = "CAGR";
pub const LABEL_MAX_DRAWDOWN: &str = "Max Drawdown";
pub const LABEL_SHARPE: &str = "Sharpe";
pub const LABEL_SORTINO: &str = "Sortino";

/// `0.125` -> `"12.5%"`.
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", to_fixed(ratio * 100.0, 1))
}

/// `1.23456` -> `"1.23"`, `-0.5` -> `"-0.50"`.
pub fn format_ratio(value: f64) -> String {
    to_fixed(value, 2)
}

// Digits past the requested precision inspected for an exact tie. A finite
// f64 large enough to round to a non-zero value never hides a deviation from
// the tie this far out.
const TIE_WINDOW: usize = 40;

/// Fixed-point rendering that settles exact ties away from zero, the way
/// engine dashboards have always shown these numbers (`1.125` -> `"1.13"`).
/// Non-ties use the exact decimal expansion. `-0.0` renders unsigned.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    let expanded = format!("{:.*}", digits + TIE_WINDOW, magnitude);
    let tail = &expanded[expanded.len() - TIE_WINDOW..];
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');

    let rounded = if is_tie {
        // The next f64 up sits strictly above the tie, so it rounds up.
        format!("{:.*}", digits, f64::from_bits(magnitude.to_bits() + 1))
    } else {
        format!("{:.*}", digits, magnitude)
    };
    if value < 0.0 {
        format!("-{rounded}")
    } else {
        rounded
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedMetrics {
    pub total_return: String,
    pub cagr: String,
    pub max_drawdown: String,
    pub sharpe: String,
    pub sortino: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

impl FormattedMetrics {
    pub fn from_metrics(metrics: &Metrics) -> Self {
        Self {
            total_return: format_percent(metrics.total_return),
            cagr: format_percent(metrics.cagr),
            max_drawdown: format_percent(metrics.max_drawdown),
            sharpe: format_ratio(metrics.sharpe),
            sortino: format_ratio(metrics.sortino),
        }
    }

    /// Cards in their fixed display order.
    pub fn cards(&self) -> [MetricCard; 5] {
        [
            MetricCard {
                label: LABEL_TOTAL_RETURN,
                value: self.total_return.clone(),
            },
            MetricCard {
                label: LABEL_CAGR,
                value: self.cagr.clone(),
            },
            MetricCard {
                label: LABEL_MAX_DRAWDOWN,
                value: self.max_drawdown.clone(),
            },
            MetricCard {
                label: LABEL_SHARPE,
                value: self.sharpe.clone(),
            },
            MetricCard {
                label: LABEL_SORTINO,
                value: self.sortino.clone(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{format_percent, format_ratio, to_fixed, FormattedMetrics};
    use quantdash_domain::value_objects::metrics::Metrics;

    #[test]
    fn ratio_uses_two_decimals_and_keeps_sign() {
        assert_eq!(format_ratio(1.23456), "1.23");
        assert_eq!(format_ratio(-0.5), "-0.50");
        assert_eq!(format_ratio(2.1), "2.10");
        assert_eq!(format_ratio(0.0), "0.00");
        assert_eq!(format_ratio(-0.0), "0.00");
        assert_eq!(format_ratio(1234.5678), "1234.57");
    }

    #[test]
    fn percent_scales_and_suffixes() {
        assert_eq!(format_percent(0.125), "12.5%");
        assert_eq!(format_percent(0.48), "48.0%");
        assert_eq!(format_percent(-0.08), "-8.0%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(-1.0), "-100.0%");
    }

    #[test]
    fn percent_does_not_clamp_large_values() {
        assert_eq!(format_percent(12.3456), "1234.6%");
        assert_eq!(format_percent(-3.0), "-300.0%");
    }

    #[test]
    fn tiny_negative_keeps_its_sign() {
        assert_eq!(format_percent(-0.0001), "-0.0%");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(format_ratio(1.125), "1.13");
        assert_eq!(format_ratio(0.125), "0.13");
        assert_eq!(format_ratio(-1.125), "-1.13");
        assert_eq!(format_percent(0.0025), "0.3%");
        assert_eq!(to_fixed(0.0625, 3), "0.063");
        assert_eq!(to_fixed(2.5, 0), "3");
    }

    #[test]
    fn near_ties_follow_the_exact_expansion() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(format_ratio(2.675), "2.67");
        // 1.005 is stored as 1.00499999...
        assert_eq!(format_ratio(1.005), "1.00");
        assert_eq!(to_fixed(0.1, 3), "0.100");
    }

    #[test]
    fn cards_follow_fixed_order() {
        let formatted = FormattedMetrics::from_metrics(&Metrics {
            total_return: 0.125,
            cagr: 0.48,
            max_drawdown: -0.08,
            sharpe: 1.75,
            sortino: 2.1,
        });
        let cards = formatted.cards();
        let labels: Vec<&str> = cards.iter().map(|c| c.label).collect();
        let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Total Return", "CAGR", "Max Drawdown", "Sharpe", "Sortino"]
        );
        assert_eq!(values, vec!["12.5%", "48.0%", "-8.0%", "1.75", "2.10"]);
    }
}
