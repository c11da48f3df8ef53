pub mod equity_point;
pub mod metrics;
