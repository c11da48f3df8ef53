mod backtest_client;

pub use backtest_client::{BacktestCallInfo, HttpBacktestSource};
