pub mod backtest_result;
