pub mod backtest_results;
