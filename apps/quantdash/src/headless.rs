use quantdash_application::config::Config;
use quantdash_application::dashboard::DashboardModel;
use quantdash_application::loading::error_message;
use quantdash_domain::repositories::backtest_results::BacktestResultSource;
use quantdash_infrastructure::http::HttpBacktestSource;
use std::sync::Arc;

pub struct HeadlessArgs {
    pub config: Config,
}

/// Fetches the configured strategy once and returns the dashboard as JSON.
pub fn run_headless(args: HeadlessArgs) -> Result<serde_json::Value, String> {
    let config = args.config;
    let timezone = config.display.label_timezone()?;
    let source = HttpBacktestSource::new(config.engine.base_url.clone(), config.engine.timeout_ms)?;
    let strategy_id = config.engine.strategy_id.as_str();

    let result = source
        .fetch_result(strategy_id)
        .map_err(|err| error_message(&err))?;
    tracing::info!(
        strategy_id = %strategy_id,
        points = result.point_count(),
        "backtest result fetched"
    );

    let model = DashboardModel::build(Arc::new(result), timezone);
    Ok(model.to_json(strategy_id))
}

#[cfg(test)]
mod tests {
    use super::{run_headless, HeadlessArgs};
    use quantdash_application::config::Config;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(status: u16, body: &'static str) -> Option<String> {
        let listener = TcpListener::bind("127.0.0.1:0").ok()?;
        let addr = listener.local_addr().ok()?;
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write");
        });
        Some(format!("http://{addr}"))
    }

    fn config_for(base_url: String) -> Config {
        let mut config = Config::default();
        config.engine.base_url = base_url;
        config.display.timezone = "utc".to_string();
        config
    }

    const SCENARIO_A: &str = r#"{"equity_curve":[{"datetime":"2024-01-01T00:00:00Z","equity":10000},{"datetime":"2024-01-02T00:00:00Z","equity":10250.5}],"metrics":{"total_return":0.125,"cagr":0.48,"max_drawdown":-0.08,"sharpe":1.75,"sortino":2.1}}"#;

    #[test]
    fn prints_dashboard_json() {
        let Some(base_url) = serve_once(200, SCENARIO_A) else {
            return;
        };
        let json = run_headless(HeadlessArgs {
            config: config_for(base_url),
        })
        .expect("headless");

        assert_eq!(json["status"], "ok");
        assert_eq!(json["strategy"], "momentum");
        assert_eq!(json["points"], 2);
        assert_eq!(json["cards"][0]["label"], "Total Return");
        assert_eq!(json["cards"][0]["value"], "12.5%");
        assert_eq!(json["cards"][2]["value"], "-8.0%");
        assert_eq!(json["cards"][4]["value"], "2.10");
        assert_eq!(json["series"][1]["label"], "1/2/2024, 12:00:00 AM");
        assert_eq!(json["series"][1]["equity"], 10250.5);
    }

    #[test]
    fn server_error_becomes_message() {
        let Some(base_url) = serve_once(500, "{}") else {
            return;
        };
        let err = run_headless(HeadlessArgs {
            config: config_for(base_url),
        })
        .expect_err("500 must fail");
        assert_eq!(err, "HTTP 500");
    }

    #[test]
    fn invalid_timezone_is_rejected_before_fetching() {
        let mut config = Config::default();
        config.display.timezone = "mars".to_string();
        assert!(run_headless(HeadlessArgs { config }).is_err());
    }
}
