use quantdash_domain::entities::backtest_result::BacktestResult;
use quantdash_domain::errors::LoadError;
use quantdash_domain::repositories::backtest_results::BacktestResultSource;
use quantdash_domain::services::validation::decode_result;
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, ACCEPT};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktestCallInfo {
    pub endpoint: String,
    pub duration_ms: u64,
    pub status: Option<u16>,
    pub error_kind: Option<&'static str>,
}

/// Client for `GET {base_url}/backtest/{strategy_id}`.
///
/// One request per call, no retries. Without `timeout_ms` the request waits
/// for as long as the engine keeps the connection open.
pub struct HttpBacktestSource {
    pub base_url: String,
    pub timeout_ms: Option<u64>,
    client: Client,
}

impl HttpBacktestSource {
    pub fn new(base_url: String, timeout_ms: Option<u64>) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout_ms.map(Duration::from_millis))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            base_url,
            timeout_ms,
            client,
        })
    }

    pub fn endpoint(&self, strategy_id: &str) -> String {
        format!(
            "{}/backtest/{}",
            self.base_url.trim_end_matches('/'),
            strategy_id
        )
    }

    pub fn fetch_detailed(
        &self,
        strategy_id: &str,
    ) -> (BacktestCallInfo, Result<BacktestResult, LoadError>) {
        let endpoint = self.endpoint(strategy_id);
        let span = tracing::info_span!(
            "infra.backtest.fetch",
            base_url = %self.base_url,
            endpoint = %endpoint,
            strategy_id = %strategy_id,
            timeout_ms = ?self.timeout_ms
        );
        let _enter = span.enter();

        metrics::counter!("quantdash.infra.backtest.requests_total").increment(1);
        let start = Instant::now();
        let (status, outcome) = self.request(&endpoint);
        let duration_ms = start.elapsed().as_millis() as u64;

        let status_label = status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        let error_kind = outcome.as_ref().err().map(LoadError::kind);
        match &outcome {
            Ok(result) => {
                metrics::histogram!(
                    "quantdash.infra.backtest.call_ms",
                    "result" => "ok",
                    "status" => status_label
                )
                .record(duration_ms as f64);
                tracing::info!(
                    duration_ms,
                    points = result.point_count(),
                    "backtest result fetched"
                );
            }
            Err(err) => {
                let kind = err.kind();
                metrics::counter!(
                    "quantdash.infra.backtest.errors_total",
                    "kind" => kind,
                    "status" => status_label.clone()
                )
                .increment(1);
                metrics::histogram!(
                    "quantdash.infra.backtest.call_ms",
                    "result" => "err",
                    "status" => status_label,
                    "error_kind" => kind
                )
                .record(duration_ms as f64);
                tracing::warn!(
                    duration_ms,
                    status = ?status,
                    error_kind = kind,
                    error = %err,
                    "backtest request failed"
                );
            }
        }

        (
            BacktestCallInfo {
                endpoint,
                duration_ms,
                status,
                error_kind,
            },
            outcome,
        )
    }

    fn request(&self, endpoint: &str) -> (Option<u16>, Result<BacktestResult, LoadError>) {
        let response = self
            .client
            .get(endpoint)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send();
        let resp = match response {
            Ok(resp) => resp,
            Err(err) => return (None, Err(LoadError::Transport(err.to_string()))),
        };

        let status = resp.status();
        let code = Some(status.as_u16());
        if !status.is_success() {
            return (
                code,
                Err(LoadError::Status {
                    status: status.as_u16(),
                }),
            );
        }

        let body = match resp.text() {
            Ok(body) => body,
            Err(err) => {
                return (
                    code,
                    Err(LoadError::Transport(format!(
                        "failed to read response body: {err}"
                    ))),
                )
            }
        };
        (code, decode_result(&body))
    }
}

impl BacktestResultSource for HttpBacktestSource {
    fn fetch_result(&self, strategy_id: &str) -> Result<BacktestResult, LoadError> {
        let (_info, outcome) = self.fetch_detailed(strategy_id);
        outcome
    }
}
