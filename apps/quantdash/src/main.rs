use clap::Parser;
use quantdash::headless::HeadlessArgs;
use quantdash::{logging, TuiOpts};
use quantdash_application::config::{load_config, to_toml_pretty, Config};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "quantdash")]
#[command(about = "Terminal dashboard for a backtest result + optional headless fetch.", version)]
struct Cli {
    /// Fetch once, print the dashboard as JSON and exit.
    #[arg(long)]
    headless: bool,

    /// Config file path (TOML). If omitted, uses env QUANTDASH_CONFIG, then defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override engine.base_url.
    #[arg(long)]
    base_url: Option<String>,

    /// Override engine.strategy_id.
    #[arg(long)]
    strategy: Option<String>,

    /// Print the resolved config as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if cli.print_config {
        match to_toml_pretty(&config) {
            Ok(text) => {
                print!("{text}");
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    let log_store = Arc::new(parking_lot::Mutex::new(logging::LogStore::new(5000)));
    if let Err(err) = init_tracing(cli.headless, log_store.clone()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    if cli.headless {
        match quantdash::headless::run_headless(HeadlessArgs { config }) {
            Ok(json) => {
                println!(
                    "{}",
                    serde_json::to_string(&json)
                        .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
                );
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    let opts = TuiOpts { config, log_store };
    if let Err(err) = quantdash::run(opts) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn resolve_config(cli: &Cli) -> Result<Config, String> {
    let path = cli.config.clone().or_else(|| {
        std::env::var("QUANTDASH_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });
    let mut config = match path {
        Some(path) => load_config(&path)?,
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.engine.base_url = base_url.clone();
    }
    if let Some(strategy) = &cli.strategy {
        config.engine.strategy_id = strategy.clone();
    }
    config.validate()?;
    Ok(config)
}

fn init_tracing(
    headless: bool,
    log_store: Arc<parking_lot::Mutex<logging::LogStore>>,
) -> Result<(), String> {
    let filter = std::env::var("QUANTDASH_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    // Headless output owns stdout; the TUI owns the whole terminal.
    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(logging::LogMakeWriter::new(log_store))
            .init();
    }

    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = std::env::var("QUANTDASH_METRICS_ADDR").ok() else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid QUANTDASH_METRICS_ADDR (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    Ok(None)
}
