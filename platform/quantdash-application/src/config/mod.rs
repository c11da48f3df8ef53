use crate::series::LabelTimezone;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_STRATEGY_ID: &str = "momentum";
pub const DEFAULT_TITLE: &str = "Momentum Strategy Dashboard";
pub const DEFAULT_SUBTITLE: &str = "BTC/USDT · 1h · Binance";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_strategy_id")]
    pub strategy_id: String,
    /// Unset means the request may wait forever on a hung engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            strategy_id: default_strategy_id(),
            timeout_ms: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            timezone: default_timezone(),
        }
    }
}

impl EngineConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/backtest/{}",
            self.base_url.trim_end_matches('/'),
            self.strategy_id
        )
    }
}

impl DisplayConfig {
    pub fn label_timezone(&self) -> Result<LabelTimezone, String> {
        LabelTimezone::parse(&self.timezone)
    }
}

impl Config {
    /// Checks what serde cannot: non-empty identifiers and a known timezone.
    pub fn validate(&self) -> Result<(), String> {
        let base = self.engine.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(format!(
                "engine.base_url must start with http:// or https:// (got {:?})",
                self.engine.base_url
            ));
        }
        let strategy = self.engine.strategy_id.trim();
        if strategy.is_empty() || strategy.contains('/') {
            return Err(format!(
                "engine.strategy_id must be a single non-empty path segment (got {:?})",
                self.engine.strategy_id
            ));
        }
        if self.engine.timeout_ms == Some(0) {
            return Err("engine.timeout_ms must be > 0 when set".to_string());
        }
        self.display.label_timezone()?;
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_strategy_id() -> String {
    DEFAULT_STRATEGY_ID.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_subtitle() -> String {
    DEFAULT_SUBTITLE.to_string()
}

fn default_timezone() -> String {
    "local".to_string()
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    config
        .validate()
        .map_err(|err| format!("invalid config {}: {}", path.display(), err))?;
    tracing::debug!(path = %path.display(), endpoint = %config.engine.endpoint(), "config loaded");
    Ok((config, contents))
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
