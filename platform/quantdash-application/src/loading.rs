use quantdash_domain::entities::backtest_result::BacktestResult;
use quantdash_domain::errors::LoadError;
use std::sync::Arc;

pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to load backtest";

/// Lifecycle of one activation of the dashboard.
///
/// Starts in `Loading` and settles exactly once.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Error(String),
    Loaded(Arc<BacktestResult>),
}

impl LoadState {
    pub fn new() -> Self {
        Self::Loading
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// Applies a fetch outcome. Only the first call after `Loading` has any
    /// effect; later outcomes are dropped and `false` is returned.
    pub fn settle(&mut self, outcome: Result<BacktestResult, LoadError>) -> bool {
        if self.is_terminal() {
            return false;
        }
        *self = match outcome {
            Ok(result) => Self::Loaded(Arc::new(result)),
            Err(err) => Self::Error(error_message(&err)),
        };
        true
    }

    pub fn result(&self) -> Option<&Arc<BacktestResult>> {
        match self {
            Self::Loaded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error(_) => "error",
            Self::Loaded(_) => "loaded",
        }
    }
}

/// The error's own description, or the generic fallback when the failure
/// carries no detail.
pub fn error_message(err: &LoadError) -> String {
    match err {
        LoadError::Transport(detail) | LoadError::Parse(detail) if detail.trim().is_empty() => {
            FALLBACK_ERROR_MESSAGE.to_string()
        }
        _ => err.to_string(),
    }
}
