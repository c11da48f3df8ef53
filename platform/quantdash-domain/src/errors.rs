use thiserror::Error;

/// Why a backtest result could not be loaded.
///
/// `Transport` and `Status` both belong to the transport class (the request
/// never produced a usable body); `Parse` means the body arrived but does not
/// describe a backtest result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("invalid backtest result: {0}")]
    Parse(String),
}

impl LoadError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// Short label used for log fields and metric tags.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "http_status",
            Self::Parse(_) => "parse",
        }
    }
}
