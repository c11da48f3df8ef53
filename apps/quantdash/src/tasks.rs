use quantdash_domain::entities::backtest_result::BacktestResult;
use quantdash_domain::errors::LoadError;
use quantdash_domain::repositories::backtest_results::BacktestResultSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub type SharedSource = Arc<dyn BacktestResultSource + Send + Sync>;

pub enum TaskEvent {
    Input(crossterm::event::Event),
    FetchFinished(Result<BacktestResult, LoadError>),
}

/// Liveness flag shared between a view activation and its fetch task.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    alive: Arc<AtomicBool>,
}

impl ViewHandle {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn release(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for ViewHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends the outcome only while the view that asked for it is still mounted.
fn deliver(
    handle: &ViewHandle,
    tx: &UnboundedSender<TaskEvent>,
    outcome: Result<BacktestResult, LoadError>,
) -> bool {
    if !handle.is_alive() {
        tracing::debug!("view torn down before fetch completed; dropping result");
        return false;
    }
    tx.send(TaskEvent::FetchFinished(outcome)).is_ok()
}

struct Activation {
    handle: ViewHandle,
    task: JoinHandle<()>,
}

/// Issues the single backtest fetch of a view activation.
pub struct ResultLoader {
    tx: UnboundedSender<TaskEvent>,
    source: SharedSource,
    strategy_id: String,
    active: Option<Activation>,
}

impl ResultLoader {
    pub fn new(tx: UnboundedSender<TaskEvent>, source: SharedSource, strategy_id: String) -> Self {
        Self {
            tx,
            source,
            strategy_id,
            active: None,
        }
    }

    pub fn strategy_id(&self) -> &str {
        &self.strategy_id
    }

    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .map(|activation| activation.handle.is_alive())
            .unwrap_or(false)
    }

    /// Spawns the fetch. Must run inside a tokio runtime. A second call while
    /// active is ignored, so an activation never issues two requests.
    pub fn activate(&mut self) -> bool {
        if self.active.is_some() {
            tracing::warn!(strategy_id = %self.strategy_id, "loader already activated");
            return false;
        }

        let handle = ViewHandle::new();
        let source = self.source.clone();
        let strategy_id = self.strategy_id.clone();
        let tx = self.tx.clone();
        let task_handle = handle.clone();

        tracing::info!(strategy_id = %strategy_id, "fetching backtest result");
        let task = tokio::spawn(async move {
            let blocking_id = strategy_id.clone();
            let outcome =
                match tokio::task::spawn_blocking(move || source.fetch_result(&blocking_id)).await
                {
                    Ok(outcome) => outcome,
                    Err(err) => Err(LoadError::Transport(format!("fetch task failed: {err}"))),
                };
            deliver(&task_handle, &tx, outcome);
        });

        self.active = Some(Activation { handle, task });
        true
    }

    /// Tears the activation down; a response still in flight is discarded.
    pub fn deactivate(&mut self) {
        if let Some(activation) = self.active.take() {
            activation.handle.release();
            activation.task.abort();
            tracing::debug!(strategy_id = %self.strategy_id, "loader deactivated");
        }
    }
}

impl Drop for ResultLoader {
    fn drop(&mut self) {
        self.deactivate();
    }
}
