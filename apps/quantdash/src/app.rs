use crate::logging::SharedLogStore;
use crate::tasks::{ResultLoader, TaskEvent};
use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use quantdash_application::chart::ChartCursor;
use quantdash_application::config::Config;
use quantdash_application::dashboard::Dashboard;
use quantdash_application::series::LabelTimezone;
use quantdash_domain::entities::backtest_result::BacktestResult;
use quantdash_domain::errors::LoadError;

const PAGE_STEP: usize = 10;

pub struct App {
    pub title: String,
    pub subtitle: String,
    pub endpoint: String,
    pub dashboard: Dashboard,
    pub cursor: ChartCursor,
    pub loader: ResultLoader,
    pub logs: SharedLogStore,
    pub show_logs: bool,
    pub dirty: bool,
    spinner: usize,
}

impl App {
    pub fn new(
        config: &Config,
        timezone: LabelTimezone,
        logs: SharedLogStore,
        loader: ResultLoader,
    ) -> Self {
        Self {
            title: config.display.title.clone(),
            subtitle: config.display.subtitle.clone(),
            endpoint: config.engine.endpoint(),
            dashboard: Dashboard::new(timezone),
            cursor: ChartCursor::default(),
            loader,
            logs,
            show_logs: false,
            dirty: true,
            spinner: 0,
        }
    }

    /// Mounts the dashboard: starts its one fetch.
    pub fn activate(&mut self) {
        if self.loader.activate() {
            self.dirty = true;
        }
    }

    /// Unmounts the dashboard; anything still in flight is discarded.
    pub fn teardown(&mut self) {
        self.loader.deactivate();
    }

    pub fn spawn_input_reader(&self, tx: tokio::sync::mpsc::UnboundedSender<TaskEvent>) {
        std::thread::spawn(move || {
            while let Ok(event) = crossterm::event::read() {
                if tx.send(TaskEvent::Input(event)).is_err() {
                    break;
                }
            }
        });
    }

    pub fn on_tick(&mut self) {
        if self.dashboard.state().is_loading() {
            self.spinner = (self.spinner + 1) % 4;
            self.dirty = true;
        }
    }

    /// Returns `Ok(true)` when the app should exit.
    pub fn on_event(&mut self, event: TaskEvent) -> Result<bool, String> {
        match event {
            TaskEvent::Input(ct) => self.on_input(ct),
            TaskEvent::FetchFinished(outcome) => {
                self.on_fetch_finished(outcome);
                Ok(false)
            }
        }
    }

    fn on_fetch_finished(&mut self, outcome: Result<BacktestResult, LoadError>) {
        if !self.loader.is_active() {
            tracing::debug!("ignoring backtest result for an inactive view");
            return;
        }
        if !self.dashboard.apply(outcome) {
            return;
        }

        let state = self.dashboard.state();
        metrics::counter!("quantdash.app.load_settled_total", "state" => state.label())
            .increment(1);
        let strategy_id = self.loader.strategy_id();
        match state.error() {
            Some(err) => tracing::warn!(
                strategy_id = %strategy_id,
                endpoint = %self.endpoint,
                error = %err,
                "backtest load failed"
            ),
            None => tracing::info!(
                strategy_id = %strategy_id,
                endpoint = %self.endpoint,
                "backtest loaded"
            ),
        }
        let len = self.dashboard.model().map(|m| m.chart.len()).unwrap_or(0);
        self.cursor = ChartCursor::for_len(len);
        self.dirty = true;
    }

    fn on_input(&mut self, event: CtEvent) -> Result<bool, String> {
        match event {
            CtEvent::Key(key) if key.kind != KeyEventKind::Release => self.on_key(key),
            CtEvent::Resize(_, _) => {
                self.dirty = true;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<bool, String> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        let len = self.dashboard.model().map(|m| m.chart.len()).unwrap_or(0);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('l') => self.show_logs = !self.show_logs,
            KeyCode::Left => self.cursor.left(1),
            KeyCode::Right => self.cursor.right(1, len),
            KeyCode::PageUp => self.cursor.left(PAGE_STEP),
            KeyCode::PageDown => self.cursor.right(PAGE_STEP, len),
            KeyCode::Home => self.cursor.first(),
            KeyCode::End => self.cursor.last(len),
            _ => return Ok(false),
        }
        self.dirty = true;
        Ok(false)
    }

    pub fn spinner_char(&self) -> char {
        match self.spinner {
            0 => '|',
            1 => '/',
            2 => '-',
            _ => '\\',
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::App;
    use crate::logging::LogStore;
    use crate::tasks::{ResultLoader, SharedSource, TaskEvent};
    use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};
    use quantdash_application::config::Config;
    use quantdash_application::dashboard::Screen;
    use quantdash_application::series::LabelTimezone;
    use quantdash_domain::entities::backtest_result::BacktestResult;
    use quantdash_domain::errors::LoadError;
    use quantdash_domain::repositories::backtest_results::BacktestResultSource;
    use quantdash_domain::value_objects::equity_point::EquityPoint;
    use quantdash_domain::value_objects::metrics::Metrics;
    use std::sync::Arc;
    use std::time::Duration;

    pub(crate) fn scenario_a() -> BacktestResult {
        BacktestResult {
            equity_curve: vec![
                EquityPoint::new("2024-01-01T00:00:00Z", 10000.0),
                EquityPoint::new("2024-01-02T00:00:00Z", 10250.5),
            ],
            metrics: Metrics {
                total_return: 0.125,
                cagr: 0.48,
                max_drawdown: -0.08,
                sharpe: 1.75,
                sortino: 2.1,
            },
        }
    }

    /// Answers every fetch with a fixed outcome.
    pub(crate) struct FixedSource(pub Result<BacktestResult, LoadError>);

    impl BacktestResultSource for FixedSource {
        fn fetch_result(&self, _strategy_id: &str) -> Result<BacktestResult, LoadError> {
            self.0.clone()
        }
    }

    pub(crate) fn make_app(
        outcome: Result<BacktestResult, LoadError>,
    ) -> (App, tokio::sync::mpsc::UnboundedReceiver<TaskEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let source: SharedSource = Arc::new(FixedSource(outcome));
        let loader = ResultLoader::new(tx, source, "momentum".to_string());
        let app = App::new(
            &Config::default(),
            LabelTimezone::Utc,
            Arc::new(parking_lot::Mutex::new(LogStore::new(10))),
            loader,
        );
        (app, rx)
    }

    fn key(code: KeyCode) -> TaskEvent {
        TaskEvent::Input(CtEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    async fn next_event(rx: &mut tokio::sync::mpsc::UnboundedReceiver<TaskEvent>) -> TaskEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event in time")
            .expect("channel open")
    }

    #[tokio::test]
    async fn fetch_result_settles_the_dashboard() {
        let (mut app, mut rx) = make_app(Ok(scenario_a()));
        app.activate();
        assert_eq!(app.dashboard.screen(), Screen::Loading);

        let event = next_event(&mut rx).await;
        app.dirty = false;
        assert!(!app.on_event(event).expect("event"));
        assert!(app.dirty);
        let Screen::Loaded(model) = app.dashboard.screen() else {
            panic!("expected loaded");
        };
        assert_eq!(model.chart.len(), 2);
        assert_eq!(app.cursor.index(), Some(1));
    }

    #[tokio::test]
    async fn server_error_settles_to_error_screen() {
        let (mut app, mut rx) = make_app(Err(LoadError::Status { status: 500 }));
        app.activate();
        let event = next_event(&mut rx).await;
        app.on_event(event).expect("event");
        assert_eq!(app.dashboard.screen(), Screen::Error("HTTP 500"));
        assert!(app.dashboard.model().is_none());
        assert_eq!(app.cursor.index(), None);
    }

    #[tokio::test]
    async fn results_after_teardown_are_ignored() {
        let (mut app, mut rx) = make_app(Ok(scenario_a()));
        app.activate();
        let event = next_event(&mut rx).await;
        app.teardown();
        app.on_event(event).expect("event");
        assert_eq!(app.dashboard.screen(), Screen::Loading);
    }

    #[test]
    fn results_without_activation_are_ignored() {
        let (mut app, _rx) = make_app(Ok(scenario_a()));
        app.on_event(TaskEvent::FetchFinished(Ok(scenario_a())))
            .expect("event");
        assert!(app.dashboard.state().is_loading());
    }

    #[test]
    fn quit_keys_and_log_toggle() {
        let (mut app, _rx) = make_app(Ok(scenario_a()));
        assert!(!app.on_event(key(KeyCode::Char('l'))).expect("toggle"));
        assert!(app.show_logs);
        assert!(app.on_event(key(KeyCode::Char('q'))).expect("quit"));
        assert!(app.on_event(key(KeyCode::Esc)).expect("quit"));
        let ctrl_c = TaskEvent::Input(CtEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.on_event(ctrl_c).expect("quit"));
    }

    #[test]
    fn spinner_turns_while_loading() {
        let (mut app, _rx) = make_app(Ok(scenario_a()));
        let before = app.spinner_char();
        app.on_tick();
        assert_ne!(app.spinner_char(), before);
    }
}
