mod app;
pub mod headless;
pub mod logging;
mod tasks;
mod ui;

use crate::app::App;
use crate::tasks::{ResultLoader, SharedSource};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use quantdash_application::config::Config;
use quantdash_infrastructure::http::HttpBacktestSource;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct TuiOpts {
    pub config: Config,
    pub log_store: logging::SharedLogStore,
}

pub fn run(opts: TuiOpts) -> Result<(), String> {
    let source: SharedSource = Arc::new(HttpBacktestSource::new(
        opts.config.engine.base_url.clone(),
        opts.config.engine.timeout_ms,
    )?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(|err| format!("failed to init tokio runtime: {err}"))?;
    let result = runtime.block_on(run_async(opts, source.clone()));
    // A fetch against a hung engine has no timeout by default; don't wait on it.
    runtime.shutdown_background();
    // The blocking HTTP client must not be dropped from inside the runtime.
    drop(source);
    result
}

/// Raw mode plus alternate screen for as long as it lives. Dropping it
/// restores the terminal on every exit path, including a draw error.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self, String> {
        enable_raw_mode().map_err(|err| format!("failed to enable raw mode: {err}"))?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            Clear(ClearType::All)
        ) {
            let _ = disable_raw_mode();
            return Err(format!("failed to enter alternate screen: {err}"));
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
                let _ = disable_raw_mode();
                return Err(format!("failed to init terminal: {err}"));
            }
        };
        // From here on `Drop` undoes the setup.
        let mut session = Self { terminal };
        session
            .terminal
            .hide_cursor()
            .map_err(|err| format!("failed to hide cursor: {err}"))?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = disable_raw_mode();
        let _ = self.terminal.show_cursor();
    }
}

async fn run_async(opts: TuiOpts, source: SharedSource) -> Result<(), String> {
    let mut session = TerminalSession::enter()?;
    run_loop(&mut session.terminal, opts, source).await
}

async fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    opts: TuiOpts,
    source: SharedSource,
) -> Result<(), String> {
    let timezone = opts.config.display.label_timezone()?;
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    let loader = ResultLoader::new(
        event_tx.clone(),
        source,
        opts.config.engine.strategy_id.clone(),
    );
    let mut app = App::new(&opts.config, timezone, opts.log_store, loader);

    app.spawn_input_reader(event_tx);
    app.activate();

    let mut tick = tokio::time::interval(Duration::from_millis(33));

    loop {
        if app.dirty {
            terminal
                .draw(|frame| ui::draw(frame, &app))
                .map_err(|err| format!("terminal draw failed: {err}"))?;
            app.dirty = false;
        }

        tokio::select! {
            _ = tick.tick() => {
                app.on_tick();
            }
            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else { return Ok(()); };
                if app.on_event(event)? { return Ok(()); }
            }
        }
    }
}
