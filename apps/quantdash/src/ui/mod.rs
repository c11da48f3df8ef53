mod equity_chart;
mod metrics_panel;

use crate::app::App;
use quantdash_application::dashboard::{DashboardModel, Screen};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tracing::Level;

const LOG_PANE_HEIGHT: u16 = 8;

pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let log_height = if app.show_logs { LOG_PANE_HEIGHT } else { 0 };
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(log_height),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(size);

    draw_header(frame, outer[0], app);
    draw_body(frame, outer[1], app);
    if app.show_logs {
        draw_logs(frame, outer[2], app);
    }
    draw_footer(frame, outer[3]);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::from(Span::styled(
            app.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.subtitle.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_body(frame: &mut Frame, area: Rect, app: &App) {
    match app.dashboard.screen() {
        Screen::Loading => draw_loading(frame, area, app),
        Screen::Error(msg) => draw_error(frame, area, msg),
        Screen::Loaded(model) => draw_loaded(frame, area, app, model),
    }
}

fn draw_loading(frame: &mut Frame, area: Rect, app: &App) {
    let text = format!("Loading backtest… {}", app.spinner_char());
    frame.render_widget(
        Paragraph::new(Line::from(text))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_error(frame: &mut Frame, area: Rect, msg: &str) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("Error: {msg}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_loaded(frame: &mut Frame, area: Rect, app: &App, model: &DashboardModel) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(area);

    equity_chart::draw(frame, chunks[0], &model.chart, app.cursor);
    metrics_panel::draw(frame, chunks[1], &model.metrics);
}

fn draw_logs(frame: &mut Frame, area: Rect, app: &App) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let (lines, warnings) = {
        let store = app.logs.lock();
        (store.tail(max_lines), store.warnings())
    };
    let text: Vec<Line> = lines
        .into_iter()
        .map(|line| {
            let style = match line.level {
                Some(Level::ERROR) => Style::default().fg(Color::Red),
                Some(Level::WARN) => Style::default().fg(Color::Yellow),
                Some(Level::DEBUG) | Some(Level::TRACE) => Style::default().fg(Color::DarkGray),
                _ => Style::default(),
            };
            Line::from(Span::styled(line.text, style))
        })
        .collect();
    let title = match warnings {
        0 => "Logs".to_string(),
        1 => "Logs (1 warning)".to_string(),
        n => format!("Logs ({n} warnings)"),
    };
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().title(title).borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "←/→ move  PgUp/PgDn jump  Home/End ends  l logs  q quit",
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}
