use quantdash_application::chart::{ChartCursor, ChartModel};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

/// Line chart over the point index. The x axis carries no labels; the
/// cursor row underneath stands in for the hover tooltip.
pub(super) fn draw(frame: &mut Frame, area: Rect, chart: &ChartModel, cursor: ChartCursor) {
    let block = Block::default()
        .title(format!("Equity Curve ({} points)", chart.len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(inner);

    let (x_min, x_max) = chart.x_bounds();
    let (y_min, y_max) = chart.y_bounds();
    let cursor_point: Vec<(f64, f64)> = cursor
        .index()
        .and_then(|idx| chart.point(idx))
        .into_iter()
        .collect();

    let mut datasets = vec![Dataset::default()
        .name("equity")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(chart.points())];
    if !cursor_point.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Yellow))
                .data(&cursor_point),
        );
    }

    let widget = Chart::new(datasets)
        .x_axis(Axis::default().bounds([x_min, x_max]))
        .y_axis(
            Axis::default()
                .bounds([y_min, y_max])
                .labels(chart.y_axis_labels().map(Line::from).to_vec()),
        );
    frame.render_widget(widget, rows[0]);

    let tooltip = match cursor.index().and_then(|idx| chart.tooltip(idx)) {
        Some(tip) => Line::from(vec![
            Span::styled(tip.label, Style::default().fg(Color::Gray)),
            Span::raw("  equity "),
            Span::styled(tip.value, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        None => Line::from(Span::styled(
            "no data points",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(tooltip), rows[1]);
}
