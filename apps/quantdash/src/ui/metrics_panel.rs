use quantdash_application::formatting::FormattedMetrics;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const CARD_HEIGHT: u16 = 4;
const COLUMNS: usize = 2;

pub(super) fn draw(frame: &mut Frame, area: Rect, metrics: &FormattedMetrics) {
    let block = Block::default()
        .title("Performance Metrics")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = metrics.cards();
    let row_count = cards.len().div_ceil(COLUMNS);
    let mut row_constraints = vec![Constraint::Length(CARD_HEIGHT); row_count];
    row_constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(inner);

    for (row_idx, row_cards) in cards.chunks(COLUMNS).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)].as_ref())
            .split(rows[row_idx]);
        for (col_idx, card) in row_cards.iter().enumerate() {
            let lines = vec![
                Line::from(Span::styled(card.label, Style::default().fg(Color::Gray))),
                Line::from(Span::styled(
                    card.value.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                cols[col_idx],
            );
        }
    }
}
