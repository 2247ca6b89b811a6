//! Screen layout: log pane, status line, command input

use crate::app::App;
use crate::theme::Theme;
use console_engine::{ConsoleHost, SessionState};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the whole screen, returns the number of log rows that fit
pub fn render<H: ConsoleHost>(app: &App<H>, theme: &Theme, f: &mut Frame) -> usize {
    let [log_area, status_area, input_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let rows = render_log(app, theme, log_area, f);
    render_status(app, theme, status_area, f);
    render_input(app, theme, input_area, f);
    rows
}

fn render_log<H: ConsoleHost>(app: &App<H>, theme: &Theme, area: Rect, f: &mut Frame) -> usize {
    let block = Block::default()
        .title(title(app.scroll_offset()))
        .borders(Borders::ALL)
        .border_style(theme.panel_border())
        .title_style(theme.panel_title());

    let available_height = area.height.saturating_sub(2) as usize; // -2 for borders

    let lines: Vec<Line> = app
        .visible_lines(available_height)
        .map(|line| Line::styled(line.display_text.as_str(), theme.log_line(line.severity)))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.panel_background());
    f.render_widget(paragraph, area);

    available_height
}

fn title(scroll_offset: usize) -> String {
    if scroll_offset > 0 {
        format!(" Console - ↓{} (End to follow) ", scroll_offset)
    } else {
        " Console ".to_string()
    }
}

fn render_status<H: ConsoleHost>(app: &App<H>, theme: &Theme, area: Rect, f: &mut Frame) {
    let mut spans = vec![Span::styled(
        format!(
            " {} | {} lines | {} ",
            state_label(app.state()),
            app.line_count(),
            if app.is_following() { "following" } else { "paused" }
        ),
        theme.status_bar(),
    )];

    if let Some(message) = app.status() {
        spans.push(Span::styled(format!(" {} ", message), theme.status_message()));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(theme.status_bar()),
        area,
    );
}

fn render_input<H: ConsoleHost>(app: &App<H>, theme: &Theme, area: Rect, f: &mut Frame) {
    let prompt = "> ";
    let line = Line::from(vec![
        Span::styled(prompt, theme.input_prompt()),
        Span::raw(app.input.as_str()),
    ]);
    f.render_widget(Paragraph::new(line), area);

    let column = cursor_column(area, prompt.len() + app.input.chars().count());
    f.set_cursor_position(Position::new(column, area.y));
}

/// Column after `width` characters, clamped to the last column of `area`
fn cursor_column(area: Rect, width: usize) -> u16 {
    let offset = u16::try_from(width).unwrap_or(u16::MAX);
    area.x
        .saturating_add(offset)
        .min(area.right().saturating_sub(1))
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "offline (F5 to retry)",
        SessionState::Replaying => "connecting",
        SessionState::Live => "live",
        SessionState::Closed => "closed",
    }
}
