pub mod banner_overlay;
pub mod board_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Rows reserved below the board
pub const STATUS_ROWS: u16 = 1;

/// Height available to the board in a terminal `total` rows tall
pub fn board_height(total: u16) -> u16 {
    total.saturating_sub(STATUS_ROWS)
}

/// Main render function: board, banner overlay, status row
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(STATUS_ROWS)])
        .split(area);

    board_view::render_board(frame, &app.list, &app.theme, chunks[0]);

    if let Some(banner) = &app.banner
        && let Some(opacity) = banner.opacity(now)
    {
        banner_overlay::render_banner(frame, banner, opacity, &app.theme, chunks[0]);
    }

    status_row::render_status_row(frame, &app.list, &app.theme, chunks[1]);
}
