use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::theme::Theme;
use crate::util::text::display_width;
use crate::view::{ScrollState, TaskList};

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Render the status row (bottom of screen): counts on the left, scroll
/// state on the right
pub fn render_status_row(frame: &mut Frame, list: &TaskList, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let width = area.width as usize;

    let counts = format!(
        " {} \u{00B7} {} \u{00B7} {} done",
        plural(list.section_count(), "section"),
        plural(list.task_count(), "task"),
        list.done_count()
    );
    let mut spans = vec![Span::styled(
        counts.clone(),
        Style::default().fg(theme.status).bg(bg),
    )];

    let hint = match list.scroll_state() {
        ScrollState::Idle => "",
        ScrollState::Scrolling => "scrolling ",
        ScrollState::StoppingWait => "stopping ",
    };
    let content_width = display_width(&counts);
    let hint_width = display_width(hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(theme.status).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
