use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::util::text::{display_width, skip_cells, truncate_to_width};
use crate::view::TaskList;
use crate::view::layout::{RowKind, VisualRow};

use crate::tui::theme::{Theme, blend};

/// Paint the scroll track (content rows then clone rows) starting at the
/// current scroll offset. Terminal rows are whole, so the offset is floored.
pub fn render_board(frame: &mut Frame, list: &TaskList, theme: &Theme, area: Rect) {
    let rows = list.visual_rows();
    let start = list.scroll_offset().max(0.0).floor() as usize;
    let width = area.width as usize;

    let lines: Vec<Line> = rows
        .iter()
        .skip(start)
        .take(area.height as usize)
        .map(|row| row_line(row, theme, width))
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.background));
    frame.render_widget(paragraph, area);
}

/// One visual row as a styled line, faded by its opacity and shifted by its
/// horizontal offset. Scale has no terminal equivalent and is not drawn.
pub(super) fn row_line(row: &VisualRow, theme: &Theme, width: usize) -> Line<'static> {
    let bg = theme.background;
    let fade = |c| blend(c, bg, row.opacity);

    let segments: Vec<(String, Style)> = match &row.kind {
        RowKind::Gap => return Line::default(),
        RowKind::Title(title) => vec![
            (" ".to_string(), Style::default()),
            (
                title.clone(),
                Style::default()
                    .fg(fade(theme.title))
                    .add_modifier(Modifier::BOLD),
            ),
        ],
        RowKind::Task { label, text, class } => {
            let text_style = if class.done {
                Style::default()
                    .fg(fade(theme.done))
                    .add_modifier(Modifier::CROSSED_OUT)
            } else if class.focused {
                Style::default()
                    .fg(fade(theme.focus))
                    .bg(fade(theme.focus_bg))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(fade(theme.text))
            };
            vec![
                ("  ".to_string(), Style::default()),
                (format!("{label} "), Style::default().fg(fade(theme.label))),
                (text.clone(), text_style),
            ]
        }
    };

    let shifted = shift(segments, row.offset_x.round() as i32);

    let mut budget = width;
    let mut spans = Vec::with_capacity(shifted.len());
    for (content, style) in shifted {
        if budget == 0 {
            break;
        }
        let part = truncate_to_width(&content, budget);
        budget = budget.saturating_sub(display_width(&part));
        spans.push(Span::styled(part, style));
    }
    Line::from(spans)
}

/// Positive offsets indent, negative offsets cut leading cells
fn shift(segments: Vec<(String, Style)>, offset: i32) -> Vec<(String, Style)> {
    if offset > 0 {
        let mut out = vec![(" ".repeat(offset as usize), Style::default())];
        out.extend(segments);
        return out;
    }
    let mut cut = offset.unsigned_abs() as usize;
    let mut out = Vec::with_capacity(segments.len());
    for (content, style) in segments {
        if cut == 0 {
            out.push((content, style));
            continue;
        }
        let w = display_width(&content);
        if w <= cut {
            cut -= w;
            continue;
        }
        out.push((skip_cells(&content, cut).to_string(), style));
        cut = 0;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoardConfig, Section, Task, TaskClass};
    use crate::tui::render::test_helpers::*;
    use crate::view::Viewport;
    use std::time::{Duration, Instant};

    fn task_row(text: &str, class: TaskClass, offset_x: f32) -> VisualRow {
        VisualRow {
            kind: RowKind::Task {
                label: "1.".into(),
                text: text.into(),
                class,
            },
            opacity: 1.0,
            offset_x,
            scale: 1.0,
        }
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_board_rows() {
        let list = list_with(&[Section::new("u1", "Ann").with_tasks(vec![
            Task::new("dinner"),
            Task {
                text: "dishes".into(),
                done: true,
                focused: false,
            },
        ])]);
        let theme = Theme::default();
        let out = render_to_string(20, 4, |frame, area| {
            render_board(frame, &list, &theme, area)
        });
        assert_eq!(out, " Ann\n  1. dinner\n  2. dishes");
    }

    #[test]
    fn test_done_is_crossed_out_and_focus_highlighted() {
        let theme = Theme::default();
        let done = row_line(
            &task_row("x", TaskClass { done: true, focused: false }, 0.0),
            &theme,
            20,
        );
        assert!(done.spans[2].style.add_modifier.contains(Modifier::CROSSED_OUT));

        let focused = row_line(
            &task_row("x", TaskClass { done: false, focused: true }, 0.0),
            &theme,
            20,
        );
        assert_eq!(focused.spans[2].style.fg, Some(theme.focus));
        assert_eq!(focused.spans[2].style.bg, Some(theme.focus_bg));
    }

    #[test]
    fn test_offset_and_truncation() {
        let theme = Theme::default();
        let left = row_line(&task_row("abc", TaskClass::default(), -2.0), &theme, 20);
        assert_eq!(plain(&left), "1. abc");
        let right = row_line(&task_row("abc", TaskClass::default(), 1.0), &theme, 20);
        assert_eq!(plain(&right), "   1. abc");
        let narrow = row_line(&task_row("abcdef", TaskClass::default(), 0.0), &theme, 7);
        assert_eq!(plain(&narrow), "  1. a…");
    }

    #[test]
    fn test_opacity_blends_toward_background() {
        let theme = Theme::default();
        let mut row = task_row("x", TaskClass::default(), 0.0);
        row.opacity = 0.0;
        let line = row_line(&row, &theme, 20);
        assert_eq!(line.spans[2].style.fg, Some(theme.background));
    }

    #[test]
    fn test_scroll_offset_moves_track() {
        let mut config = BoardConfig::default();
        config.animation.enabled = false;
        config.scroll.speed = 10.0;
        let mut list = crate::view::TaskList::new(&config);
        list.set_viewport(Viewport {
            width: 20,
            height: 3,
        });
        list.load(&[Section::new("u1", "Ann").with_tasks(vec![
            Task::new("a"),
            Task::new("b"),
            Task::new("c"),
        ])]);
        let t0 = Instant::now();
        list.frame(t0);
        list.frame(t0 + Duration::from_millis(100));

        let theme = Theme::default();
        let out = render_to_string(20, 3, |frame, area| {
            render_board(frame, &list, &theme, area)
        });
        assert_eq!(out, "  1. a\n  2. b\n  3. c");
    }
}
