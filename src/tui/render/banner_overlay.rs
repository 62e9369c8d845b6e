use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Clear, Paragraph};

use crate::tui::banner::Banner;
use crate::tui::theme::{Theme, blend};
use crate::util::text::{display_width, truncate_to_width};

/// Centered message on the top row of `area`
pub fn render_banner(
    frame: &mut Frame,
    banner: &Banner,
    opacity: f32,
    theme: &Theme,
    area: Rect,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let message = truncate_to_width(&banner.message, area.width.saturating_sub(4) as usize);
    let width = (display_width(&message) as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: 1,
    };

    let style = Style::default()
        .fg(blend(theme.banner_fg, theme.background, opacity))
        .bg(blend(theme.banner_bg, theme.background, opacity))
        .add_modifier(Modifier::BOLD);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(message).alignment(Alignment::Center).style(style),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::render_to_string;
    use std::time::{Duration, Instant};

    #[test]
    fn test_banner_is_centered_on_top_row() {
        let banner = Banner::new("Offline", Instant::now(), Duration::from_secs(5));
        let theme = Theme::default();
        let out = render_to_string(21, 3, |frame, area| {
            render_banner(frame, &banner, 1.0, &theme, area)
        });
        assert_eq!(out, "       Offline");
    }

    #[test]
    fn test_long_banner_is_truncated() {
        let banner = Banner::new(
            "a very long connection message",
            Instant::now(),
            Duration::from_secs(5),
        );
        let theme = Theme::default();
        let out = render_to_string(12, 1, |frame, area| {
            render_banner(frame, &banner, 1.0, &theme, area)
        });
        assert_eq!(out, "  a very …");
    }
}
