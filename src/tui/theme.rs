use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the board
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub title: Color,
    pub label: Color,
    pub done: Color,
    pub focus: Color,
    pub focus_bg: Color,
    pub status: Color,
    pub banner_bg: Color,
    pub banner_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            title: Color::Rgb(0xFF, 0xFF, 0xFF),
            label: Color::Rgb(0x7D, 0x78, 0xBF),
            done: Color::Rgb(0x7D, 0x78, 0xBF),
            focus: Color::Rgb(0xFB, 0x41, 0x96),
            focus_bg: Color::Rgb(0x3D, 0x14, 0x38),
            status: Color::Rgb(0x7D, 0x78, 0xBF),
            banner_bg: Color::Rgb(0xE5, 0x39, 0x35),
            banner_fg: Color::Rgb(0xFF, 0xFF, 0xFF),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                log::warn!("ignoring invalid color {key} = {value:?}");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "title" => theme.title = color,
                "label" => theme.label = color,
                "done" => theme.done = color,
                "focus" => theme.focus = color,
                "focus_bg" => theme.focus_bg = color,
                "status" => theme.status = color,
                "banner_bg" => theme.banner_bg = color,
                "banner_fg" => theme.banner_fg = color,
                _ => log::warn!("unknown color key {key:?}"),
            }
        }

        theme
    }
}

/// Mix `fg` toward `bg` by `opacity` (1.0 = `fg`, 0.0 = `bg`). Only RGB
/// colors can be blended; anything else snaps at half opacity.
pub fn blend(fg: Color, bg: Color, opacity: f32) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            let mix = |f: u8, b: u8| {
                let (f, b) = (f32::from(f), f32::from(b));
                (b + (f - b) * t).round() as u8
            };
            Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
        }
        _ if t >= 0.5 => fg,
        _ => bg,
    }
}
