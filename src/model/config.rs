use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration from taskboard.toml. Every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Marquee speed in rows per second
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Frame deltas at or above this are discarded (tab/terminal resumed)
    #[serde(default = "default_max_frame_delta_ms")]
    pub max_frame_delta_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            speed: default_speed(),
            max_frame_delta_ms: default_max_frame_delta_ms(),
        }
    }
}

impl ScrollConfig {
    /// Speed the marquee actually runs at. A speed that is zero, negative
    /// or not finite would never reach a wrap, so it falls back to the
    /// default.
    pub fn effective_speed(&self) -> f32 {
        if is_valid_speed(self.speed) {
            self.speed
        } else {
            default_speed()
        }
    }

    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// false = reduced capability: every transition is applied immediately
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Enter/exit duration
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Update-highlight pulse duration
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            enabled: true,
            duration_ms: default_duration_ms(),
            highlight_ms: default_highlight_ms(),
        }
    }
}

impl AnimationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Blank rows after each section
    #[serde(default = "default_section_gap")]
    pub section_gap: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            section_gap: default_section_gap(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Focusing a task also clears focus in every other section
    #[serde(default)]
    pub global: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Commands whose `source` differs from this are ignored
    #[serde(default = "default_source_name")]
    pub name: String,
    /// Authoritative snapshot file used for full resyncs
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
    /// JSON-lines command stream: "-" for stdin, otherwise a file path
    #[serde(default = "default_commands")]
    pub commands: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            name: default_source_name(),
            snapshot: None,
            commands: default_commands(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the connection banner stays up before fading
    #[serde(default = "default_banner_secs")]
    pub banner_secs: u64,
    /// Color overrides, e.g. `background = "#0C001B"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            banner_secs: default_banner_secs(),
            colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file. The terminal belongs to the UI, so without one nothing is logged.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

/// Marquee speeds must be positive and finite
pub fn is_valid_speed(speed: f32) -> bool {
    speed.is_finite() && speed > 0.0
}

fn default_speed() -> f32 {
    2.0
}

fn default_max_frame_delta_ms() -> u64 {
    200
}

fn default_duration_ms() -> u64 {
    400
}

fn default_highlight_ms() -> u64 {
    250
}

fn default_section_gap() -> u16 {
    1
}

fn default_source_name() -> String {
    "rython-task-bot".to_string()
}

fn default_commands() -> String {
    "-".to_string()
}

fn default_banner_secs() -> u64 {
    5
}
