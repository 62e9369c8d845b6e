use std::path::PathBuf;

use clap::Parser;

use crate::model::{BoardConfig, is_valid_speed};

#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - live per-user task board"),
    version
)]
pub struct Cli {
    /// Config file
    #[arg(short, long, default_value = "taskboard.toml")]
    pub config: PathBuf,

    /// Snapshot file used for full resyncs (overrides [source] snapshot)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Command stream: "-" for stdin, otherwise a file (overrides [source] commands)
    #[arg(long)]
    pub commands: Option<String>,

    /// Apply every change immediately
    #[arg(long)]
    pub no_animation: bool,

    /// Marquee speed in rows per second
    #[arg(long, value_parser = parse_speed)]
    pub speed: Option<f32>,

    /// Write logs to this file (overrides [log] file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold command line overrides into the loaded config
    pub fn apply_overrides(&self, config: &mut BoardConfig) {
        if let Some(snapshot) = &self.snapshot {
            config.source.snapshot = Some(snapshot.clone());
        }
        if let Some(commands) = &self.commands {
            config.source.commands = commands.clone();
        }
        if self.no_animation {
            config.animation.enabled = false;
        }
        if let Some(speed) = self.speed {
            config.scroll.speed = speed;
        }
        if let Some(log_file) = &self.log_file {
            config.log.file = Some(log_file.clone());
        }
    }
}

fn parse_speed(s: &str) -> Result<f32, String> {
    let speed: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if is_valid_speed(speed) {
        Ok(speed)
    } else {
        Err(format!("speed must be a positive number, got {speed}"))
    }
}
