use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("could not open log file {path}: {source}")]
    OpenError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("logger already installed: {0}")]
    InstallError(#[from] log::SetLoggerError),
}

/// Send logs to `path` (appending), filtered by `RUST_LOG` with `info` as
/// the default. The terminal belongs to the board, so without a path no
/// logger is installed and every record is dropped.
pub fn init(path: Option<&Path>) -> Result<(), LogError> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LogError::OpenError {
            path: path.to_path_buf(),
            source: e,
        })?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    log::info!("taskboard v{} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(())
}
