use std::ffi::OsString;
use std::path::Path;
use std::sync::mpsc::Sender;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::source::SourceEvent;

/// Watches the snapshot file and reports changes on the source channel.
/// Dropping it stops the watch.
pub struct SnapshotWatcher {
    _watcher: RecommendedWatcher,
}

impl SnapshotWatcher {
    /// Watch `snapshot`. The parent directory is watched so that editors
    /// and tools replacing the file by rename are still seen.
    pub fn start(snapshot: &Path, tx: Sender<SourceEvent>) -> Result<Self, notify::Error> {
        let dir = match snapshot.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        let name: Option<OsString> = snapshot.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        let _ = tx.send(SourceEvent::WatchError(e.to_string()));
                        return;
                    }
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) => {}
                    _ => return,
                }

                let relevant = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == name);
                if relevant {
                    let _ = tx.send(SourceEvent::SnapshotChanged);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        log::debug!("watching {}", snapshot.display());
        Ok(SnapshotWatcher { _watcher: watcher })
    }
}
