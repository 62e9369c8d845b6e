pub mod config_io;
pub mod snapshot_io;
pub mod source;
pub mod watcher;
