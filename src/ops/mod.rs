pub mod command;
pub mod snapshot;
