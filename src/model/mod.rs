pub mod board;
pub mod config;
pub mod section;
pub mod task;

pub use board::*;
pub use config::*;
pub use section::*;
pub use task::*;
