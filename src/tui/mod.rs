pub mod app;
pub mod banner;
pub mod render;
pub mod theme;

pub use app::run;
