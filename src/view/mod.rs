//! The rendering engine: a retained render tree kept in sync with the model
//! by a pure differ, transitions correlated with the patches, and the
//! marquee scroller.

pub mod animator;
pub mod diff;
pub mod easing;
pub mod layout;
pub mod marquee;
pub mod patcher;
pub mod task_list;
pub mod tree;

pub use marquee::ScrollState;
pub use task_list::{TaskList, Viewport};
