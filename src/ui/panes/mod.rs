//! TUI pane rendering modules
//!
//! - [`source`]: program text with syntax highlighting, current line and
//!   possible branch targets
//! - [`registers`]: register bank with the pending statement's target marked
//! - [`trace`]: statements performed so far
//! - [`status`]: status bar with keybindings and run state
//!
//! Each module exports a stateless `render_*` function; scroll state lives
//! in [`crate::ui::app::App`].

pub mod registers;
pub mod source;
pub mod status;
pub mod trace;

pub use registers::render_registers_pane;
pub use source::render_source_pane;
pub use status::{render_status_bar, RunState};
pub use trace::render_trace_pane;
