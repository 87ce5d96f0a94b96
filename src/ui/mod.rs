//! Terminal step viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]** — application state, keyboard event loop, pane focus, lazy
//!   execution and history navigation
//! - **[`panes`]** — stateless render functions for the program, trace,
//!   registers and status bar
//! - **[`theme`]** — color palette shared by all panes
//!
//! Construct an [`App`] with an [`Interpreter`] and call [`App::run`].
//!
//! [`Interpreter`]: crate::interpreter::engine::Interpreter
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
