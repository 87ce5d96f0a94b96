//! # Introduction
//!
//! rodrego runs programs for the RodRego register machine, a Minsky machine
//! with three instructions:
//!
//! - `INC r next`: add one to register `r`, continue at `next`
//! - `DEB r next else`: if `r` is zero continue at `else`, otherwise
//!   subtract one and continue at `next`
//! - `END`: halt
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Line normalization → Parser → Program → Interpreter → Trace sink
//! ```
//!
//! 1. [`parser`] — normalizes newlines and loads programs and register files.
//! 2. [`interpreter`] — runs the program, emitting a [`interpreter::TraceEvent`]
//!    before each statement to a caller-supplied [`interpreter::TraceSink`].
//! 3. [`memory`] — the [`memory::RegisterBank`].
//! 4. [`report`] — plain-text console trace, optionally pausing per step.
//! 5. [`snapshot`] — bounded history of trace events for the step viewer.
//! 6. [`cli`] — command-line configuration and run orchestration.
//! 7. [`ui`] — ratatui step viewer; not part of the stable library API.

pub mod cli;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod report;
pub mod snapshot;
pub mod ui;
