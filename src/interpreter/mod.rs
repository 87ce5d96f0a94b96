//! Register machine execution engine
//!
//! - [`engine`]: the [`engine::Interpreter`] that performs INC/DEB/END
//! - [`errors`]: runtime error types
//! - [`trace`]: per-step trace events and the sink trait that receives them
//!
//! # Execution Model
//!
//! Starting from the entry label, the interpreter looks up the statement at
//! the current label, emits a trace event describing the state before it,
//! performs it and moves to the next label. The run ends at an END statement
//! or at the first runtime error.

pub mod engine;
pub mod errors;
pub mod trace;

pub use engine::{Interpreter, StepOutcome};
pub use errors::RuntimeError;
pub use trace::{NullSink, TraceEvent, TraceSink};
