//! Trace events emitted by the engine
//!
//! The engine never prints or waits on its own. Before each statement it
//! hands a [`TraceEvent`] to the [`TraceSink`] the caller passed in; console
//! output, step pausing and history recording are all sinks.

use crate::interpreter::errors::RuntimeError;
use crate::memory::RegisterBank;
use crate::parser::ast::Statement;

/// Machine state immediately before a statement is performed
#[derive(Debug, Clone, Copy)]
pub struct TraceEvent<'a> {
    /// Zero-based index of the statement in this run
    pub step: u64,
    pub label: &'a str,
    /// Source line of the statement's definition
    pub line: usize,
    pub statement: &'a Statement,
    pub registers: &'a RegisterBank,
}

/// Receiver of per-step trace events
pub trait TraceSink {
    /// Called once per statement, before it is performed.
    ///
    /// Returning an error aborts the run with that error.
    fn on_step(&mut self, event: &TraceEvent<'_>) -> Result<(), RuntimeError>;
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn on_step(&mut self, _event: &TraceEvent<'_>) -> Result<(), RuntimeError> {
        Ok(())
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn on_step(&mut self, event: &TraceEvent<'_>) -> Result<(), RuntimeError> {
        (**self).on_step(event)
    }
}
