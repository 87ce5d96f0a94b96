//! Plain-text state reporter
//!
//! Renders the machine the way the classic RodRego console runner does:
//!
//! ```text
//! [[ now on line: A ]]
//! register 0 = 1
//! performing: INC register 0 and GOTO B
//! ```
//!
//! With a pause input attached, the reporter also waits for a line of input
//! after each statement. Waiting happens inside the sink, so it cannot affect
//! machine state.

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::trace::{TraceEvent, TraceSink};
use crate::memory::RegisterBank;
use crate::parser::ast::Statement;
use std::io::{BufRead, Write};

/// Header printed before the final register listing
pub const FINAL_STATE_HEADER: &str = "*** Final state of the world ***";

/// Trace sink that prints every step
///
/// In step mode it waits for a line of input after every statement except END.
pub struct ConsoleReporter<W: Write, R: BufRead> {
    out: W,
    pause: Option<R>,
    quiet: bool,
}

impl<W: Write, R: BufRead> ConsoleReporter<W, R> {
    /// Reporter printing each step to `out`
    pub fn new(out: W) -> Self {
        ConsoleReporter {
            out,
            pause: None,
            quiet: false,
        }
    }

    /// Wait for a line on `input` after each printed step
    pub fn with_pause(mut self, input: R) -> Self {
        self.pause = Some(input);
        self
    }

    /// Suppress per-step output (final state is still printed)
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Print the final register listing
    pub fn finish(&mut self, registers: &RegisterBank) -> std::io::Result<()> {
        writeln!(self.out, "{}", FINAL_STATE_HEADER)?;
        write!(self.out, "{}", registers)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, R: BufRead> TraceSink for ConsoleReporter<W, R> {
    fn on_step(&mut self, event: &TraceEvent<'_>) -> Result<(), RuntimeError> {
        if self.quiet {
            return Ok(());
        }

        writeln!(self.out, "[[ now on line: {} ]]", event.label)?;
        write!(self.out, "{}", event.registers)?;
        writeln!(self.out, "performing: {}", event.statement)?;

        // END stops the machine, so there is nothing to wait for
        if matches!(event.statement, Statement::End) {
            return Ok(());
        }

        if let Some(input) = self.pause.as_mut() {
            writeln!(self.out, "ENTER to continue...")?;
            self.out.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
        }
        Ok(())
    }
}
