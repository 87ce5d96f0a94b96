// Execution engine for the register machine

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::trace::{TraceEvent, TraceSink};
use crate::memory::{Decrement, RegisterBank};
use crate::parser::ast::{Label, Program, Statement};
use log::{debug, info};

/// Result of performing one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Control moved to another label
    Continue,
    /// An END statement was performed; the machine is stopped
    Halted,
}

/// The interpreter that runs a loaded program
///
/// State is the current label plus the register bank. Label references are
/// resolved only when control reaches them, so a program with a dangling
/// branch runs fine until that branch is taken.
pub struct Interpreter {
    /// Loaded program (label table and entry label)
    program: Program,

    /// Register bank, mutated by INC and DEB
    registers: RegisterBank,

    /// Label of the statement about to be performed
    current: Label,

    /// Label that transferred control to `current`
    previous: Option<Label>,

    /// Number of statements performed so far
    steps: u64,

    /// Whether an END has been performed
    halted: bool,
}

impl Interpreter {
    /// Create an interpreter positioned at the program's entry label
    pub fn new(program: Program, registers: RegisterBank) -> Self {
        let current = program.entry().to_string();
        Interpreter {
            program,
            registers,
            current,
            previous: None,
            steps: 0,
            halted: false,
        }
    }

    /// Run until an END is performed, emitting a trace event before every
    /// statement. Returns the number of statements performed.
    ///
    /// There is no step limit: a program that never reaches END never
    /// returns.
    pub fn run<S: TraceSink>(&mut self, mut sink: S) -> Result<u64, RuntimeError> {
        while self.step_traced(&mut sink)? == StepOutcome::Continue {}
        Ok(self.steps)
    }

    /// Emit the trace event for the pending statement, then perform it
    pub fn step_traced<S: TraceSink>(&mut self, mut sink: S) -> Result<StepOutcome, RuntimeError> {
        if self.halted {
            return Ok(StepOutcome::Halted);
        }

        let event = self.peek()?;
        sink.on_step(&event)?;
        self.step()
    }

    /// Trace event describing the statement about to be performed
    pub fn peek(&self) -> Result<TraceEvent<'_>, RuntimeError> {
        let definition = self
            .program
            .definition(&self.current)
            .ok_or_else(|| self.unknown_label())?;

        Ok(TraceEvent {
            step: self.steps,
            label: &self.current,
            line: definition.line,
            statement: &definition.statement,
            registers: &self.registers,
        })
    }

    /// Perform the statement at the current label without emitting a trace
    /// event. Stepping a halted machine does nothing.
    pub fn step(&mut self) -> Result<StepOutcome, RuntimeError> {
        if self.halted {
            return Ok(StepOutcome::Halted);
        }

        let definition = self
            .program
            .definition(&self.current)
            .ok_or_else(|| self.unknown_label())?;

        let statement = &definition.statement;
        debug!("step {}: [{}] {}", self.steps, self.current, statement);

        let next = match statement {
            Statement::Inc { target, branch } => {
                if self.registers.increment(*target).is_none() {
                    return Err(RuntimeError::RegisterOverflow {
                        label: self.current.clone(),
                        register: *target,
                    });
                }
                branch.clone()
            }
            Statement::Deb {
                target,
                branch,
                else_branch,
            } => match self.registers.decrement(*target) {
                Decrement::Decremented => branch.clone(),
                Decrement::WasZero => else_branch.clone(),
            },
            Statement::End => {
                self.steps += 1;
                self.halted = true;
                info!("halted at '{}' after {} step(s)", self.current, self.steps);
                return Ok(StepOutcome::Halted);
            }
        };

        self.steps += 1;
        self.previous = Some(std::mem::replace(&mut self.current, next));
        Ok(StepOutcome::Continue)
    }

    fn unknown_label(&self) -> RuntimeError {
        RuntimeError::UnknownLabel {
            label: self.current.clone(),
            from: self.previous.clone(),
        }
    }

    // ========== Accessors ==========

    /// Label of the statement about to be performed (or the END label once halted)
    pub fn current_label(&self) -> &str {
        &self.current
    }

    /// Register bank in its current (or last valid) state
    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    /// Consume the interpreter, keeping the register bank
    pub fn into_registers(self) -> RegisterBank {
        self.registers
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Number of statements performed so far, END included
    pub fn steps_executed(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::trace::NullSink;
    use crate::parser::parse::Parser;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn interpreter(source: &str, registers: &str) -> Interpreter {
        init();
        let program = Parser::new(source).parse_program().unwrap();
        let registers = Parser::new(registers).parse_registers().unwrap();
        Interpreter::new(program, registers)
    }

    /// Sink keeping (label, registers) pairs
    #[derive(Default)]
    struct Recorder {
        seen: Vec<(String, RegisterBank)>,
    }

    impl TraceSink for Recorder {
        fn on_step(&mut self, event: &TraceEvent<'_>) -> Result<(), RuntimeError> {
            let label = event.label.to_string();
            self.seen.push((label, event.registers.clone()));
            Ok(())
        }
    }

    #[test]
    fn test_end_alone_halts_immediately() {
        let mut vm = interpreter("S END", "");
        let mut recorder = Recorder::default();

        assert_eq!(vm.run(&mut recorder).unwrap(), 1);
        assert!(vm.is_halted());
        assert!(vm.registers().is_empty());
        assert_eq!(recorder.seen.len(), 1);
        assert_eq!(recorder.seen[0].0, "S");
    }

    #[test]
    fn test_adder() {
        let mut vm = interpreter("A DEB 1 B C\nB INC 0 A\nC END", "0 2\n1 3");
        vm.run(NullSink).unwrap();

        assert_eq!(vm.registers().get(0), 5);
        assert_eq!(vm.registers().get(1), 0);
        // three moves, each DEB + INC, then the failing DEB and END
        assert_eq!(vm.steps_executed(), 8);
        assert_eq!(vm.current_label(), "C");
    }

    #[test]
    fn test_deb_on_zero_takes_else_branch() {
        let mut vm = interpreter("A DEB 4 yes no\nyes END\nno END", "");
        assert_eq!(vm.step().unwrap(), StepOutcome::Continue);
        assert_eq!(vm.current_label(), "no");
        assert_eq!(vm.registers().get(4), 0);
        assert!(vm.registers().is_empty());

        let mut vm = interpreter("A DEB 4 yes no\nyes END\nno END", "4 0");
        vm.step().unwrap();
        assert_eq!(vm.current_label(), "no");
        assert_eq!(vm.registers().get(4), 0);

        let mut vm = interpreter("A DEB 4 yes no\nyes END\nno END", "4 1");
        vm.step().unwrap();
        assert_eq!(vm.current_label(), "yes");
        assert_eq!(vm.registers().get(4), 0);
    }

    #[test]
    fn test_trace_is_emitted_before_each_statement() {
        let mut vm = interpreter("A INC 0 B\nB INC 0 C\nC END", "");
        let mut recorder = Recorder::default();
        vm.run(&mut recorder).unwrap();

        let labels: Vec<&str> = recorder.seen.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        let values: Vec<u64> = recorder.seen.iter().map(|(_, r)| r.get(0)).collect();
        assert_eq!(values, vec![0, 1, 2]);
    }

    #[test]
    fn test_oscillating_program_never_halts() {
        let mut vm = interpreter("A INC 0 B\nB DEB 0 A END\nEND END", "");

        // Bounded harness: the machine has no step limit of its own
        for i in 0..1000u64 {
            let expected = if i % 2 == 0 { "A" } else { "B" };
            assert_eq!(vm.current_label(), expected);
            assert_eq!(vm.registers().get(0), i % 2);
            assert_eq!(vm.step().unwrap(), StepOutcome::Continue);
        }
        assert!(!vm.is_halted());
    }

    #[test]
    fn test_unknown_label_keeps_last_valid_registers() {
        let mut vm = interpreter("A INC 0 B\nB INC 1 nowhere\nC END", "");
        let err = vm.run(NullSink).unwrap_err();

        match err {
            RuntimeError::UnknownLabel { label, from } => {
                assert_eq!(label, "nowhere");
                assert_eq!(from.as_deref(), Some("B"));
            }
            other => panic!("expected UnknownLabel, got {:?}", other),
        }
        assert_eq!(vm.registers().get(0), 1);
        assert_eq!(vm.registers().get(1), 1);
        assert_eq!(vm.steps_executed(), 2);
        assert!(vm.peek().is_err());
    }

    #[test]
    fn test_unvisited_dangling_label_is_harmless() {
        let mut vm = interpreter("A DEB 0 missing done\ndone END", "");
        assert_eq!(vm.run(NullSink).unwrap(), 2);
    }

    #[test]
    fn test_register_overflow() {
        let mut vm = interpreter("A INC 0 B\nB END", "0 18446744073709551615");
        let err = vm.run(NullSink).unwrap_err();

        assert!(matches!(err, RuntimeError::RegisterOverflow { register: 0, .. }));
        assert_eq!(vm.registers().get(0), u64::MAX);
        assert_eq!(vm.current_label(), "A");
    }

    #[test]
    fn test_halted_machine_stays_halted() {
        let mut vm = interpreter("A INC 0 B\nB END", "");
        vm.run(NullSink).unwrap();
        assert_eq!(vm.steps_executed(), 2);

        assert_eq!(vm.step().unwrap(), StepOutcome::Halted);
        let mut recorder = Recorder::default();
        assert_eq!(vm.step_traced(&mut recorder).unwrap(), StepOutcome::Halted);
        assert!(recorder.seen.is_empty());
        assert_eq!(vm.steps_executed(), 2);
        assert_eq!(vm.into_registers().get(0), 1);
    }

    #[test]
    fn test_sink_error_aborts_run() {
        struct FailAt(u64);

        impl TraceSink for FailAt {
            fn on_step(&mut self, event: &TraceEvent<'_>) -> Result<(), RuntimeError> {
                if event.step == self.0 {
                    return Err(RuntimeError::SnapshotLimitExceeded {
                        current: 0,
                        limit: 0,
                    });
                }
                Ok(())
            }
        }

        let mut vm = interpreter("A INC 0 A", "");
        let err = vm.run(FailAt(3)).unwrap_err();
        assert!(matches!(err, RuntimeError::SnapshotLimitExceeded { .. }));
        assert_eq!(vm.steps_executed(), 3);
        assert_eq!(vm.registers().get(0), 3);
    }

    #[test]
    fn test_peek_reports_line_and_statement() {
        let vm = interpreter("# comment\n\nstart INC 2 start", "");
        let event = vm.peek().unwrap();
        assert_eq!(event.step, 0);
        assert_eq!(event.label, "start");
        assert_eq!(event.line, 3);
        assert!(matches!(event.statement, Statement::Inc { target: 2, .. }));
    }
}
