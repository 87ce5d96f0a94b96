//! Command-line configuration and run orchestration
//!
//! Everything `main` does apart from terminal setup lives here so it can be
//! driven from tests with in-memory output.

use crate::interpreter::engine::Interpreter;
use crate::memory::RegisterBank;
use crate::parser::ast::Program;
use crate::parser::parse::Parser;
use crate::report::ConsoleReporter;
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Default snapshot budget for the step viewer (256 MiB)
pub const DEFAULT_HISTORY_LIMIT: usize = 256 * 1024 * 1024;

/// Header printed before the register listing after a runtime fault
pub const LAST_STATE_HEADER: &str = "*** Last valid state ***";

/// Command-line options.
///
/// Long options take two dashes (`--program`, `--values`, `--step`). The
/// single-dash spellings of the older Go runner are not accepted: `-program`
/// would parse as `-p rogram`.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "rodrego")]
#[command(version)]
#[command(about = "Run INC/DEB/END register machine programs", long_about = None)]
pub struct Config {
    /// Program to execute
    #[arg(short, long, value_name = "FILE")]
    pub program: PathBuf,

    /// Initial register values, one `<register> <value>` pair per line
    #[arg(short = 'r', long, value_name = "FILE")]
    pub values: Option<PathBuf>,

    /// Wait for ENTER after each statement
    #[arg(short, long)]
    pub step: bool,

    /// Only print the final state
    #[arg(short, long, conflicts_with = "step")]
    pub quiet: bool,

    /// Open the interactive step viewer
    #[arg(long, conflicts_with_all = ["step", "quiet"])]
    pub tui: bool,

    /// Memory budget for the step viewer's history, in bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,
}

/// Sources and parsed state for one run
#[derive(Debug, Clone)]
pub struct Loaded {
    pub program_source: String,
    pub program: Program,
    pub registers: RegisterBank,
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Read and parse the program and optional register file
pub fn load(config: &Config) -> Result<Loaded> {
    let program_source = read_source(&config.program)?;
    let program = Parser::new(&program_source)
        .parse_program()
        .with_context(|| format!("failed to load program {}", config.program.display()))?;

    let registers = match &config.values {
        Some(path) => {
            let source = read_source(path)?;
            Parser::new(&source)
                .parse_registers()
                .with_context(|| format!("failed to load registers {}", path.display()))?
        }
        None => RegisterBank::new(),
    };

    Ok(Loaded {
        program_source,
        program,
        registers,
    })
}

/// Summary of a completed console run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub registers: RegisterBank,
}

/// Run to completion, tracing to `out` and reading step pauses from `input`.
///
/// On a runtime fault the last valid register state is still printed before
/// the error is returned.
pub fn run_console<W: Write, R: BufRead>(
    config: &Config,
    program: Program,
    registers: RegisterBank,
    out: W,
    input: R,
) -> Result<RunSummary> {
    let mut reporter = ConsoleReporter::new(out).quiet(config.quiet);
    if config.step {
        reporter = reporter.with_pause(input);
    }

    let mut interpreter = Interpreter::new(program, registers);
    match interpreter.run(&mut reporter) {
        Ok(steps) => {
            reporter.finish(interpreter.registers())?;
            Ok(RunSummary {
                steps,
                registers: interpreter.into_registers(),
            })
        }
        Err(e) => {
            let mut out = reporter.into_inner();
            writeln!(out, "{}", LAST_STATE_HEADER)?;
            write!(out, "{}", interpreter.registers())?;
            out.flush()?;
            let steps = interpreter.steps_executed();
            let context = match e.label() {
                Some(label) => format!("execution stopped at '{}' after {} step(s)", label, steps),
                None => format!("execution stopped after {} step(s)", steps),
            };
            Err(anyhow::Error::new(e).context(context))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;
    use std::io::Cursor;

    #[test]
    fn test_parse_arguments() {
        let args = ["rodrego", "-p", "add.rmp", "-r", "add.regs", "-s"];
        let config = Config::try_parse_from(args).unwrap();
        assert_eq!(config.program, PathBuf::from("add.rmp"));
        assert_eq!(config.values, Some(PathBuf::from("add.regs")));
        assert!(config.step);
        assert!(!config.tui);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_program_is_required() {
        assert!(Config::try_parse_from(["rodrego"]).is_err());
    }

    #[test]
    fn test_single_dash_long_flag_is_short_flag() {
        let config = Config::try_parse_from(["rodrego", "-program"]).unwrap();
        assert_eq!(config.program, PathBuf::from("rogram"));
        let extra = Config::try_parse_from(["rodrego", "-program", "add.rmp"]);
        assert!(extra.is_err());
    }

    #[test]
    fn test_tui_conflicts_with_step() {
        let args = ["rodrego", "-p", "x", "--tui", "--step"];
        assert!(Config::try_parse_from(args).is_err());
    }

    #[test]
    fn test_run_console_reports_fault_state() {
        let args = ["rodrego", "-p", "x", "-q"];
        let config = Config::try_parse_from(args).unwrap();
        let program = Parser::new("A INC 5 gone").parse_program().unwrap();
        let mut out = Vec::new();

        let err = run_console(
            &config,
            program,
            RegisterBank::new(),
            &mut out,
            Cursor::new(""),
        )
        .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("execution stopped at 'gone' after 1 step(s)"));
        assert!(message.contains("unknown label 'gone'"));
        let output = String::from_utf8(out).unwrap();
        assert_eq!(output, "*** Last valid state ***\nregister 5 = 1\n");
    }
}
