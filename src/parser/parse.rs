use crate::memory::RegisterBank;
use crate::parser::ast::{Label, Program, RegisterIndex, Statement};
use crate::parser::lines::SourceText;
use log::{info, warn};
use thiserror::Error;

/// Load-time failure; every variant except `EmptyProgram` names the
/// offending 1-based source line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Wrong number of fields for the construct being parsed
    #[error("line {line}: {construct} expects {expected}, found {found} field(s)")]
    MalformedLine {
        line: usize,
        construct: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// Mnemonic is not one of INC, DEB, END
    #[error("line {line}: unknown instruction '{mnemonic}' (expected INC, DEB or END)")]
    InvalidInstruction { line: usize, mnemonic: String },

    /// Instruction operand is not a natural number
    #[error("line {line}: target register '{token}' must be a natural number")]
    InvalidRegisterReference { line: usize, token: String },

    /// Register file index is not a natural number
    #[error("line {line}: register '{token}' must be referenced with a natural number")]
    InvalidRegisterIndex { line: usize, token: String },

    /// Register file value is not a natural number
    #[error("line {line}: register value '{token}' must be a natural number")]
    InvalidRegisterValue { line: usize, token: String },

    /// Program source holds no statements
    #[error("program contains no statements")]
    EmptyProgram,
}

impl ParseError {
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MalformedLine { line, .. } => Some(*line),
            ParseError::InvalidInstruction { line, .. } => Some(*line),
            ParseError::InvalidRegisterReference { line, .. } => Some(*line),
            ParseError::InvalidRegisterIndex { line, .. } => Some(*line),
            ParseError::InvalidRegisterValue { line, .. } => Some(*line),
            ParseError::EmptyProgram => None,
        }
    }
}

/// Loader for program and register sources
///
/// Newlines are normalized on construction; `parse_program` and
/// `parse_registers` then walk the content lines. The first failing line
/// aborts the load.
pub struct Parser<'a> {
    source: SourceText<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            source: SourceText::new(source),
        }
    }

    /// Parse the source as a program
    pub fn parse_program(&self) -> Result<Program, ParseError> {
        let mut program: Option<Program> = None;

        for (line, text) in self.source.content_lines() {
            let (label, statement) = parse_statement(line, text)?;

            // The first label seen is where execution starts
            let program = program.get_or_insert_with(|| Program::with_entry(label.clone()));

            if let Some(previous) = program.define(label.clone(), statement, line) {
                warn!(
                    "line {}: label '{}' redefined, replacing the definition from line {}",
                    line, label, previous
                );
            }
        }

        let program = program.ok_or(ParseError::EmptyProgram)?;
        info!(
            "loaded {} statement(s), entry label '{}'",
            program.len(),
            program.entry()
        );
        Ok(program)
    }

    /// Parse the source as an initial register assignment
    pub fn parse_registers(&self) -> Result<RegisterBank, ParseError> {
        let mut registers = RegisterBank::new();

        for (line, text) in self.source.content_lines() {
            let fields: Vec<&str> = text.split_whitespace().collect();
            let [index, value] = fields.as_slice() else {
                return Err(ParseError::MalformedLine {
                    line,
                    construct: "register line",
                    expected: "<register number> <register value>",
                    found: fields.len(),
                });
            };

            let index = parse_natural(index).ok_or_else(|| ParseError::InvalidRegisterIndex {
                line,
                token: index.to_string(),
            })?;
            let value = parse_natural(value).ok_or_else(|| ParseError::InvalidRegisterValue {
                line,
                token: value.to_string(),
            })?;

            registers.set(index, value);
        }

        info!("loaded {} initial register value(s)", registers.len());
        Ok(registers)
    }
}

/// Parse one content line into its label and statement
fn parse_statement(line: usize, text: &str) -> Result<(Label, Statement), ParseError> {
    let fields: Vec<&str> = text.split_whitespace().collect();

    let (label, mnemonic, operands) = match fields.as_slice() {
        [label, mnemonic, operands @ ..] => (*label, *mnemonic, operands),
        _ => {
            return Err(ParseError::MalformedLine {
                line,
                construct: "statement",
                expected: "<label> <instruction>",
                found: fields.len(),
            });
        }
    };

    let statement = match mnemonic.to_ascii_lowercase().as_str() {
        "end" => match operands {
            [] => Statement::End,
            _ => return Err(operand_count(line, "END", "no operands", operands)),
        },
        "inc" => match operands {
            [target, branch] => Statement::Inc {
                target: parse_target(line, target)?,
                branch: branch.to_string(),
            },
            _ => {
                return Err(operand_count(line, "INC", "<register> <branch>", operands));
            }
        },
        "deb" => match operands {
            [target, branch, else_branch] => Statement::Deb {
                target: parse_target(line, target)?,
                branch: branch.to_string(),
                else_branch: else_branch.to_string(),
            },
            _ => {
                return Err(operand_count(line, "DEB", "<register> <branch> <else>", operands));
            }
        },
        _ => {
            return Err(ParseError::InvalidInstruction {
                line,
                mnemonic: mnemonic.to_string(),
            });
        }
    };

    Ok((label.to_string(), statement))
}

fn operand_count(
    line: usize,
    construct: &'static str,
    expected: &'static str,
    operands: &[&str],
) -> ParseError {
    ParseError::MalformedLine {
        line,
        construct,
        expected,
        found: operands.len(),
    }
}

fn parse_target(line: usize, token: &str) -> Result<RegisterIndex, ParseError> {
    parse_natural(token).ok_or_else(|| ParseError::InvalidRegisterReference {
        line,
        token: token.to_string(),
    })
}

/// Base-10 natural number; signs other than a leading `+` are rejected
fn parse_natural(token: &str) -> Option<u64> {
    token.parse::<u64>().ok()
}
