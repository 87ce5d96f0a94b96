//! Program and register source loading
//!
//! - [`lines`]: newline normalization and line iteration
//! - [`ast`]: [`ast::Statement`] and [`ast::Program`]
//! - [`parse`]: the [`parse::Parser`] for program and register sources
//!
//! # Source Format
//!
//! One statement per line: `<label> <INC|DEB|END> [register] [branch] [else]`.
//! Blank lines and lines whose first non-blank character is `#` are ignored.
//! Mnemonics are case-insensitive; labels are not.

pub mod ast;
pub mod lines;
pub mod parse;

pub use parse::{ParseError, Parser};
