//! Line splitting for program and register sources
//!
//! Source files turn up with Unix (`\n`), DOS (`\r\n`) and classic Mac (`\r`)
//! terminators, sometimes mixed in one file. Everything is rewritten to `\n`
//! before the loaders see it, so line numbers in diagnostics match what an
//! editor shows regardless of where the file came from.

use std::borrow::Cow;

/// Rewrite every `\r\n` pair and every lone `\r` into `\n`.
///
/// Borrows the input unchanged when it contains no carriage returns.
pub fn normalize_newlines(source: &str) -> Cow<'_, str> {
    if !source.contains('\r') {
        return Cow::Borrowed(source);
    }

    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            // A CR directly followed by LF is a single terminator
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// A physical source line with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> SourceLine<'a> {
    /// The trimmed line content, or `None` for blank and `#` comment lines.
    pub fn content(&self) -> Option<&'a str> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Normalized source text, ready to be iterated line by line.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: Cow<'a, str>,
}

impl<'a> SourceText<'a> {
    pub fn new(source: &'a str) -> Self {
        SourceText {
            text: normalize_newlines(source),
        }
    }

    /// Iterate over every physical line, blank and comment lines included.
    ///
    /// A terminator at the very end of the input does not produce an extra
    /// empty line.
    pub fn lines(&self) -> impl Iterator<Item = SourceLine<'_>> {
        self.text
            .split_terminator('\n')
            .enumerate()
            .map(|(idx, text)| SourceLine {
                number: idx + 1,
                text,
            })
    }

    /// Iterate over lines that carry content (not blank, not a comment),
    /// yielding the line number and the trimmed text.
    pub fn content_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines().filter_map(|line| match line.content() {
            Some(text) => Some((line.number, text)),
            None => {
                log::trace!("skipping line {}", line.number);
                None
            }
        })
    }
}
