//! Runtime error types for the register machine
//!
//! [`RuntimeError`] covers everything that can stop a run after the program
//! loaded successfully. All of them are fatal: the engine stops where it is
//! and the register bank stays readable in its last valid state.

use crate::parser::ast::{Label, RegisterIndex};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Control reached a label with no statement
    #[error("{}", describe_unknown_label(.label, .from.as_deref()))]
    UnknownLabel { label: Label, from: Option<Label> },

    /// INC on a register already holding the largest representable value
    #[error("register {register} overflowed at label '{label}'")]
    RegisterOverflow {
        label: Label,
        register: RegisterIndex,
    },

    /// Snapshot history limit exceeded
    #[error("snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// A trace sink failed to write its output
    #[error("trace output failed: {0}")]
    Io(#[from] io::Error),
}

fn describe_unknown_label(label: &str, from: Option<&str>) -> String {
    match from {
        Some(from) => format!("unknown label '{}' (jumped to from '{}')", label, from),
        None => format!("unknown label '{}'", label),
    }
}

impl RuntimeError {
    /// Label the machine was on when the error occurred, if it relates to one
    pub fn label(&self) -> Option<&str> {
        match self {
            RuntimeError::UnknownLabel { label, .. } => Some(label),
            RuntimeError::RegisterOverflow { label, .. } => Some(label),
            RuntimeError::SnapshotLimitExceeded { .. } => None,
            RuntimeError::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_message() {
        let err = RuntimeError::UnknownLabel {
            label: "nowhere".to_string(),
            from: Some("A".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown label 'nowhere' (jumped to from 'A')"
        );
        assert_eq!(err.label(), Some("nowhere"));

        let err = RuntimeError::UnknownLabel {
            label: "start".to_string(),
            from: None,
        };
        assert_eq!(err.to_string(), "unknown label 'start'");
    }
}
