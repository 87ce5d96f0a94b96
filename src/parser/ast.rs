// Program representation for the register machine

use rustc_hash::FxHashMap;
use std::fmt;

/// Opaque, case-sensitive name of a program line
pub type Label = String;

/// Register index (natural number)
pub type RegisterIndex = u64;

/// A single machine instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Add one to `target`, then continue at `branch`
    Inc {
        target: RegisterIndex,
        branch: Label,
    },

    /// If `target` is zero continue at `else_branch`, otherwise subtract one
    /// and continue at `branch`
    Deb {
        target: RegisterIndex,
        branch: Label,
        else_branch: Label,
    },

    /// Halt the machine
    End,
}

impl Statement {
    /// Register touched by this statement, if any
    pub fn target(&self) -> Option<RegisterIndex> {
        match self {
            Statement::Inc { target, .. } | Statement::Deb { target, .. } => Some(*target),
            Statement::End => None,
        }
    }

    /// Labels this statement may transfer control to
    pub fn successors(&self) -> Vec<&str> {
        match self {
            Statement::Inc { branch, .. } => vec![branch.as_str()],
            Statement::Deb {
                branch,
                else_branch,
                ..
            } => vec![branch.as_str(), else_branch.as_str()],
            Statement::End => Vec::new(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Inc { target, branch } => {
                write!(f, "INC register {} and GOTO {}", target, branch)
            }
            Statement::Deb {
                target,
                branch,
                else_branch,
            } => write!(
                f,
                "DEB register {} and GOTO {} else {}",
                target, branch, else_branch
            ),
            Statement::End => write!(f, "END"),
        }
    }
}

/// A statement together with the source line it was defined on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub statement: Statement,
    pub line: usize,
}

/// A loaded program: label table plus entry label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    definitions: FxHashMap<Label, Definition>,
    entry: Label,
}

impl Program {
    pub(crate) fn with_entry(entry: Label) -> Self {
        Program {
            definitions: FxHashMap::default(),
            entry,
        }
    }

    /// Define `label`, replacing any earlier definition.
    ///
    /// Returns the line of the replaced definition.
    pub(crate) fn define(
        &mut self,
        label: Label,
        statement: Statement,
        line: usize,
    ) -> Option<usize> {
        self.definitions
            .insert(label, Definition { statement, line })
            .map(|old| old.line)
    }

    /// Label where execution starts
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Statement stored under `label`
    pub fn get(&self, label: &str) -> Option<&Statement> {
        self.definitions.get(label).map(|def| &def.statement)
    }

    /// Statement and source line stored under `label`
    pub fn definition(&self, label: &str) -> Option<&Definition> {
        self.definitions.get(label)
    }

    /// Source line of the definition of `label`
    pub fn line_of(&self, label: &str) -> Option<usize> {
        self.definitions.get(label).map(|def| def.line)
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
