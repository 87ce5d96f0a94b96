// Snapshot history for stepping backwards through a run

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::trace::{TraceEvent, TraceSink};
use crate::memory::RegisterBank;
use crate::parser::ast::{Label, Statement};

/// Owned copy of a trace event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub step: u64,
    pub label: Label,
    pub line: usize,
    pub statement: Statement,
    pub registers: RegisterBank,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough: fixed part, label text, 24 bytes per register including map overhead
        let labels: usize = self.statement.successors().iter().map(|l| l.len()).sum();
        64 + self.label.len() + labels + self.registers.len() * 24
    }
}

impl From<&TraceEvent<'_>> for Snapshot {
    fn from(event: &TraceEvent<'_>) -> Self {
        Snapshot {
            step: event.step,
            label: event.label.to_string(),
            line: event.line,
            statement: event.statement.clone(),
            registers: event.registers.clone(),
        }
    }
}

/// Unbounded recording, mostly useful in tests
impl TraceSink for Vec<Snapshot> {
    fn on_step(&mut self, event: &TraceEvent<'_>) -> Result<(), RuntimeError> {
        self.push(Snapshot::from(event));
        Ok(())
    }
}

/// Execution history with a memory budget
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), RuntimeError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(RuntimeError::SnapshotLimitExceeded {
                current: self.current_memory,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Snapshots up to and including `index`
    pub fn up_to(&self, index: usize) -> &[Snapshot] {
        let end = index.saturating_add(1).min(self.snapshots.len());
        &self.snapshots[..end]
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl TraceSink for SnapshotManager {
    fn on_step(&mut self, event: &TraceEvent<'_>) -> Result<(), RuntimeError> {
        self.push(Snapshot::from(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::engine::Interpreter;
    use crate::parser::parse::Parser;

    fn interpreter(source: &str) -> Interpreter {
        let program = Parser::new(source).parse_program().unwrap();
        Interpreter::new(program, RegisterBank::new())
    }

    #[test]
    fn test_vec_records_every_step() {
        let mut vm = interpreter("A INC 3 B\nB DEB 3 C C\nC END");
        let mut history: Vec<Snapshot> = Vec::new();
        vm.run(&mut history).unwrap();

        let labels: Vec<&str> = history.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert_eq!(history[0].registers.get(3), 0);
        assert_eq!(history[1].registers.get(3), 1);
        assert_eq!(history[1].line, 2);
        assert_eq!(history.last().map(|s| &s.statement), Some(&Statement::End));
    }

    #[test]
    fn test_manager_enforces_limit() {
        let mut vm = interpreter("A INC 0 A");
        let mut manager = SnapshotManager::new(1000);

        let err = vm.run(&mut manager).unwrap_err();
        assert!(matches!(err, RuntimeError::SnapshotLimitExceeded { limit: 1000, .. }));
        assert!(!manager.is_empty());
        assert!(manager.current_memory <= manager.max_memory);
        assert_eq!(manager.len() as u64, vm.steps_executed());
    }

    #[test]
    fn test_up_to_clamps() {
        let mut manager = SnapshotManager::new(usize::MAX);
        let mut vm = interpreter("A INC 0 B\nB END");
        vm.run(&mut manager).unwrap();

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.up_to(0).len(), 1);
        assert_eq!(manager.up_to(10).len(), 2);
        assert_eq!(manager.get(1).map(|s| s.label.as_str()), Some("B"));
        assert_eq!(manager.get(0).map(|s| s.step), Some(0));
    }
}
