//! Register bank
//!
//! Registers hold natural numbers and are addressed by natural numbers.
//! A register that was never written reads as zero; it only shows up in
//! listings once something stores into it.

use crate::parser::ast::RegisterIndex;
use std::collections::BTreeMap;
use std::fmt;

/// Value stored in a register
pub type RegisterValue = u64;

/// Outcome of a decrement-or-branch test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// Register was non-zero and has been decremented
    Decremented,
    /// Register was zero (or never set) and is unchanged
    WasZero,
}

/// Mapping from register index to value, ordered by index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterBank {
    values: BTreeMap<RegisterIndex, RegisterValue>,
}

impl RegisterBank {
    pub fn new() -> Self {
        RegisterBank::default()
    }

    /// Current value of `index`, zero if never set
    pub fn get(&self, index: RegisterIndex) -> RegisterValue {
        self.values.get(&index).copied().unwrap_or(0)
    }

    /// Store `value` in `index`, overwriting the previous value
    pub fn set(&mut self, index: RegisterIndex, value: RegisterValue) {
        self.values.insert(index, value);
    }

    /// Add one to `index`, creating it at 1 if absent.
    ///
    /// Returns the new value, or `None` (leaving the bank untouched) when the
    /// register already holds `RegisterValue::MAX`.
    pub fn increment(&mut self, index: RegisterIndex) -> Option<RegisterValue> {
        let slot = self.values.entry(index).or_insert(0);
        let next = slot.checked_add(1)?;
        *slot = next;
        Some(next)
    }

    /// Subtract one from `index` unless it is zero.
    ///
    /// An absent register is treated as zero and is not created.
    pub fn decrement(&mut self, index: RegisterIndex) -> Decrement {
        match self.values.get_mut(&index) {
            Some(value) if *value > 0 => {
                *value -= 1;
                Decrement::Decremented
            }
            _ => Decrement::WasZero,
        }
    }

    /// Whether any register has been set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of registers that have been set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over set registers in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (RegisterIndex, RegisterValue)> + '_ {
        self.values.iter().map(|(&index, &value)| (index, value))
    }
}

impl FromIterator<(RegisterIndex, RegisterValue)> for RegisterBank {
    fn from_iter<I: IntoIterator<Item = (RegisterIndex, RegisterValue)>>(iter: I) -> Self {
        RegisterBank {
            values: iter.into_iter().collect(),
        }
    }
}

/// One `register <k> = <v>` line per set register, or a placeholder line
/// when nothing is set.
impl fmt::Display for RegisterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.values.is_empty() {
            return writeln!(f, "[ all registers empty ]");
        }
        for (index, value) in self.iter() {
            writeln!(f, "register {} = {}", index, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_register_reads_zero() {
        let bank = RegisterBank::new();
        assert_eq!(bank.get(42), 0);
        assert!(bank.is_empty());
    }

    #[test]
    fn test_increment_creates_register() {
        let mut bank = RegisterBank::new();
        assert_eq!(bank.increment(7), Some(1));
        assert_eq!(bank.increment(7), Some(2));
        assert_eq!(bank.get(7), 2);
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_increment_overflow_leaves_value() {
        let mut bank = RegisterBank::new();
        bank.set(0, RegisterValue::MAX);
        assert_eq!(bank.increment(0), None);
        assert_eq!(bank.get(0), RegisterValue::MAX);
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut bank = RegisterBank::new();
        bank.set(1, 1);
        assert_eq!(bank.decrement(1), Decrement::Decremented);
        assert_eq!(bank.get(1), 0);
        assert_eq!(bank.decrement(1), Decrement::WasZero);
        assert_eq!(bank.get(1), 0);
    }

    #[test]
    fn test_decrement_absent_does_not_create() {
        let mut bank = RegisterBank::new();
        assert_eq!(bank.decrement(5), Decrement::WasZero);
        assert!(bank.is_empty());
    }

    #[test]
    fn test_display_is_sorted() {
        let bank: RegisterBank = vec![(10, 1), (2, 8), (0, 0)].into_iter().collect();
        assert_eq!(
            bank.to_string(),
            "register 0 = 0\nregister 2 = 8\nregister 10 = 1\n"
        );
    }

    #[test]
    fn test_display_empty() {
        let bank = RegisterBank::new();
        assert_eq!(bank.to_string(), "[ all registers empty ]\n");
    }
}
