//! Machine state
//!
//! The register machine has no stack and no heap: its entire mutable state
//! apart from the current label is the [`registers::RegisterBank`].

pub mod registers;

pub use registers::{Decrement, RegisterBank, RegisterValue};
