//! Deterministic, pure logic shared by the tools.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod layout;
pub mod names;
pub mod prompt;
pub mod types;
