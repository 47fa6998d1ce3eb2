//! Generation-ops layer for a sequential multi-agent coding pipeline.
//!
//! An external orchestrator hands each agent a small set of tools (write a
//! plan, write code stubs, run tests, ...). This crate implements those tools
//! and keeps the layering strict:
//!
//! - **[`core`]**: Pure, deterministic logic (artifact naming, input checks,
//!   result types, prompt assembly). No I/O.
//! - **[`io`]**: Side-effecting operations (config and rules loading,
//!   filesystem writes, subprocess execution).
//! - **[`tools`]**: The facade agents talk to. Validates JSON input against a
//!   fixed schema per tool and turns every failure into a result string.
//!
//! [`roster`] describes which role may call which tool and in what order the
//! pipeline runs its tasks.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod roster;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tools;
