//! I/O helpers behind the tool facade.

pub mod config;
pub mod process;
pub mod rules;
pub mod survey;
pub mod test_runner;
pub mod writer;
