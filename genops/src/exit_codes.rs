//! Stable exit codes for `genops` CLI commands.

/// Command succeeded (for `call`: the tool returned a success result).
pub const OK: i32 = 0;
/// Invalid invocation, unreadable input file, or bad config.
pub const INVALID: i32 = 1;
/// `genops call` ran the tool but it reported an error result
/// (validation failure, write failure, failing tests).
pub const TOOL_FAILED: i32 = 2;
