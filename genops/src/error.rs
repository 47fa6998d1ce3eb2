//! Error taxonomy for the tool facade.
//!
//! Internals return `anyhow::Result` with context. The facade classifies
//! failures into [`ToolError`] and renders them into the result string the
//! agent receives; nothing here is allowed to escape to the orchestrator.
//! Test-run failures are not errors at this level: they come back as a
//! failed [`TestRunResult`](crate::core::types::TestRunResult).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// Input rejected before any side effect happened.
    #[error("invalid input for {tool}:\n- {}", .violations.join("\n- "))]
    Validation {
        tool: String,
        violations: Vec<String>,
    },

    /// Filesystem read, write, or directory creation failed.
    #[error("{tool} failed: {cause:#}")]
    Io {
        tool: String,
        cause: anyhow::Error,
    },
}

impl ToolError {
    pub fn io(tool: &str, cause: anyhow::Error) -> Self {
        Self::Io {
            tool: tool.to_string(),
            cause,
        }
    }

    pub fn validation(tool: &str, violations: Vec<String>) -> Self {
        Self::Validation {
            tool: tool.to_string(),
            violations,
        }
    }
}
