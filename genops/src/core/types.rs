//! Result records handed back to callers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a single test-runner invocation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunResult {
    pub success: bool,
    /// `None` when the runner never started or was killed by a signal.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    /// Captured stdout and stderr, plus any truncation or failure notes.
    pub output: String,
}

impl TestRunResult {
    /// A failed result for a run that could not start or finish.
    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: None,
            timed_out: false,
            output: output.into(),
        }
    }

    /// One-line verdict, e.g. `tests passed (exit 0)`.
    pub fn verdict(&self) -> String {
        let state = if self.success { "passed" } else { "failed" };
        if self.timed_out {
            return format!("tests {state} (timed out)");
        }
        match self.exit_code {
            Some(code) => format!("tests {state} (exit {code})"),
            None => format!("tests {state}"),
        }
    }

    /// Human-readable summary for the calling agent.
    pub fn summary(&self) -> String {
        let output = self.output.trim_end();
        if output.is_empty() {
            self.verdict()
        } else {
            format!("{}\n\n{}", self.verdict(), output)
        }
    }
}

/// Plain string result returned to the agent, plus an error flag for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub is_error: bool,
    pub content: String,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            is_error: false,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            content: content.into(),
        }
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_includes_verdict_and_output() {
        let result = TestRunResult {
            success: false,
            exit_code: Some(1),
            timed_out: false,
            output: "1 failed\n".to_string(),
        };
        assert_eq!(result.summary(), "tests failed (exit 1)\n\n1 failed");
    }

    #[test]
    fn summary_reports_timeout() {
        let result = TestRunResult {
            success: false,
            exit_code: None,
            timed_out: true,
            output: String::new(),
        };
        assert_eq!(result.summary(), "tests failed (timed out)");
    }

    #[test]
    fn failed_has_no_exit_code() {
        let result = TestRunResult::failed("no such directory");
        assert!(!result.success);
        assert_eq!(result.exit_code, None);
        assert_eq!(result.summary(), "tests failed\n\nno such directory");
    }
}
