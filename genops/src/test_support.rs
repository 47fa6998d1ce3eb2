//! Test-only helpers for driving the toolbox without a real test command.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::core::types::TestRunResult;
use crate::io::test_runner::TestRunner;

/// Replays canned results in order and records every repository it was asked to run.
///
/// Once the script is exhausted every further run fails.
#[derive(Debug, Default)]
pub struct ScriptedTestRunner {
    results: Mutex<VecDeque<TestRunResult>>,
    calls: Mutex<Vec<PathBuf>>,
}

impl ScriptedTestRunner {
    pub fn new(results: Vec<TestRunResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Repositories passed to `run`, oldest first.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TestRunner for ScriptedTestRunner {
    fn run(&self, repo_path: &Path) -> TestRunResult {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(repo_path.to_path_buf());
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| TestRunResult::failed("scripted test runner exhausted"))
    }
}

/// A successful run with exit code 0 and the given output.
pub fn passing_run(output: &str) -> TestRunResult {
    TestRunResult {
        success: true,
        exit_code: Some(0),
        timed_out: false,
        output: output.to_string(),
    }
}

/// A failed run that exited with `code`.
pub fn failing_run(code: i32, output: &str) -> TestRunResult {
    TestRunResult {
        success: false,
        exit_code: Some(code),
        timed_out: false,
        output: output.to_string(),
    }
}

/// Write an executable shell script under `dir` and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    let mut perms = std::fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms)?;
    Ok(path)
}
