//! Test runner adapter.
//!
//! Runs the configured test command (default `pytest`) inside a repository
//! and folds every way that can go wrong into a failed [`TestRunResult`].

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::core::types::TestRunResult;
use crate::io::config::TestRunnerConfig;
use crate::io::process::run_command_with_timeout;

/// Something that can run a repository's tests.
pub trait TestRunner {
    fn run(&self, repo_path: &Path) -> TestRunResult;
}

/// Runs an external command with the repository as working directory.
#[derive(Debug, Clone)]
pub struct CommandTestRunner {
    command: Vec<String>,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl CommandTestRunner {
    pub fn new(command: Vec<String>, timeout: Duration, output_limit_bytes: usize) -> Self {
        Self {
            command,
            timeout,
            output_limit_bytes,
        }
    }

    pub fn from_config(config: &TestRunnerConfig) -> Self {
        Self::new(
            config.command.clone(),
            config.timeout(),
            config.output_limit_bytes,
        )
    }

    fn display_command(&self) -> String {
        self.command.join(" ")
    }
}

impl TestRunner for CommandTestRunner {
    #[instrument(skip_all, fields(repo = %repo_path.display()))]
    fn run(&self, repo_path: &Path) -> TestRunResult {
        if !repo_path.is_dir() {
            warn!("repository path is not a directory");
            return TestRunResult::failed(format!(
                "repository path {} does not exist or is not a directory",
                repo_path.display()
            ));
        }
        let Some((program, args)) = self.command.split_first() else {
            return TestRunResult::failed("no test command configured");
        };

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(repo_path);

        info!(command = %self.display_command(), "running tests");
        let output = match run_command_with_timeout(cmd, self.timeout, self.output_limit_bytes) {
            Ok(output) => output,
            Err(err) => {
                warn!(err = %format!("{err:#}"), "test runner could not be run");
                return TestRunResult::failed(format!(
                    "could not run `{}`: {err:#}",
                    self.display_command()
                ));
            }
        };

        let mut text = output.combined();
        if output.timed_out {
            text.push_str(&format!(
                "\n[test run killed after {}s timeout]",
                self.timeout.as_secs_f64()
            ));
        }
        let success = !output.timed_out && output.status.success();
        info!(success, exit_code = ?output.status.code(), timed_out = output.timed_out, "tests finished");
        TestRunResult {
            success,
            exit_code: if output.timed_out {
                None
            } else {
                output.status.code()
            },
            timed_out: output.timed_out,
            output: text,
        }
    }
}
