//! `genops.toml`: layout, test runner, and team-rules settings.
//!
//! Loaded once by the host process and passed into
//! [`Toolbox::new`](crate::tools::Toolbox::new); nothing reads it from
//! ambient global state.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::layout::LayoutConfig;

pub const DEFAULT_CONFIG_PATH: &str = "genops.toml";

/// Top-level configuration (TOML).
///
/// Edited by humans; every field has a default so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenopsConfig {
    /// TOML file with a `rules` string appended to every system prompt.
    pub team_rules_path: PathBuf,

    pub layout: LayoutConfig,

    pub test_runner: TestRunnerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TestRunnerConfig {
    /// Program and arguments, run with the repository as working directory.
    pub command: Vec<String>,

    /// Wall-clock limit for one run; the child is killed when it expires.
    pub timeout_secs: u64,

    /// Keep at most this many bytes of stdout and of stderr.
    pub output_limit_bytes: usize,
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        Self {
            command: vec!["pytest".to_string()],
            timeout_secs: 10 * 60,
            output_limit_bytes: 100_000,
        }
    }
}

impl TestRunnerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GenopsConfig {
    fn default() -> Self {
        Self {
            team_rules_path: PathBuf::from("team_rules.toml"),
            layout: LayoutConfig::default(),
            test_runner: TestRunnerConfig::default(),
        }
    }
}

impl GenopsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.test_runner.timeout_secs == 0 {
            return Err(anyhow!("test_runner.timeout_secs must be > 0"));
        }
        if self.test_runner.output_limit_bytes == 0 {
            return Err(anyhow!("test_runner.output_limit_bytes must be > 0"));
        }
        if self.test_runner.command.is_empty() || self.test_runner.command[0].trim().is_empty() {
            return Err(anyhow!("test_runner.command must be a non-empty array"));
        }
        let layout_errors = self.layout.violations();
        if !layout_errors.is_empty() {
            return Err(anyhow!(
                "invalid layout:\n- {}",
                layout_errors.join("\n- ")
            ));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GenopsConfig::default()`.
pub fn load_config(path: &Path) -> Result<GenopsConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = GenopsConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GenopsConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &GenopsConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
