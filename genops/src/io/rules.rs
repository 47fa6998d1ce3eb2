//! Team rules loading.
//!
//! Rules are optional. A missing or broken rules file must not stop the
//! pipeline, so loading never fails: it falls back to empty rules, logs a
//! warning, and records why on the returned value.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::prompt::inject_rules;

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    rules: String,
}

/// Loaded team rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRules {
    pub rules: String,
    /// Set when loading failed and empty rules were substituted.
    pub fallback_reason: Option<String>,
}

impl TeamRules {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }

    /// Append these rules to a role's system prompt.
    pub fn apply(&self, system: &str) -> String {
        inject_rules(system, self.rules.trim())
    }
}

/// Load team rules from a TOML file with a `rules` string.
///
/// Falls back to empty rules when the file is missing, unreadable, or not
/// valid TOML.
pub fn load_team_rules(path: &Path) -> TeamRules {
    match read_rules(path) {
        Ok(rules) => {
            debug!(path = %path.display(), bytes = rules.len(), "team rules loaded");
            TeamRules {
                rules,
                fallback_reason: None,
            }
        }
        Err(err) => {
            let reason = format!("{err:#}");
            warn!(path = %path.display(), reason = %reason, "team rules not loaded, using none");
            TeamRules {
                rules: String::new(),
                fallback_reason: Some(reason),
            }
        }
    }
}

fn read_rules(path: &Path) -> Result<String> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let file: RulesFile =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(file.rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_rules_string() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("team_rules.toml");
        fs::write(&path, "rules = \"\"\"\nWrite tests first.\n\"\"\"\n").expect("write");

        let rules = load_team_rules(&path);
        assert!(!rules.is_fallback());
        assert_eq!(rules.rules, "Write tests first.\n");
        assert_eq!(
            rules.apply("You are QA."),
            "You are QA.\n\n--- TEAM RULES ---\nWrite tests first."
        );
    }

    #[test]
    fn missing_file_falls_back_to_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let rules = load_team_rules(&temp.path().join("missing.toml"));
        assert!(rules.is_fallback());
        assert_eq!(rules.rules, "");
        assert!(
            rules
                .fallback_reason
                .as_deref()
                .is_some_and(|reason| reason.contains("missing.toml"))
        );
        assert_eq!(rules.apply("You are QA."), "You are QA.");
    }

    #[test]
    fn malformed_file_falls_back_to_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("team_rules.toml");
        fs::write(&path, "rules = [unterminated").expect("write");

        let rules = load_team_rules(&path);
        assert!(rules.is_fallback());
        assert_eq!(rules.rules, "");
    }

    #[test]
    fn file_without_rules_key_is_empty_not_fallback() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("team_rules.toml");
        fs::write(&path, "# nothing yet\n").expect("write");

        let rules = load_team_rules(&path);
        assert!(!rules.is_fallback());
        assert_eq!(rules.rules, "");
    }
}
