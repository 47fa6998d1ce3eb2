//! Artifact naming convention under a project's output directory.
//!
//! ```text
//! <output_dir>/
//!   <plan file_name>
//!   <architecture file_name>
//!   <module>.<ext>
//!   <tests_dir>/<test_prefix><module>.<ext>
//!   <docs_dir>/<docs file_name>
//! ```
//!
//! Paths depend only on the inputs, so repeating a call with the same module
//! name always targets the same file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::names::{check_extension, check_segment};

const DEFAULT_TEST_TEMPLATE: &str = "\"\"\"Placeholder tests for {{ module_name }} ({{ project }}).\"\"\"\n\n\ndef test_{{ module }}_placeholder():\n    assert True\n";
const DEFAULT_DOCS_TEMPLATE: &str =
    "# {{ project }}\n\nDocumentation placeholder. Replace with project documentation.\n";

/// Naming knobs for generated artifacts (the `[layout]` config table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Extension for code modules and test files, without the dot.
    pub code_extension: String,
    /// Subdirectory of `output_dir` holding test stubs.
    pub tests_dir: String,
    /// Prefix prepended to the module name for test files.
    pub test_prefix: String,
    /// Subdirectory of `output_dir` holding documentation.
    pub docs_dir: String,
    /// Documentation file name used when the caller does not pick one.
    pub docs_file: String,
    /// Template for the test stub when the caller sends none. In scope:
    /// `module` (the module name as an identifier, `api-v2` -> `api_v2`),
    /// `module_name` (as given, without extension) and `project`.
    pub test_template: String,
    /// Template for the docs file when the caller sends no content.
    pub docs_template: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            code_extension: "py".to_string(),
            tests_dir: "tests".to_string(),
            test_prefix: "test_".to_string(),
            docs_dir: "docs".to_string(),
            docs_file: "README.md".to_string(),
            test_template: DEFAULT_TEST_TEMPLATE.to_string(),
            docs_template: DEFAULT_DOCS_TEMPLATE.to_string(),
        }
    }
}

impl LayoutConfig {
    /// Return every violation; an empty list means the layout is usable.
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(check_extension("layout.code_extension", &self.code_extension));
        errors.extend(check_segment("layout.tests_dir", &self.tests_dir));
        errors.extend(check_segment("layout.docs_dir", &self.docs_dir));
        errors.extend(check_segment("layout.docs_file", &self.docs_file));
        if !self.test_prefix.is_empty() {
            errors.extend(check_segment("layout.test_prefix", &self.test_prefix));
        }
        errors
    }

    /// `<module>.<ext>`, without doubling an extension the agent already added.
    pub fn module_file_name(&self, module_name: &str) -> String {
        format!("{}.{}", self.module_stem(module_name), self.code_extension)
    }

    /// `<prefix><module>.<ext>`.
    pub fn test_file_name(&self, module_name: &str) -> String {
        format!(
            "{}{}.{}",
            self.test_prefix,
            self.module_stem(module_name),
            self.code_extension
        )
    }

    /// Module name with a trailing `.<ext>` removed.
    pub fn module_stem<'a>(&self, module_name: &'a str) -> &'a str {
        let suffix = format!(".{}", self.code_extension);
        match module_name.strip_suffix(&suffix) {
            Some(stem) if !stem.is_empty() => stem,
            _ => module_name,
        }
    }
}

/// Root directory for one project's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub project_name: String,
    pub output_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(project_name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Plan and architecture documents sit directly under `output_dir`.
    pub fn document_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn module_path(&self, layout: &LayoutConfig, module_name: &str) -> PathBuf {
        self.output_dir.join(layout.module_file_name(module_name))
    }

    pub fn test_path(&self, layout: &LayoutConfig, module_name: &str) -> PathBuf {
        self.output_dir
            .join(&layout.tests_dir)
            .join(layout.test_file_name(module_name))
    }

    pub fn docs_path(&self, layout: &LayoutConfig, file_name: Option<&str>) -> PathBuf {
        self.output_dir
            .join(&layout.docs_dir)
            .join(file_name.unwrap_or(&layout.docs_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid() {
        assert!(LayoutConfig::default().violations().is_empty());
    }

    #[test]
    fn module_path_appends_extension_once() {
        let layout = LayoutConfig::default();
        let project = ProjectLayout::new("demo", "/tmp/demo");
        assert_eq!(
            project.module_path(&layout, "auth"),
            PathBuf::from("/tmp/demo/auth.py")
        );
        assert_eq!(
            project.module_path(&layout, "auth.py"),
            PathBuf::from("/tmp/demo/auth.py")
        );
    }

    #[test]
    fn test_path_uses_tests_dir_and_prefix() {
        let layout = LayoutConfig::default();
        let project = ProjectLayout::new("demo", "/tmp/demo");
        assert_eq!(
            project.test_path(&layout, "auth.py"),
            PathBuf::from("/tmp/demo/tests/test_auth.py")
        );
    }

    #[test]
    fn docs_path_defaults_file_name() {
        let layout = LayoutConfig::default();
        let project = ProjectLayout::new("demo", "out");
        assert_eq!(
            project.docs_path(&layout, None),
            PathBuf::from("out/docs/README.md")
        );
        assert_eq!(
            project.docs_path(&layout, Some("api.md")),
            PathBuf::from("out/docs/api.md")
        );
    }

    #[test]
    fn custom_extension_changes_names() {
        let layout = LayoutConfig {
            code_extension: "rs".to_string(),
            test_prefix: String::new(),
            ..LayoutConfig::default()
        };
        assert_eq!(layout.module_file_name("auth"), "auth.rs");
        assert_eq!(layout.test_file_name("auth.rs"), "auth.rs");
        assert_eq!(layout.module_stem(".rs"), ".rs");
    }

    #[test]
    fn violations_report_bad_fields() {
        let layout = LayoutConfig {
            code_extension: ".py".to_string(),
            tests_dir: "a/b".to_string(),
            ..LayoutConfig::default()
        };
        let errors = layout.violations();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("layout.code_extension"));
        assert!(errors[1].contains("layout.tests_dir"));
    }
}
