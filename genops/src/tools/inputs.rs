//! Typed inputs, one struct per tool.
//!
//! Shape (required fields, types, unknown fields) is enforced by each tool's
//! JSON Schema before deserialization. [`CheckInput`] adds the rules a schema
//! cannot express well: names that must be a single path segment.

use serde::Deserialize;

use crate::core::names::{check_dir, check_segment};

/// Semantic checks run after the schema accepted the input.
pub trait CheckInput {
    /// Every violation found; empty when the input is usable.
    fn violations(&self) -> Vec<String>;
}

fn check_project(value: &str) -> Option<String> {
    value
        .trim()
        .is_empty()
        .then(|| "project_name must not be empty".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanProjectInput {
    pub requirements_path: String,
    pub project_name: String,
    pub output_dir: String,
    pub file_name: String,
    pub content: String,
}

impl CheckInput for PlanProjectInput {
    fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(check_dir("requirements_path", &self.requirements_path));
        errors.extend(check_project(&self.project_name));
        errors.extend(check_dir("output_dir", &self.output_dir));
        errors.extend(check_segment("file_name", &self.file_name));
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteArchitectureInput {
    pub project_name: String,
    pub output_dir: String,
    pub file_name: String,
    pub content: String,
}

impl CheckInput for WriteArchitectureInput {
    fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(check_project(&self.project_name));
        errors.extend(check_dir("output_dir", &self.output_dir));
        errors.extend(check_segment("file_name", &self.file_name));
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteCodeInput {
    pub module_name: String,
    pub project_name: String,
    pub output_dir: String,
    pub code_stub: String,
}

impl CheckInput for WriteCodeInput {
    fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(check_segment("module_name", &self.module_name));
        errors.extend(check_project(&self.project_name));
        errors.extend(check_dir("output_dir", &self.output_dir));
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateProjectFolderInput {
    pub output_dir: String,
}

impl CheckInput for CreateProjectFolderInput {
    fn violations(&self) -> Vec<String> {
        check_dir("output_dir", &self.output_dir).into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateTestsInput {
    pub project_name: String,
    pub module_name: String,
    pub output_dir: String,
    /// Empty or absent means "write the placeholder test".
    #[serde(default)]
    pub test_stub: String,
}

impl CheckInput for GenerateTestsInput {
    fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(check_project(&self.project_name));
        errors.extend(check_segment("module_name", &self.module_name));
        errors.extend(check_dir("output_dir", &self.output_dir));
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunTestsInput {
    pub repo_path: String,
}

impl CheckInput for RunTestsInput {
    fn violations(&self) -> Vec<String> {
        check_dir("repo_path", &self.repo_path).into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteDocsInput {
    pub project_name: String,
    pub output_dir: String,
    /// Empty or absent means "write the placeholder".
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl CheckInput for WriteDocsInput {
    fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(check_project(&self.project_name));
        errors.extend(check_dir("output_dir", &self.output_dir));
        if let Some(file_name) = &self.file_name {
            errors.extend(check_segment("file_name", file_name));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewRepoInput {
    pub repo_path: String,
}

impl CheckInput for ReviewRepoInput {
    fn violations(&self) -> Vec<String> {
        check_dir("repo_path", &self.repo_path).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_code_collects_every_violation() {
        let input = WriteCodeInput {
            module_name: "../auth".to_string(),
            project_name: " ".to_string(),
            output_dir: String::new(),
            code_stub: String::new(),
        };
        let errors = input.violations();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("module_name"));
        assert!(errors[1].starts_with("project_name"));
        assert!(errors[2].starts_with("output_dir"));
    }

    #[test]
    fn empty_code_stub_is_allowed() {
        let input = WriteCodeInput {
            module_name: "auth".to_string(),
            project_name: "demo".to_string(),
            output_dir: "/tmp/demo".to_string(),
            code_stub: String::new(),
        };
        assert!(input.violations().is_empty());
    }

    #[test]
    fn docs_file_name_is_checked_only_when_given() {
        let mut input = WriteDocsInput {
            project_name: "demo".to_string(),
            output_dir: "out".to_string(),
            content: String::new(),
            file_name: None,
        };
        assert!(input.violations().is_empty());
        input.file_name = Some("guides/setup.md".to_string());
        assert_eq!(input.violations().len(), 1);
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let input: GenerateTestsInput = serde_json::from_value(serde_json::json!({
            "project_name": "demo",
            "module_name": "auth",
            "output_dir": "out",
        }))
        .expect("deserialize");
        assert_eq!(input.test_stub, "");
    }
}
