//! Compiled input schemas and the validate-then-deserialize step.

use std::collections::HashMap;

use anyhow::{Context, Result};
use jsonschema::{Draft, Validator};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::inputs::CheckInput;
use super::spec::ToolKind;

/// One compiled validator per tool (Draft 2020-12).
pub struct SchemaSet {
    validators: HashMap<ToolKind, Validator>,
}

impl SchemaSet {
    pub fn compile() -> Result<Self> {
        let mut validators = HashMap::new();
        for kind in ToolKind::ALL {
            let schema = kind.input_schema()?;
            let compiled = jsonschema::options()
                .with_draft(Draft::Draft202012)
                .build(&schema)
                .with_context(|| format!("compile input schema for {}", kind.name()))?;
            validators.insert(kind, compiled);
        }
        Ok(Self { validators })
    }

    /// Validate `input` for `kind` and deserialize it into the tool's struct.
    ///
    /// Returns every schema violation at once; semantic checks only run on
    /// input the schema accepted.
    pub fn parse<T>(&self, kind: ToolKind, input: &Value) -> Result<T, Vec<String>>
    where
        T: DeserializeOwned + CheckInput,
    {
        if !input.is_object() {
            return Err(vec![format!(
                "input must be a JSON object, got {}",
                json_type(input)
            )]);
        }
        let validator = self
            .validators
            .get(&kind)
            .ok_or_else(|| vec![format!("no schema compiled for {}", kind.name())])?;
        let messages: Vec<String> = validator
            .iter_errors(input)
            .map(|err| err.to_string())
            .collect();
        if !messages.is_empty() {
            return Err(messages);
        }

        let parsed: T = serde_json::from_value(input.clone()).map_err(|err| vec![err.to_string()])?;
        let violations = parsed.violations();
        if !violations.is_empty() {
            return Err(violations);
        }
        Ok(parsed)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::inputs::{CreateProjectFolderInput, WriteCodeInput};
    use serde_json::json;

    fn schemas() -> SchemaSet {
        SchemaSet::compile().expect("compile schemas")
    }

    #[test]
    fn accepts_complete_input() {
        let input = json!({
            "module_name": "auth",
            "project_name": "demo",
            "output_dir": "/tmp/demo",
            "code_stub": "# TODO",
        });
        let parsed: WriteCodeInput = schemas()
            .parse(ToolKind::WriteCode, &input)
            .expect("valid input");
        assert_eq!(parsed.module_name, "auth");
        assert_eq!(parsed.code_stub, "# TODO");
    }

    #[test]
    fn reports_missing_required_field() {
        let input = json!({
            "project_name": "demo",
            "output_dir": "/tmp/demo",
            "code_stub": "# TODO",
        });
        let errors = schemas()
            .parse::<WriteCodeInput>(ToolKind::WriteCode, &input)
            .expect_err("missing module_name");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("module_name"), "{errors:?}");
    }

    #[test]
    fn reports_unknown_and_mistyped_fields_together() {
        let input = json!({
            "output_dir": 42,
            "overwrite": true,
        });
        let errors = schemas()
            .parse::<CreateProjectFolderInput>(ToolKind::CreateProjectFolder, &input)
            .expect_err("bad input");
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors.iter().any(|err| err.contains("overwrite")));
    }

    #[test]
    fn rejects_non_object_input() {
        let errors = schemas()
            .parse::<CreateProjectFolderInput>(ToolKind::CreateProjectFolder, &json!("out"))
            .expect_err("string input");
        assert_eq!(errors, vec!["input must be a JSON object, got a string"]);
    }

    #[test]
    fn semantic_checks_run_after_schema() {
        let input = json!({
            "module_name": "api/routes",
            "project_name": "demo",
            "output_dir": "/tmp/demo",
            "code_stub": "",
        });
        let errors = schemas()
            .parse::<WriteCodeInput>(ToolKind::WriteCode, &input)
            .expect_err("separator in module name");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("path separators"));
    }
}
