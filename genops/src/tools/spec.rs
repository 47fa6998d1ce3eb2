//! Tool names, descriptions, and input schemas.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every tool an agent can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    PlanProject,
    WriteArchitecture,
    WriteCode,
    CreateProjectFolder,
    GenerateTests,
    RunTests,
    WriteDocs,
    ReviewRepo,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::PlanProject,
        ToolKind::WriteArchitecture,
        ToolKind::WriteCode,
        ToolKind::CreateProjectFolder,
        ToolKind::GenerateTests,
        ToolKind::RunTests,
        ToolKind::WriteDocs,
        ToolKind::ReviewRepo,
    ];

    /// Wire name used by the orchestrator.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::PlanProject => "plan_project",
            ToolKind::WriteArchitecture => "write_architecture",
            ToolKind::WriteCode => "write_code",
            ToolKind::CreateProjectFolder => "create_project_folder",
            ToolKind::GenerateTests => "generate_tests",
            ToolKind::RunTests => "run_tests",
            ToolKind::WriteDocs => "write_docs",
            ToolKind::ReviewRepo => "review_repo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::PlanProject => {
                "Read the project requirements and save the project plan. Returns the requirements text."
            }
            ToolKind::WriteArchitecture => {
                "Write the architecture produced by the architect into a file."
            }
            ToolKind::WriteCode => "Create or replace a code module file that the agent will fill.",
            ToolKind::CreateProjectFolder => "Ensure the project output directory exists.",
            ToolKind::GenerateTests => {
                "Create a test file for a module so the QA agent can expand it."
            }
            ToolKind::RunTests => "Run the project's tests and return the results for QA evaluation.",
            ToolKind::WriteDocs => "Write project documentation, or a placeholder when no content is given.",
            ToolKind::ReviewRepo => {
                "Start a repository review: lists the repository's files for the reviewer to reason about."
            }
        }
    }

    pub(crate) fn schema_source(self) -> &'static str {
        match self {
            ToolKind::PlanProject => include_str!("../../schemas/tools/plan_project.schema.json"),
            ToolKind::WriteArchitecture => {
                include_str!("../../schemas/tools/write_architecture.schema.json")
            }
            ToolKind::WriteCode => include_str!("../../schemas/tools/write_code.schema.json"),
            ToolKind::CreateProjectFolder => {
                include_str!("../../schemas/tools/create_project_folder.schema.json")
            }
            ToolKind::GenerateTests => {
                include_str!("../../schemas/tools/generate_tests.schema.json")
            }
            ToolKind::RunTests => include_str!("../../schemas/tools/run_tests.schema.json"),
            ToolKind::WriteDocs => include_str!("../../schemas/tools/write_docs.schema.json"),
            ToolKind::ReviewRepo => include_str!("../../schemas/tools/review_repo.schema.json"),
        }
    }

    pub fn input_schema(self) -> Result<Value> {
        serde_json::from_str(self.schema_source())
            .with_context(|| format!("parse input schema for {}", self.name()))
    }

    pub fn spec(self) -> Result<ToolSpec> {
        Ok(ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema()?,
        })
    }
}

/// Self-describing tool metadata for registering with an LLM tool-call API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("delete_everything"), None);
    }

    #[test]
    fn every_schema_parses_and_is_titled_by_its_tool() {
        for kind in ToolKind::ALL {
            let spec = kind.spec().expect("spec");
            assert_eq!(spec.input_schema["title"], kind.name());
            assert_eq!(spec.input_schema["type"], "object");
            assert_eq!(spec.input_schema["additionalProperties"], false);
        }
    }

    #[test]
    fn serde_name_matches_wire_name() {
        let json = serde_json::to_string(&ToolKind::CreateProjectFolder).expect("serialize");
        assert_eq!(json, "\"create_project_folder\"");
    }
}
