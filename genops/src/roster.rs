//! Agent roster: the fixed roles, the tools each may call, and the task order.
//!
//! This is static data for the host orchestrator. Tasks run strictly in
//! [`PIPELINE`] order, each handled by exactly one role.

use std::fmt;

use serde::Serialize;

use crate::tools::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ProductManager,
    Architect,
    BackendEngineer,
    FrontendEngineer,
    QaEngineer,
    DevopsEngineer,
    TechWriter,
    Reviewer,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::ProductManager,
        Role::Architect,
        Role::BackendEngineer,
        Role::FrontendEngineer,
        Role::QaEngineer,
        Role::DevopsEngineer,
        Role::TechWriter,
        Role::Reviewer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::ProductManager => "product_manager",
            Role::Architect => "architect",
            Role::BackendEngineer => "backend_engineer",
            Role::FrontendEngineer => "frontend_engineer",
            Role::QaEngineer => "qa_engineer",
            Role::DevopsEngineer => "devops_engineer",
            Role::TechWriter => "tech_writer",
            Role::Reviewer => "reviewer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }

    /// Tools this role may call.
    pub fn tools(self) -> &'static [ToolKind] {
        match self {
            Role::ProductManager => &[ToolKind::PlanProject],
            Role::Architect => &[ToolKind::WriteArchitecture],
            Role::BackendEngineer | Role::FrontendEngineer => {
                &[ToolKind::CreateProjectFolder, ToolKind::WriteCode]
            }
            Role::QaEngineer => &[ToolKind::GenerateTests, ToolKind::RunTests],
            Role::DevopsEngineer => &[
                ToolKind::CreateProjectFolder,
                ToolKind::WriteCode,
                ToolKind::ReviewRepo,
                ToolKind::WriteDocs,
            ],
            Role::TechWriter => &[ToolKind::WriteDocs],
            Role::Reviewer => &[ToolKind::ReviewRepo],
        }
    }

    pub fn can_call(self, tool: ToolKind) -> bool {
        self.tools().contains(&tool)
    }

    /// Base system prompt before team rules are appended.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Role::ProductManager => {
                "You are the product manager. Read the requirements and turn them into a project plan with clear, testable scope."
            }
            Role::Architect => {
                "You are the software architect. Design the module layout, interfaces and data flow for the planned project."
            }
            Role::BackendEngineer => {
                "You are the backend engineer. Implement the server-side modules described by the architecture."
            }
            Role::FrontendEngineer => {
                "You are the frontend engineer. Implement the user-facing modules described by the architecture."
            }
            Role::QaEngineer => {
                "You are the QA engineer. Write tests for every module, run them, and report failures precisely."
            }
            Role::DevopsEngineer => {
                "You are the DevOps engineer. Add build, deployment and CI configuration for the project."
            }
            Role::TechWriter => {
                "You are the technical writer. Document how to install, run and extend the project."
            }
            Role::Reviewer => {
                "You are the code reviewer. Inspect the repository and report defects, risks and missing pieces."
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of the sequential pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Task {
    pub name: &'static str,
    pub role: Role,
}

pub const PIPELINE: [Task; 8] = [
    Task {
        name: "collect_requirements",
        role: Role::ProductManager,
    },
    Task {
        name: "architect_project",
        role: Role::Architect,
    },
    Task {
        name: "build_backend",
        role: Role::BackendEngineer,
    },
    Task {
        name: "build_frontend",
        role: Role::FrontendEngineer,
    },
    Task {
        name: "quality_assurance",
        role: Role::QaEngineer,
    },
    Task {
        name: "build_infrastructure_and_ci_cd",
        role: Role::DevopsEngineer,
    },
    Task {
        name: "write_docs",
        role: Role::TechWriter,
    },
    Task {
        name: "review_repo",
        role: Role::Reviewer,
    },
];

/// Roster as text: one numbered line per task with its role and tools.
pub fn render_pipeline() -> String {
    PIPELINE
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let tools: Vec<&str> = task.role.tools().iter().map(|tool| tool.name()).collect();
            format!(
                "{}. {} ({}): {}",
                idx + 1,
                task.name,
                task.role,
                tools.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
