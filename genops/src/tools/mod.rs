//! Tool facade exposed to agents.
//!
//! [`Toolbox::call`] takes a tool name and a JSON object, validates the input
//! against the tool's schema, performs the side effect, and always answers
//! with a [`ToolOutput`]. Validation and write failures become error results;
//! nothing panics or propagates to the orchestrator.

pub mod inputs;
pub mod schema;
pub mod spec;

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::layout::ProjectLayout;
use crate::core::names::identifier;
use crate::core::types::ToolOutput;
use crate::error::ToolError;
use crate::io::config::GenopsConfig;
use crate::io::survey::survey_repo;
use crate::io::test_runner::{CommandTestRunner, TestRunner};
use crate::io::writer::{WriteRequest, ensure_dir, read_text, write_artifact};

use inputs::{
    CheckInput, CreateProjectFolderInput, GenerateTestsInput, PlanProjectInput, ReviewRepoInput,
    RunTestsInput, WriteArchitectureInput, WriteCodeInput, WriteDocsInput,
};
use schema::SchemaSet;
pub use spec::{ToolKind, ToolSpec};

/// Files listed by `review_repo` before the listing is cut short.
const REVIEW_FILE_LIMIT: usize = 200;

/// The tool facade. Holds no state between calls beyond its configuration.
pub struct Toolbox<R = CommandTestRunner> {
    config: GenopsConfig,
    runner: R,
    schemas: SchemaSet,
    templates: Environment<'static>,
    write_lock: Mutex<()>,
}

impl Toolbox<CommandTestRunner> {
    /// Build a toolbox whose `run_tests` uses the configured test command.
    pub fn new(config: GenopsConfig) -> Result<Self> {
        let runner = CommandTestRunner::from_config(&config.test_runner);
        Self::with_runner(config, runner)
    }
}

impl<R: TestRunner> Toolbox<R> {
    pub fn with_runner(config: GenopsConfig, runner: R) -> Result<Self> {
        config.validate()?;
        let mut templates = Environment::new();
        templates.set_keep_trailing_newline(true);
        templates
            .render_str(
                &config.layout.test_template,
                context! { module => "example", module_name => "example", project => "example" },
            )
            .context("check layout.test_template")?;
        templates
            .render_str(&config.layout.docs_template, context! { project => "example" })
            .context("check layout.docs_template")?;
        Ok(Self {
            config,
            runner,
            schemas: SchemaSet::compile()?,
            templates,
            write_lock: Mutex::new(()),
        })
    }

    /// Specs for every tool, in pipeline order.
    pub fn specs(&self) -> Result<Vec<ToolSpec>> {
        ToolKind::ALL.into_iter().map(ToolKind::spec).collect()
    }

    /// Run the tool called `name` with `input`.
    #[instrument(skip_all, fields(tool = name))]
    pub fn call(&self, name: &str, input: &Value) -> ToolOutput {
        let result = match ToolKind::from_name(name) {
            Some(kind) => self.dispatch(kind, input),
            None => Err(ToolError::UnknownTool(name.to_string())),
        };
        match result {
            Ok(output) => output,
            Err(err) => {
                warn!(err = %err, "tool call rejected");
                ToolOutput::error(err.to_string())
            }
        }
    }

    fn dispatch(&self, kind: ToolKind, input: &Value) -> Result<ToolOutput, ToolError> {
        info!("tool started");
        let output = match kind {
            ToolKind::PlanProject => self.plan_project(&self.parse(kind, input)?),
            ToolKind::WriteArchitecture => self.write_architecture(&self.parse(kind, input)?),
            ToolKind::WriteCode => self.write_code(&self.parse(kind, input)?),
            ToolKind::CreateProjectFolder => {
                self.create_project_folder(&self.parse(kind, input)?)
            }
            ToolKind::GenerateTests => self.generate_tests(&self.parse(kind, input)?),
            ToolKind::RunTests => return Ok(self.run_tests(&self.parse(kind, input)?)),
            ToolKind::WriteDocs => self.write_docs(&self.parse(kind, input)?),
            ToolKind::ReviewRepo => self.review_repo(&self.parse(kind, input)?),
        }
        .map_err(|err| ToolError::io(kind.name(), err))?;
        info!("tool finished");
        Ok(ToolOutput::success(output))
    }

    fn parse<T>(&self, kind: ToolKind, input: &Value) -> Result<T, ToolError>
    where
        T: serde::de::DeserializeOwned + CheckInput,
    {
        self.schemas
            .parse(kind, input)
            .map_err(|violations| ToolError::validation(kind.name(), violations))
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn plan_project(&self, input: &PlanProjectInput) -> Result<String> {
        let requirements = read_text(Path::new(&input.requirements_path))
            .context("read project requirements")?;
        let project = ProjectLayout::new(&input.project_name, &input.output_dir);
        let receipt = {
            let _guard = self.lock_writes();
            write_artifact(&WriteRequest::new(
                project.document_path(&input.file_name),
                &input.content,
            ))?
        };
        Ok(format!(
            "{}\n\nRequirements ({}):\n{}",
            receipt.describe(&format!("project plan for '{}'", input.project_name)),
            input.requirements_path,
            requirements
        ))
    }

    fn write_architecture(&self, input: &WriteArchitectureInput) -> Result<String> {
        let project = ProjectLayout::new(&input.project_name, &input.output_dir);
        let _guard = self.lock_writes();
        let receipt = write_artifact(&WriteRequest::new(
            project.document_path(&input.file_name),
            &input.content,
        ))?;
        Ok(receipt.describe(&format!("architecture for '{}'", input.project_name)))
    }

    fn write_code(&self, input: &WriteCodeInput) -> Result<String> {
        let layout = &self.config.layout;
        let project = ProjectLayout::new(&input.project_name, &input.output_dir);
        let _guard = self.lock_writes();
        let receipt = write_artifact(&WriteRequest::new(
            project.module_path(layout, &input.module_name),
            &input.code_stub,
        ))?;
        Ok(receipt.describe(&format!(
            "code module '{}'",
            layout.module_stem(&input.module_name)
        )))
    }

    fn create_project_folder(&self, input: &CreateProjectFolderInput) -> Result<String> {
        let dir = Path::new(&input.output_dir);
        let _guard = self.lock_writes();
        let existed = dir.is_dir();
        ensure_dir(dir)?;
        let state = if existed { "already exists" } else { "created" };
        Ok(format!("project folder {} {state}", dir.display()))
    }

    fn generate_tests(&self, input: &GenerateTestsInput) -> Result<String> {
        let layout = &self.config.layout;
        let module = layout.module_stem(&input.module_name);
        let project = ProjectLayout::new(&input.project_name, &input.output_dir);
        let content = if input.test_stub.trim().is_empty() {
            self.templates
                .render_str(
                    &layout.test_template,
                    context! {
                        module => identifier(module),
                        module_name => module,
                        project => &input.project_name,
                    },
                )
                .context("render test placeholder")?
        } else {
            input.test_stub.clone()
        };
        let _guard = self.lock_writes();
        let receipt = write_artifact(&WriteRequest::new(
            project.test_path(layout, &input.module_name),
            content,
        ))?;
        Ok(receipt.describe(&format!("tests for module '{module}'")))
    }

    fn run_tests(&self, input: &RunTestsInput) -> ToolOutput {
        let result = self.runner.run(Path::new(&input.repo_path));
        info!(success = result.success, "tool finished");
        if result.success {
            ToolOutput::success(result.summary())
        } else {
            ToolOutput::error(result.summary())
        }
    }

    fn write_docs(&self, input: &WriteDocsInput) -> Result<String> {
        let layout = &self.config.layout;
        let project = ProjectLayout::new(&input.project_name, &input.output_dir);
        let content = if input.content.trim().is_empty() {
            self.templates
                .render_str(
                    &layout.docs_template,
                    context! { project => &input.project_name },
                )
                .context("render docs placeholder")?
        } else {
            input.content.clone()
        };
        let _guard = self.lock_writes();
        let receipt = write_artifact(&WriteRequest::new(
            project.docs_path(layout, input.file_name.as_deref()),
            content,
        ))?;
        Ok(receipt.describe(&format!("documentation for '{}'", input.project_name)))
    }

    fn review_repo(&self, input: &ReviewRepoInput) -> Result<String> {
        let survey = survey_repo(Path::new(&input.repo_path), REVIEW_FILE_LIMIT)?;
        Ok(format!(
            "Review process initialized for: {}\n\n{}",
            input.repo_path,
            survey.render()
        ))
    }
}
