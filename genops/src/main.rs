//! `genops`: file-writing and test-running tools for a multi-agent coding
//! pipeline.
//!
//! Tool results are printed to stdout; diagnostics go to stderr. The exit
//! code tells a host whether the tool succeeded (see [`genops::exit_codes`]).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

use genops::exit_codes;
use genops::io::config::{DEFAULT_CONFIG_PATH, GenopsConfig, load_config, write_config};
use genops::io::rules::load_team_rules;
use genops::roster::{Role, render_pipeline};
use genops::tools::{ToolKind, ToolSpec, Toolbox};

#[derive(Parser)]
#[command(
    name = "genops",
    version,
    about = "File-writing and test-running tools for a multi-agent coding pipeline"
)]
struct Cli {
    /// Config file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file.
    Init {
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
    /// Print tool specs (name, description, input schema) as JSON.
    Tools {
        /// Only the tools this role may call.
        #[arg(long)]
        role: Option<String>,
    },
    /// Run one tool and print its result.
    Call {
        /// Tool name, e.g. `write_code`.
        tool: String,
        /// Tool input as a JSON object.
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,
        /// Read the JSON input from a file.
        #[arg(long)]
        input_file: Option<PathBuf>,
    },
    /// Print the ordered task list with each task's role and tools.
    Roster,
    /// Print a role's system prompt with team rules appended.
    Prompt {
        role: String,
        /// Replace the role's built-in system prompt.
        #[arg(long)]
        system: Option<String>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(exit_codes::INVALID);
        }
        Err(err) => err.exit(),
    };
    genops::logging::init();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Tools { role } => cmd_tools(role.as_deref()),
        Command::Call {
            tool,
            input,
            input_file,
        } => cmd_call(&cli.config, &tool, input.as_deref(), input_file.as_deref()),
        Command::Roster => {
            println!("{}", render_pipeline());
            Ok(exit_codes::OK)
        }
        Command::Prompt { role, system } => cmd_prompt(&cli.config, &role, system.as_deref()),
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if !force && config_path.exists() {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    write_config(config_path, &GenopsConfig::default())
        .with_context(|| format!("write {}", config_path.display()))?;
    println!("wrote {}", config_path.display());
    Ok(exit_codes::OK)
}

fn cmd_tools(role: Option<&str>) -> Result<i32> {
    let kinds: Vec<ToolKind> = match role {
        Some(name) => parse_role(name)?.tools().to_vec(),
        None => ToolKind::ALL.to_vec(),
    };
    let specs = kinds
        .into_iter()
        .map(ToolKind::spec)
        .collect::<Result<Vec<ToolSpec>>>()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&specs).context("serialize tool specs")?
    );
    Ok(exit_codes::OK)
}

fn cmd_call(
    config_path: &Path,
    tool: &str,
    input: Option<&str>,
    input_file: Option<&Path>,
) -> Result<i32> {
    let config = load_config(config_path)?;
    let toolbox = Toolbox::new(config)?;
    let input = read_input(input, input_file)?;
    let output = toolbox.call(tool, &input);
    println!("{}", output.content);
    debug!(tool, is_error = output.is_error, "call finished");
    Ok(if output.is_error {
        exit_codes::TOOL_FAILED
    } else {
        exit_codes::OK
    })
}

fn cmd_prompt(config_path: &Path, role: &str, system: Option<&str>) -> Result<i32> {
    let role = parse_role(role)?;
    let config = load_config(config_path)?;
    let rules = load_team_rules(&config.team_rules_path);
    println!("{}", rules.apply(system.unwrap_or(role.system_prompt())));
    Ok(exit_codes::OK)
}

fn parse_role(name: &str) -> Result<Role> {
    Role::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Role::ALL.iter().map(|role| role.name()).collect();
        anyhow!("unknown role '{name}' (expected one of: {})", known.join(", "))
    })
}

/// Tool input from `--input`, `--input-file`, or `{}` when neither is given.
fn read_input(input: Option<&str>, input_file: Option<&Path>) -> Result<Value> {
    let raw = match (input, input_file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
        (None, None) => return Ok(Value::Object(Default::default())),
    };
    serde_json::from_str(&raw).context("parse tool input as JSON")
}
