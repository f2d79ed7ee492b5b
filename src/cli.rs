//! CLI argument parsing for the documentation and lint commands.
//!
//! Each CI/CD provider is a subcommand. Unknown provider names are captured
//! rather than rejected by clap so they can be reported with a dedicated
//! message.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_OUT_DIR: &str = "docs";

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "aman",
    version,
    about = "Markdown documentation and linting for CI/CD manifests",
    after_help = "Supported providers:\n  github   Work with GitHub Actions and workflows\n\nExamples:\n  aman github --workflow . --out docs\n  aman github --action . --ai-sum --ai-model mistral\n  aman github --lint-ci github --workflow .\n  aman github --workflow . --diagram --index --out docs",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Github(GithubArgs),
    /// Any other provider name; always rejected.
    #[command(external_subcommand)]
    Other(Vec<String>),
}

/// Document or lint GitHub Actions workflows and actions.
#[derive(Parser, Debug)]
#[command(about = "Work with GitHub Actions and workflows")]
pub struct GithubArgs {
    /// Workflow file, directory to search, or '.' (repeatable)
    #[arg(long, value_name = "PATH")]
    pub workflow: Vec<PathBuf>,

    /// Action manifest file, directory to search, or '.' (repeatable)
    #[arg(long, value_name = "PATH")]
    pub action: Vec<PathBuf>,

    /// Output directory for Markdown files
    #[arg(long, short = 'o', value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// Generate a natural-language summary per manifest
    #[arg(long)]
    pub ai_sum: bool,

    /// Model used for summaries [default: mistral]
    #[arg(long, value_name = "NAME")]
    pub ai_model: Option<String>,

    /// Local summarizer command; reads the prompt on stdin ({model} is substituted)
    #[arg(long, value_name = "CMD")]
    pub lm_command: Option<String>,

    /// Validate and format YAML files in place for the given provider
    #[arg(long, value_name = "PROVIDER")]
    pub lint_ci: Option<String>,

    /// Print documentation links for GitHub Actions and exit
    #[arg(long)]
    pub docs: bool,

    /// Write INDEX.md listing the generated documents
    #[arg(long)]
    pub index: bool,

    /// Add a Mermaid job dependency diagram to workflow documents
    #[arg(long)]
    pub diagram: bool,

    /// Worker threads for per-file processing [default: available parallelism]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,
}
