//! CLI parse: clap types for strata. No behavior; definitions only.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Strata - hierarchical settings resolution
#[derive(Parser)]
#[command(name = "strata", version)]
#[command(about = "Resolve studio, project and task settings over schema defaults")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (skips global and workspace discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override document directory (takes precedence over overrides.root)
    #[arg(long, global = true)]
    pub overrides: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

/// Which context to resolve for; omit both for the studio context
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    #[arg(long)]
    pub project: Option<String>,

    #[arg(long, requires = "project")]
    pub task: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved settings tree, or the value at one path
    Resolve {
        #[command(flatten)]
        context: ContextArgs,
        /// Dotted path into the tree
        #[arg(long)]
        path: Option<String>,
    },
    /// List publish plugins with their control flags
    Plugins {
        #[command(flatten)]
        context: ContextArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Select a named preset for a plugin
    Preset {
        #[command(flatten)]
        context: ContextArgs,
        #[arg(long)]
        plugin: String,
        #[arg(long)]
        key: String,
    },
    /// Describe the schema node at a path
    Describe {
        /// Dotted path; the root when omitted
        path: Option<String>,
    },
    /// Validate an override document without loading it
    Check {
        /// JSON or TOML document
        file: PathBuf,
    },
    /// Show which layer supplies the value at a path
    Explain {
        #[command(flatten)]
        context: ContextArgs,
        path: String,
    },
}
