//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lessify: compile stale LESS stylesheets to CSS
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: lessify.toml)
    #[arg(short = 'C', long, default_value = "lessify.toml")]
    pub config: PathBuf,

    /// Document root that absolute imports resolve against (relative to project root)
    #[arg(short, long)]
    pub web: Option<PathBuf>,

    /// LESS source directory (relative to the document root)
    #[arg(short, long)]
    pub less: Option<PathBuf>,

    /// Compiled CSS directory (relative to the document root)
    #[arg(short, long)]
    pub css: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared arguments for Compile and Watch commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CompileArgs {
    /// Recompile every stylesheet, ignoring modification dates
    #[arg(short, long)]
    pub force: bool,

    /// Strip whitespace from the compiled CSS
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub compress: Option<bool>,

    /// Abort on the first compiler error
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub strict: Option<bool>,

    /// Follow @import statements when comparing dates
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub dependencies: Option<bool>,

    /// Print the compilation records as JSON after the pass
    #[arg(long)]
    pub json: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile every stale stylesheet once
    Compile {
        #[command(flatten)]
        args: CompileArgs,
    },

    /// Compile, then recompile whenever a stylesheet changes
    Watch {
        #[command(flatten)]
        args: CompileArgs,
    },

    /// Print the @import dependencies of a stylesheet
    Deps {
        /// the stylesheet, absolute or relative to the document root
        file: PathBuf,
    },

    /// Remove CSS files generated by lessify
    Clean,

    /// Print the effective configuration
    Info,
}

impl Cli {
    /// Compile arguments of the current command, if it takes any.
    pub const fn compile_args(&self) -> Option<&CompileArgs> {
        match &self.command {
            Commands::Compile { args } | Commands::Watch { args } => Some(args),
            _ => None,
        }
    }
}
