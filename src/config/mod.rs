//! Configuration management for `lessify.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[paths]`   | Document root, LESS source tree, CSS output tree |
//! | `[compile]` | Date checks, compression, strictness, command    |
//!
//! # Example
//!
//! ```toml
//! [paths]
//! web = "web"
//! less = "less"
//! css = "css"
//!
//! [compile]
//! check_dependencies = true
//! compression = true
//! ```
//!
//! The config file is optional; every field has a default. The loaded value
//! is passed explicitly to each component, never looked up globally.

mod compile;
pub mod defaults;
mod error;
mod paths;

pub use compile::CompileConfig;
pub use error::ConfigError;
pub use paths::PathsConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing lessify.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct LessConfig {
    /// Absolute project root (set after loading)
    #[serde(skip_deserializing)]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip_deserializing)]
    pub config_path: PathBuf,

    /// Source and artifact locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Compilation settings
    #[serde(default)]
    pub compile: CompileConfig,
}

impl LessConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: LessConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in `{}`", path.display()))
    }

    /// Absolute document root.
    pub fn web_dir(&self) -> &Path {
        &self.paths.web
    }

    /// Absolute LESS source root.
    pub fn less_dir(&self) -> &Path {
        &self.paths.less
    }

    /// Absolute CSS artifact root.
    pub fn css_dir(&self) -> &Path {
        &self.paths.css
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.paths.web, cli.web.as_ref());
        Self::update_option(&mut self.paths.less, cli.less.as_ref());
        Self::update_option(&mut self.paths.css, cli.css.as_ref());

        if let Some(args) = cli.compile_args() {
            self.compile.update_with_args(args);
        }

        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        self.update_path_with_root(root, &cli.config);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every configured path to an absolute one.
    ///
    /// `web` is relative to the root; `less` and `css` are relative to `web`.
    fn update_path_with_root(&mut self, root: &Path, config: &Path) {
        let root = Self::normalize_path(&Self::expand_tilde(root));
        self.config_path = Self::normalize_path(&root.join(config));

        let web = Self::normalize_path(&root.join(Self::expand_tilde(&self.paths.web)));
        self.paths.less = Self::normalize_path(&web.join(Self::expand_tilde(&self.paths.less)));
        self.paths.css = Self::normalize_path(&web.join(Self::expand_tilde(&self.paths.css)));
        self.paths.web = web;
        self.root = root;
    }

    /// Expand a leading `~` to the home directory.
    fn expand_tilde(path: &Path) -> PathBuf {
        match path.to_str() {
            Some(text) => PathBuf::from(shellexpand::tilde(text).into_owned()),
            None => path.to_path_buf(),
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self, command: &Commands) -> Result<()> {
        match command {
            Commands::Compile { .. } | Commands::Watch { .. } => {
                Self::check_dir("[paths.web]", self.web_dir())?;
                Self::check_dir("[paths.less]", self.less_dir())?;
                Self::check_command_installed("[compile.command]", &self.compile.command)?;
            }
            Commands::Deps { .. } => Self::check_dir("[paths.web]", self.web_dir())?,
            Commands::Clean | Commands::Info => {}
        }
        Ok(())
    }

    fn check_dir(field: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            bail!(ConfigError::Validation(format!(
                "{field} `{}` not found",
                path.display()
            )));
        }
        if !path.is_dir() {
            bail!(ConfigError::Validation(format!(
                "{field} `{}` is not a directory",
                path.display()
            )));
        }
        Ok(())
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        let Some(cmd) = command.first() else {
            bail!(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        };

        which::which(cmd)
            .with_context(|| format!("`{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
