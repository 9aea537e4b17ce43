//! `[compile]` section configuration.
//!
//! Controls when stylesheets are recompiled and what happens to the output.

use super::defaults;
use crate::cli::CompileArgs;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[compile]` section in lessify.toml.
///
/// # Example
/// ```toml
/// [compile]
/// check_dates = true          # Skip stylesheets whose CSS is newer
/// check_dependencies = true   # Include @import targets in the date check
/// compression = false         # Strip whitespace from output
/// strict = true               # Abort the pass on the first compiler error
/// command = ["lessc"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CompileConfig {
    /// Compare modification dates before compiling.
    /// When false every stylesheet is recompiled on every pass.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub check_dates: bool,

    /// Follow `@import` statements when comparing dates.
    /// When false only the entry file's own date counts.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub check_dependencies: bool,

    /// Strip newlines, tabs and double spaces from compiled CSS.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub compression: bool,

    /// Abort the pass on the first compiler failure instead of logging it.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub strict: bool,

    /// Compiler command, invoked as `<command...> <source> <dest>`.
    #[serde(default = "defaults::compile::command")]
    #[educe(Default = defaults::compile::command())]
    pub command: Vec<String>,
}

impl CompileConfig {
    /// Apply CLI overrides for a compile or watch run.
    pub fn update_with_args(&mut self, args: &CompileArgs) {
        if args.force {
            self.check_dates = false;
        }
        update_option(&mut self.compression, args.compress.as_ref());
        update_option(&mut self.strict, args.strict.as_ref());
        update_option(&mut self.check_dependencies, args.dependencies.as_ref());
    }
}

/// Update config option if CLI value is provided
fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
    if let Some(option) = cli_option {
        *config_option = option.clone();
    }
}
