//! `[paths]` section configuration.
//!
//! Sources live under `less`, artifacts under the parallel `css` tree. Both
//! are relative to `web`, the document root that absolute `@import` targets
//! are resolved against.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[paths]` section in lessify.toml.
///
/// # Example
/// ```toml
/// [paths]
/// web = "public"      # Document root
/// less = "styles"     # → public/styles
/// css = "css"         # → public/css
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Document root, relative to the project root.
    #[serde(default = "defaults::paths::web")]
    #[educe(Default = defaults::paths::web())]
    pub web: PathBuf,

    /// LESS source tree, relative to `web`.
    #[serde(default = "defaults::paths::less")]
    #[educe(Default = defaults::paths::less())]
    pub less: PathBuf,

    /// Compiled CSS tree, relative to `web`.
    #[serde(default = "defaults::paths::css")]
    #[educe(Default = defaults::paths::css())]
    pub css: PathBuf,
}
