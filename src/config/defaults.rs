//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn web() -> PathBuf {
        "web".into()
    }

    pub fn less() -> PathBuf {
        "less".into()
    }

    pub fn css() -> PathBuf {
        "css".into()
    }
}

// ============================================================================
// [compile] Section Defaults
// ============================================================================

pub mod compile {
    pub fn command() -> Vec<String> {
        vec!["lessc".into()]
    }
}
