//! Logging utilities with colored output.
//!
//! This module provides the `log!` macro for formatted terminal output with
//! colored module prefixes.
//!
//! # Example
//!
//! ```ignore
//! log!("compile"; "{} stylesheets", count);
//! log!("error"; "{}", err);
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{IsTerminal, Write, stderr, stdout},
    sync::{
        OnceLock,
        atomic::{AtomicBool, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Set once stdout is reserved for machine-readable output
static TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Calculate total prefix length for a module name.
///
/// Returns: `module.len() + 3` (for "[", "]", and trailing space)
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Send every later log line to stderr, leaving stdout to the caller.
pub fn route_to_stderr() {
    TO_STDERR.store(true, Ordering::Relaxed);
}

fn routed_to_stderr() -> bool {
    TO_STDERR.load(Ordering::Relaxed)
}

/// Log a message with a colored module prefix.
///
/// Single-line messages are truncated to the terminal width. Multi-line
/// messages (compiler output) are printed in full.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    let width = get_terminal_width() as usize;

    let max_msg_len = width.saturating_sub(calc_prefix_len(module.len()));
    let message = if message.contains('\n') {
        message
    } else {
        truncate_str(message, max_msg_len)
    };

    if routed_to_stderr() {
        let mut stderr = stderr().lock();
        let clear = stderr.is_terminal();
        write_line(&mut stderr, &prefix, message, clear);
    } else {
        let mut stdout = stdout().lock();
        let clear = stdout.is_terminal();
        write_line(&mut stdout, &prefix, message, clear);
    }
}

/// Write one prefixed line. `clear` wipes leftover progress text first and
/// is only wanted on a terminal.
fn write_line(out: &mut impl Write, prefix: &ColoredString, message: &str, clear: bool) {
    if clear {
        execute!(out, Clear(ClearType::UntilNewLine)).ok();
    }
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "watch" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        "skip" => prefix.bright_magenta().bold(),
        "deps" | "clean" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within max_len bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================
