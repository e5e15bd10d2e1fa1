//! Console messages with injected color configuration
//!
//! Warnings and errors are single lines, optionally wrapped in ANSI color
//! codes. Whether color is used is decided once at startup and passed in
//! through a [`Palette`], so formatting is deterministic under test.

use colored::Color;
use snet_core::SnetError;

/// Printed when `-c` is combined with `-a` or `-m`
pub const IGNORED_PAIR_WARNING: &str =
    "Addresses (-a) and Masks (-m) are ignored when you specify a CIDR (-c)";

/// Color selection for console and log output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub enabled: bool,
    pub warn: Color,
    pub error: Color,
}

impl Palette {
    /// Yellow warnings and red errors, painted only when `enabled`
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            warn: Color::Yellow,
            error: Color::Red,
        }
    }

    /// Wrap `text` in `color` followed by a reset, or return it unchanged
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            // Written directly so the injected `enabled` flag decides, not colored's global override.
            format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), text)
        } else {
            text.to_string()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Formats user-facing warning and error lines
pub struct Console {
    palette: Palette,
}

impl Console {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn warning(&self, message: &str) -> String {
        self.palette
            .paint(&format!("Warning: {}", message), self.palette.warn)
    }

    pub fn error(&self, err: &SnetError) -> String {
        self.palette
            .paint(&format!("Error: {}", err), self.palette.error)
    }
}
