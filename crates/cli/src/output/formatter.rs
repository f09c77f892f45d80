//! Output formatter for console output
//!
//! Ensures consistent output across the report, errors and warnings.
//! Colors are applied only when enabled and the target stream is a terminal.

use console::style;

use super::OutputConfig;

/// Formatter for CLI output
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if colors are enabled on stdout
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && console::colors_enabled()
    }

    /// Check if colors are enabled on stderr
    pub fn colors_enabled_stderr(&self) -> bool {
        !self.config.no_color && console::colors_enabled_stderr()
    }

    /// Print rendered text to stdout as-is
    pub fn print(&self, text: &str) {
        print!("{text}");
    }

    /// Output an error message
    pub fn error(&self, message: &str) {
        let mark = style("✗").red().force_styling(self.colors_enabled_stderr());
        eprintln!("{mark} {message}");
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        let mark = style("⚠").yellow().force_styling(self.colors_enabled_stderr());
        eprintln!("{mark} {message}");
    }
}
