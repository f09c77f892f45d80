//! Output formatting utilities
//!
//! This module renders the check report, prints errors and warnings, and
//! shows a spinner while the probes run.

mod formatter;
mod progress;
pub mod report;

pub use formatter::Formatter;
pub use progress::ProgressBar;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
    /// Disable the progress spinner
    pub no_progress: bool,
}
