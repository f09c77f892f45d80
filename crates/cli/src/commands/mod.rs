//! CLI command definitions and execution
//!
//! s3checker has a single command, so the check flags are flattened into the
//! top-level parser next to the output flags.

use clap::Parser;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod check;

pub use check::CheckArgs;

/// s3checker - AWS S3 permission checker
///
/// Verifies that the current credentials can list, write and read objects in a
/// bucket, and reports which CockroachDB features that access is sufficient for.
#[derive(Parser, Debug)]
#[command(name = "s3checker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub check: CheckArgs,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, default_value = "false")]
    pub no_progress: bool,
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        no_color: cli.no_color,
        no_progress: cli.no_progress,
    };

    check::execute(cli.check, output_config).await
}
