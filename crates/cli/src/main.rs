//! s3checker - AWS S3 permission checker
//!
//! Probes a bucket with the current credentials and reports which CockroachDB
//! capabilities the granted access supports.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod exit_code;
mod output;

use commands::Cli;

/// Log directives applied by `--debug`: SDK requests, responses and signing
const DEBUG_DIRECTIVES: &str = "s3checker=debug,sc_core=debug,sc_s3=debug,\
aws_smithy_runtime=trace,aws_smithy_runtime_api=trace,aws_sigv4=trace,\
aws_config=debug,hyper=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.check.debug {
        EnvFilter::new(DEBUG_DIRECTIVES)
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
