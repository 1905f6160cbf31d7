mod run;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let raw: Vec<String> = std::env::args().collect();
    let (options, args) = run::GlobalOptions::extract(&raw)?;
    init_tracing(options.verbose);
    run::as_cli(&args, &options)
}

/// Priority: RUST_LOG env var > --verbose flag > default (warn).
/// Logs go to stderr so report output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
