//! This is the main entry point for the `wheel-build` binary.

use std::time::Duration;

use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use miette::IntoDiagnostic;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use wheel_build::{
    build_from_args,
    console_utils::{IndicatifWriter, TracingFormatter, get_default_env_filter},
    opt::App,
};

fn main() -> miette::Result<()> {
    let args = App::parse();

    let multi_progress = MultiProgress::new();

    let env_filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        get_default_env_filter(args.verbose.tracing_level_filter()).into_diagnostic()?
    };

    // Setup tracing subscriber
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(IndicatifWriter::new(multi_progress.clone()))
                .event_format(TracingFormatter),
        )
        .init();

    let spinner = multi_progress.add(ProgressBar::new_spinner());
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").into_diagnostic()?);
    spinner.set_message(format!("Building wheel from {}", args.source.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = build_from_args(&args);
    spinner.finish_and_clear();

    let output = result?;
    println!("{}", output.path.display());

    Ok(())
}
