//! Logging output that plays well with progress bars

use indicatif::MultiProgress;
use std::fmt::Write as _;
use std::io::{self, Write};
use tracing_core::{Event, LevelFilter, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt::{
        FmtContext, FormatEvent, FormatFields, MakeWriter,
        format::{self, Format},
    },
    registry::LookupSpan,
};

/// Targets whose info events are printed without level and target prefix
const PLAIN_TARGETS: [&str; 2] = ["wheel_build", "wheel_build_package"];

/// Writes to stderr, hiding the progress bars while a line is written
#[derive(Clone)]
pub struct IndicatifWriter {
    progress_bars: MultiProgress,
}

impl IndicatifWriter {
    /// Create a writer that suspends the given progress bars
    pub fn new(pb: MultiProgress) -> Self {
        Self { progress_bars: pb }
    }
}

impl io::Write for IndicatifWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress_bars.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.progress_bars.suspend(|| io::stderr().flush())
    }
}

impl<'a> MakeWriter<'a> for IndicatifWriter {
    type Writer = IndicatifWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Prints info events of this tool as plain messages and everything else
/// in the default format
pub struct TracingFormatter;

impl<S, N> FormatEvent<S, N> for TracingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        if *metadata.level() == tracing_core::metadata::Level::INFO
            && is_plain_target(metadata.target())
        {
            ctx.format_fields(writer.by_ref(), event)?;
            writeln!(writer)
        } else {
            let default_format = Format::default().without_time();
            default_format.format_event(ctx, writer, event)
        }
    }
}

fn is_plain_target(target: &str) -> bool {
    PLAIN_TARGETS.iter().any(|plain| {
        target == *plain
            || target
                .strip_prefix(plain)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

/// Constructs a default [`EnvFilter`] that is used when the user did not specify a custom RUST_LOG.
pub fn get_default_env_filter(
    verbose: LevelFilter,
) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    let level = verbose.to_string().to_lowercase();

    let mut result = EnvFilter::builder().parse(format!("{}={level}", PLAIN_TARGETS[0]))?;
    for target in &PLAIN_TARGETS[1..] {
        result = result.add_directive(format!("{target}={level}").parse::<Directive>()?);
    }

    Ok(result)
}
