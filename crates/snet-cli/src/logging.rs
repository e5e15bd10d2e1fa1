use colored::Color;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::console::Palette;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "SNET_LOG";

/// Compact `[+] message` event format
pub struct SnetFormatter {
    palette: Palette,
}

impl SnetFormatter {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    fn symbol(&self, level: &Level) -> String {
        let (symbol, color) = match *level {
            Level::TRACE => ("[ ]", Color::BrightBlack),
            Level::DEBUG => ("[?]", Color::Blue),
            Level::INFO => ("[+]", Color::Green),
            Level::WARN => ("[*]", self.palette.warn),
            Level::ERROR => ("[-]", self.palette.error),
        };
        self.palette.paint(symbol, color)
    }
}

impl<S, N> FormatEvent<S, N> for SnetFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "{} ", self.symbol(event.metadata().level()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Install the stderr subscriber
///
/// `SNET_LOG` takes precedence; otherwise `debug` when verbose, else `warn`.
pub fn init(verbose: bool, palette: Palette) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    // A subscriber may already be set when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(SnetFormatter::new(palette))
        .try_init();
}
