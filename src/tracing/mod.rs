//! Extensions and utilities for the [`tracing`] crate.

use miette::IntoDiagnostic;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

use crate::cli::Opts;

/// Options for initializing the [`tracing`] logging framework. This is like a lower-effort builder
/// interface, mostly provided because Rust tragically lacks named arguments.
#[derive(Debug, Clone)]
pub struct TracingOpts<'opts> {
    /// Filter directives to control which events are logged.
    pub filter_directives: &'opts str,
    /// Whether to color log output.
    pub color: bool,
}

impl<'opts> TracingOpts<'opts> {
    /// Construct options for initializing the [`tracing`] logging framework from parsed
    /// commmand-line interface arguments as [`Opts`].
    pub fn from_cli(opts: &'opts Opts) -> Self {
        Self {
            filter_directives: &opts.logging.log_filter,
            color: supports_color::on(supports_color::Stream::Stderr).is_some(),
        }
    }

    /// Initialize the logging framework.
    ///
    /// Everything is logged to stderr; stdout is reserved for the rendered HTML.
    pub fn install(&self) -> miette::Result<()> {
        let env_filter = EnvFilter::try_new(self.filter_directives)
            .or_else(|_| EnvFilter::try_from_default_env())
            .or_else(|_| EnvFilter::try_new("info"))
            .into_diagnostic()?;

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(self.color)
            .with_target(false)
            .without_time()
            .with_filter(env_filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .into_diagnostic()?;

        Ok(())
    }
}
