//! Command-line argument parser and argument access.

use camino::Utf8PathBuf;
use clap::Parser;
use clap::Subcommand;

use crate::clap::EnvVar;
use crate::clap::RustBacktrace;
use crate::clonable_command::ClonableCommand;
use crate::to_html::RunOpts;

/// Render `pls` terminal sessions as HTML for the `pls` documentation.
///
/// The cleaned-up HTML is printed to stdout; logs are printed to stderr.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
#[command(max_term_width = 100)]
pub struct Opts {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,

    /// Write the HTML to this file instead of stdout.
    #[arg(long, short, global = true)]
    pub output: Option<Utf8PathBuf>,

    /// Options to modify logging and error-handling behavior.
    #[command(flatten)]
    pub logging: LoggingOpts,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Record `pls` with `to-html` and clean up the HTML it prints.
    Render(RenderOpts),
    /// Clean up HTML that `to-html` printed earlier.
    Clean(CleanOpts),
}

/// Options for recording `pls`.
#[derive(Debug, Clone, clap::Args)]
pub struct RenderOpts {
    /// A shell command which records a terminal session and prints it as HTML.
    ///
    /// May contain quoted arguments which will be parsed in a `sh`-like manner. The `pls` command
    /// is passed as the last argument.
    #[arg(long, env = "TO_HTML", default_value = "to-html")]
    pub to_html: ClonableCommand,

    /// The `pls` binary to record.
    ///
    /// Defaults to `$PLS_BIN`, or `pls` if that's unset. Environment variables like `PLS_BIN` and
    /// `TO_HTML` may also be set in a `.env` file in the current directory.
    #[arg(long)]
    pub pls_bin: Option<String>,

    /// The working directory for `to-html`.
    #[arg(long)]
    pub current_dir: Option<Utf8PathBuf>,

    /// Set an environment variable for `to-html`. Can be given multiple times.
    #[arg(long, value_name = "NAME=VALUE")]
    pub env: Vec<EnvVar>,

    /// Arguments to pass to `pls`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl RenderOpts {
    /// Options for [`run_to_html`](crate::run_to_html).
    pub fn run_opts(&self) -> RunOpts {
        RunOpts {
            to_html: self.to_html.clone(),
            pls_bin: self.pls_bin.clone(),
            current_dir: self.current_dir.clone(),
            env: self.env.iter().cloned().map(Into::into).collect(),
        }
    }
}

/// Options for cleaning up existing HTML.
#[derive(Debug, Clone, clap::Args)]
pub struct CleanOpts {
    /// A file containing HTML printed by `to-html`. Defaults to stdin.
    #[arg(long, short)]
    pub input: Option<Utf8PathBuf>,
}

/// Options to modify logging and error-handling behavior.
#[derive(Debug, Clone, clap::Args)]
#[command(next_help_heading = "Logging options")]
pub struct LoggingOpts {
    #[allow(rustdoc::bare_urls)]
    /// Log filter.
    ///
    /// Can be any of "error", "warn", "info", "debug", or "trace". Supports more granular
    /// filtering, as well. See:
    /// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
    ///
    /// Falls back to `$RUST_LOG` if invalid.
    #[arg(long, default_value = "pls_docs=info")]
    pub log_filter: String,

    /// How to display backtraces in error messages.
    #[arg(long, env = "RUST_BACKTRACE", default_value = "0")]
    pub backtrace: RustBacktrace,
}

impl Opts {
    /// Perform late initialization of the command-line arguments. If `init` isn't called before
    /// the arguments are used, the behavior is undefined.
    pub fn init(&mut self) {
        // This helps `miette` see the option, which is provided mostly for documentation.
        std::env::set_var("RUST_BACKTRACE", self.logging.backtrace.as_str());
    }
}
