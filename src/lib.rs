//! `pls-docs` renders `pls` terminal sessions as HTML for the `pls` documentation site.
//!
//! It runs [`to-html`](https://github.com/Aloso/to-html/) with a `pls` command, then cleans up the
//! HTML that `to-html` prints so that it can be pasted straight into the docs:
//!
//! - lines echoing the shell command are removed,
//! - blank lines are replaced with an invisible spacer,
//! - leading whitespace is escaped so lines aren't de-dented,
//! - fallback colors are stripped from CSS custom properties,
//! - a zero-width space is inserted at the start of the second line.
//!
//! The library is a convenience for the `pls-docs` binary and shouldn't be considered a stable
//! API.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod clap;
pub mod cli;
mod cleanup;
mod clonable_command;
mod command_ext;
mod runner;
mod to_html;
mod tracing;

pub use cleanup::cleanup_html;
pub use cleanup::substitutions;
pub use cleanup::CleanupError;
pub use clonable_command::ClonableCommand;
pub use command_ext::CommandExt;
pub use crate::tracing::TracingOpts;
pub use runner::Runner;
pub use runner::SystemRunner;
pub use to_html::run_to_html;
pub use to_html::RunOpts;
pub use to_html::DEFAULT_PLS_BIN;
pub use to_html::DEFAULT_TO_HTML;
pub use to_html::PLS_BIN_VAR;
