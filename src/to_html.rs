//! Invoking `to-html` with a `pls` command.

use std::env::VarError;

use camino::Utf8PathBuf;
use itertools::Itertools;
use miette::miette;
use miette::WrapErr;

use crate::cleanup::cleanup_html;
use crate::clonable_command::ClonableCommand;
use crate::command_ext::CommandExt;
use crate::runner::Runner;

/// The environment variable naming the `pls` binary to record.
pub const PLS_BIN_VAR: &str = "PLS_BIN";

/// The `pls` binary recorded when [`PLS_BIN_VAR`] is unset.
pub const DEFAULT_PLS_BIN: &str = "pls";

/// The program which records the terminal session and renders it as HTML.
pub const DEFAULT_TO_HTML: &str = "to-html";

/// Options for [`run_to_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOpts {
    /// The `to-html` command. The `pls` invocation is appended as its last argument.
    pub to_html: ClonableCommand,
    /// The `pls` binary to record. If unset, this is read from [`PLS_BIN_VAR`] when the command is
    /// run.
    pub pls_bin: Option<String>,
    /// The working directory for `to-html`.
    pub current_dir: Option<Utf8PathBuf>,
    /// Extra environment variables for `to-html`.
    pub env: Vec<(String, String)>,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            to_html: ClonableCommand::new(DEFAULT_TO_HTML),
            pls_bin: None,
            current_dir: None,
            env: Vec::new(),
        }
    }
}

impl RunOpts {
    /// The `pls` binary to record.
    fn pls_bin(&self) -> miette::Result<String> {
        resolve_pls_bin(self.pls_bin.as_deref(), std::env::var(PLS_BIN_VAR))
    }

    /// Build the `to-html` command which records `pls` with the given arguments.
    ///
    /// `to-html` takes the whole `pls` invocation as a single argument.
    ///
    /// Errors if [`PLS_BIN_VAR`] is needed but isn't valid UTF-8.
    pub fn command(&self, args: &[impl AsRef<str>]) -> miette::Result<ClonableCommand> {
        let pls = format!(
            "{} {}",
            self.pls_bin()?,
            args.iter().map(AsRef::<str>::as_ref).join(" ")
        );

        let mut command = self.to_html.clone().arg(pls);
        if let Some(current_dir) = &self.current_dir {
            command = command.current_dir(current_dir.clone());
        }
        for (name, value) in &self.env {
            command = command.env(name, value);
        }
        Ok(command)
    }
}

fn resolve_pls_bin(
    explicit: Option<&str>,
    from_env: Result<String, VarError>,
) -> miette::Result<String> {
    if let Some(explicit) = explicit {
        return Ok(explicit.to_owned());
    }
    match from_env {
        Ok(pls_bin) => Ok(pls_bin),
        Err(VarError::NotPresent) => Ok(DEFAULT_PLS_BIN.to_owned()),
        Err(VarError::NotUnicode(value)) => {
            Err(miette!("`${PLS_BIN_VAR}` isn't valid UTF-8: {value:?}"))
        }
    }
}

/// Invoke `to-html` with a `pls` command and return the cleaned-up HTML.
///
/// `to-html` prints the HTML to stdout, which is then post-processed with
/// [`cleanup_html`](crate::cleanup_html) into something the docs site can use.
pub fn run_to_html(
    runner: &impl Runner,
    args: &[impl AsRef<str>],
    opts: &RunOpts,
) -> miette::Result<String> {
    let command = opts.command(args)?;
    tracing::info!("Running command {}", command.display());

    let html = runner.stdout(&command)?;
    tracing::debug!(bytes = html.len(), "Captured `to-html` output");

    cleanup_html(&html).wrap_err_with(|| format!("Failed to clean up HTML from `{command}`"))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    /// A [`Runner`] which records the commands it's given and returns canned output.
    struct FakeRunner {
        output: miette::Result<String>,
        commands: RefCell<Vec<ClonableCommand>>,
    }

    impl FakeRunner {
        fn new(output: &str) -> Self {
            Self {
                output: Ok(output.to_owned()),
                commands: Default::default(),
            }
        }

        fn failing() -> Self {
            Self {
                output: Err(miette!("`to-html` failed: exit status: 1")),
                commands: Default::default(),
            }
        }
    }

    impl Runner for FakeRunner {
        fn stdout(&self, command: &ClonableCommand) -> miette::Result<String> {
            self.commands.borrow_mut().push(command.clone());
            match &self.output {
                Ok(output) => Ok(output.clone()),
                Err(err) => Err(miette!("{err}")),
            }
        }
    }

    fn opts() -> RunOpts {
        RunOpts {
            pls_bin: Some("pls".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_command() {
        assert_eq!(
            opts().command(&["--det", "all"]).unwrap(),
            ClonableCommand::new("to-html").arg("pls --det all")
        );
    }

    #[test]
    fn test_command_no_args() {
        assert_eq!(
            opts().command(&[] as &[&str]).unwrap(),
            ClonableCommand::new("to-html").arg("pls ")
        );
    }

    #[test]
    fn test_command_forwards_options() {
        let opts = RunOpts {
            to_html: "to-html --no-prompt".parse().unwrap(),
            pls_bin: Some("target/release/pls".to_owned()),
            current_dir: Some("examples/bench".into()),
            env: vec![("COLUMNS".to_owned(), "80".to_owned())],
        };
        assert_eq!(
            opts.command(&["--icons", "false"]).unwrap(),
            ClonableCommand::new("to-html")
                .args(["--no-prompt", "target/release/pls --icons false"])
                .current_dir("examples/bench")
                .env("COLUMNS", "80")
        );
    }

    #[test]
    fn test_resolve_pls_bin() {
        assert_eq!(
            resolve_pls_bin(None, Err(VarError::NotPresent)).unwrap(),
            "pls"
        );
        assert_eq!(
            resolve_pls_bin(None, Ok("./pls".to_owned())).unwrap(),
            "./pls"
        );
        assert_eq!(
            resolve_pls_bin(Some("pls-dev"), Ok("./pls".to_owned())).unwrap(),
            "pls-dev"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_pls_bin_not_unicode() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let not_unicode = || VarError::NotUnicode(OsString::from_vec(b"pl\xffs".to_vec()));

        let err = resolve_pls_bin(None, Err(not_unicode())).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"`$PLS_BIN` isn't valid UTF-8: "pl\xFFs""#
        );

        // An explicit binary doesn't need the environment variable.
        assert_eq!(
            resolve_pls_bin(Some("pls"), Err(not_unicode())).unwrap(),
            "pls"
        );
    }

    #[test]
    fn test_run_to_html() {
        let runner = FakeRunner::new(
            "<span class='shell'>$ pls</span>\n\nfoo color:var(--x,#ffffff) bar\n baz",
        );
        assert_eq!(
            run_to_html(&runner, &["--det", "all"], &opts()).unwrap(),
            "<span style=\"opacity:0;\">&nbsp;</span>\n\u{200b}foo color:var(--x) bar\n&nbsp;baz"
        );
        assert_eq!(
            runner.commands.into_inner(),
            vec![ClonableCommand::new("to-html").arg("pls --det all")]
        );
    }

    #[test]
    fn test_run_to_html_execution_failure() {
        let runner = FakeRunner::failing();
        let err = run_to_html(&runner, &["--det", "all"], &opts()).unwrap_err();
        assert_eq!(err.to_string(), "`to-html` failed: exit status: 1");
        // Tried exactly once.
        assert_eq!(runner.commands.borrow().len(), 1);
    }

    #[test]
    fn test_run_to_html_malformed_output() {
        let runner = FakeRunner::new("<span class='shell'>$ pls</span>\n");
        let err = run_to_html(&runner, &["--det", "all"], &opts()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to clean up HTML from `to-html 'pls --det all'`"
        );
        assert!(err
            .chain()
            .any(|cause| cause.to_string().contains("at least 2 are needed")));
    }
}
