use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt::Display;
use std::process::Command;
use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::builder::StringValueParser;
use clap::builder::TypedValueParser;
use clap::builder::ValueParserFactory;
use miette::miette;
use miette::Context;
use miette::IntoDiagnostic;

use crate::command_ext::CommandExt;

/// Like [`std::process::Command`], but it implements [`Clone`] and [`PartialEq`], so commands can
/// be built up, inspected, and compared before they're run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClonableCommand {
    /// The program to be executed.
    pub program: OsString,
    args: Vec<OsString>,
    current_dir: Option<Utf8PathBuf>,
    env: BTreeMap<OsString, OsString>,
}

impl ClonableCommand {
    /// Create a new [`ClonableCommand`] from the given program name.
    ///
    /// See [`Command::new`].
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Add an argument to this command. See [`Command::arg`].
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add arguments to this command. See [`Command::args`].
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Set the working directory for the command. See [`Command::current_dir`].
    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Set an environment variable for the command. See [`Command::env`].
    pub fn env(mut self, name: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Create a new [`std::process::Command`] from this command's configuration.
    pub fn as_std(&self) -> Command {
        let mut ret = Command::new(&self.program);

        ret.args(&self.args);
        if let Some(current_dir) = self.current_dir.as_deref() {
            ret.current_dir(current_dir);
        }
        ret.envs(&self.env);

        ret
    }
}

impl FromStr for ClonableCommand {
    type Err = miette::Report;

    fn from_str(shell_command: &str) -> Result<Self, Self::Err> {
        let tokens = shell_words::split(shell_command.trim())
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to split shell command: {shell_command:?}"))?;

        match &*tokens {
            [] => Err(miette!("Command has no program: {shell_command:?}")),
            [program, args @ ..] => Ok(Self::new(program).args(args)),
        }
    }
}

impl Display for ClonableCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens = std::iter::once(self.program.to_string_lossy())
            .chain(self.args.iter().map(|arg| arg.to_string_lossy()));

        write!(f, "{}", shell_words::join(tokens))
    }
}

impl CommandExt for ClonableCommand {
    fn display(&self) -> String {
        self.to_string()
    }
}

/// [`clap`] parser for [`ClonableCommand`] values.
#[derive(Default, Clone)]
pub struct ClonableCommandParser {
    inner: StringValueParser,
}

impl TypedValueParser for ClonableCommandParser {
    type Value = ClonableCommand;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        self.inner.parse_ref(cmd, arg, value).and_then(|str| {
            str.parse::<ClonableCommand>()
                .map_err(|err| crate::clap::value_validation_error(arg, &str, format!("{err:?}")))
        })
    }
}

impl ValueParserFactory for ClonableCommand {
    type Parser = ClonableCommandParser;

    fn value_parser() -> Self::Parser {
        Self::Parser::default()
    }
}
