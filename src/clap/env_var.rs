//! Adapter for parsing `NAME=VALUE` environment variable assignments.

use std::fmt::Display;
use std::str::FromStr;

use clap::builder::StringValueParser;
use clap::builder::TypedValueParser;
use clap::builder::ValueParserFactory;
use miette::miette;

/// An environment variable assignment, like `COLUMNS=80`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    /// The variable's name.
    pub name: String,
    /// The variable's value. May be empty.
    pub value: String,
}

impl FromStr for EnvVar {
    type Err = miette::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            None => Err(miette!("Expected `NAME=VALUE`")),
            Some(("", _)) => Err(miette!("Variable name is empty")),
            Some((name, value)) => Ok(Self {
                name: name.to_owned(),
                value: value.to_owned(),
            }),
        }
    }
}

impl Display for EnvVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl From<EnvVar> for (String, String) {
    fn from(value: EnvVar) -> Self {
        (value.name, value.value)
    }
}

/// [`clap`] parser for [`EnvVar`] values.
#[derive(Default, Clone)]
pub struct EnvVarParser {
    inner: StringValueParser,
}

impl TypedValueParser for EnvVarParser {
    type Value = EnvVar;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        self.inner.parse_ref(cmd, arg, value).and_then(|str| {
            str.parse::<EnvVar>()
                .map_err(|err| super::value_validation_error(arg, &str, err))
        })
    }
}

impl ValueParserFactory for EnvVar {
    type Parser = EnvVarParser;

    fn value_parser() -> Self::Parser {
        Self::Parser::default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "COLUMNS=80".parse::<EnvVar>().unwrap(),
            EnvVar {
                name: "COLUMNS".to_owned(),
                value: "80".to_owned(),
            }
        );
        // Only the first `=` separates the name from the value.
        assert_eq!(
            "LS_COLORS=di=34:ln=36".parse::<EnvVar>().unwrap(),
            EnvVar {
                name: "LS_COLORS".to_owned(),
                value: "di=34:ln=36".to_owned(),
            }
        );
        assert_eq!(
            "NO_COLOR=".parse::<EnvVar>().unwrap(),
            EnvVar {
                name: "NO_COLOR".to_owned(),
                value: "".to_owned(),
            }
        );

        // Negative cases.
        assert!("COLUMNS".parse::<EnvVar>().is_err());
        assert!("=80".parse::<EnvVar>().is_err());
    }
}
