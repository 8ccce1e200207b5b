//! Adapter for parsing the `$RUST_BACKTRACE` environment variable.

use std::fmt::Display;

use clap::builder::PossibleValue;

/// Whether to display backtraces in errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RustBacktrace {
    /// Hide backtraces in errors.
    #[default]
    Off,
    /// Display backtraces in errors.
    On,
    /// Display full backtraces in errors, including less-useful stack frames.
    Full,
}

impl clap::ValueEnum for RustBacktrace {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Off, Self::On, Self::Full]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = PossibleValue::new(self.as_str());
        Some(match self {
            Self::Off => value.help("Hide backtraces in errors"),
            Self::On => value.help("Display backtraces in errors"),
            Self::Full => value.help("Display backtraces with all stack frames in errors"),
        })
    }
}

impl RustBacktrace {
    /// The value of `$RUST_BACKTRACE` for this setting.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "0",
            Self::On => "1",
            Self::Full => "full",
        }
    }
}

impl Display for RustBacktrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
