//! Post-processing for the HTML printed by `to-html`.

use std::sync::OnceLock;

use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

/// `to-html` wraps the command given to the shell in this element.
const SHELL_MARKER: &str = "<span class='shell'>";

/// Replacement for blank lines, so that the docs site keeps the vertical spacing.
const BLANK_LINE: &str = r#"<span style="opacity:0;">&nbsp;</span>"#;

const NBSP: &str = "&nbsp;";

const ZERO_WIDTH_SPACE: char = '\u{200b}';

/// The HTML printed by `to-html` couldn't be cleaned up.
#[derive(Debug, Error, Diagnostic)]
pub enum CleanupError {
    /// Fewer than two lines were left after removing the shell command lines.
    #[error("`to-html` output has {lines} line(s) after removing shell commands, but at least 2 are needed")]
    #[diagnostic(
        code(pls_docs::too_few_lines),
        help("Check that `to-html` printed the rendered session and not just the command")
    )]
    TooFewLines {
        /// How many lines were left.
        lines: usize,
    },
}

fn line_ending_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n|\r|\n").unwrap())
}

fn leading_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s").unwrap())
}

fn color_fallback_re() -> &'static Regex {
    // `to-html` always writes fallback colors as lowercase hex.
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"color:var\(--(?P<color>\w+),#[0-9a-f]+\)").unwrap())
}

/// Clean up the HTML generated by `to-html` to make it fit for pasting into the `pls`
/// documentation.
///
/// Lines containing the command given to the shell are removed, blank lines are replaced with an
/// invisible spacer, the remaining lines go through [`substitutions`], and a zero-width space is
/// inserted at the start of the second line.
///
/// Lines may end in `\n`, `\r\n`, or `\r`; the output always uses `\n`.
///
/// Errors if fewer than two lines are left after removing the shell command lines.
pub fn cleanup_html(html: &str) -> Result<String, CleanupError> {
    let mut lines = line_ending_re()
        .split(html)
        .filter(|line| !line.contains(SHELL_MARKER))
        .map(|line| {
            if line.is_empty() {
                BLANK_LINE.to_owned()
            } else {
                substitutions(line)
            }
        })
        .collect::<Vec<_>>();

    match lines.get_mut(1) {
        Some(second) => second.insert(0, ZERO_WIDTH_SPACE),
        None => return Err(CleanupError::TooFewLines { lines: lines.len() }),
    }

    Ok(lines.join("\n"))
}

/// Perform substitutions on one line of HTML generated by `to-html`.
///
/// The first leading whitespace character is replaced with `&nbsp;` so the line isn't de-dented,
/// and fallback values are removed from `color:var(--name,#hex)` rules.
pub fn substitutions(line: &str) -> String {
    let line = leading_space_re().replace(line, NBSP);
    color_fallback_re()
        .replace_all(&line, "color:var(--${color})")
        .into_owned()
}
