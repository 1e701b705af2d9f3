//! Post-processing of rendered output.
//!
//! Two normalisation steps run after the engine: trailing-newline repair
//! (always) and blank-line collapsing (opt-in via
//! `--reduce-multi-blank-lines`).

use regex::Regex;
use std::sync::LazyLock;

/// A run of one-or-more blank or whitespace-only lines between content.
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"\n\s*\n"));

/// A blank line-run at the very start of the text.
static LEADING_BLANK: LazyLock<Regex> = LazyLock::new(|| compile(r"^\n\s*\n"));

/// Compiles a pattern literal known to be valid.
#[allow(clippy::unwrap_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Applies both normalisation steps to `rendered`.
pub(super) fn apply(source: &str, rendered: String, reduce_blank_lines: bool) -> String {
    let repaired = restore_trailing_newline(source, rendered);
    if reduce_blank_lines {
        collapse_blank_lines(&repaired)
    } else {
        repaired
    }
}

/// The engine strips a single trailing newline from the template source.
/// Restore it when the source's final line was empty and the output's is
/// not, so rendering a newline-terminated file yields a newline-terminated
/// file.
fn restore_trailing_newline(source: &str, mut rendered: String) -> String {
    let source_ends_blank = source.is_empty() || source.ends_with('\n');
    let rendered_ends_blank = rendered.is_empty() || rendered.ends_with('\n');
    if source_ends_blank && !rendered_ends_blank {
        rendered.push('\n');
    }
    rendered
}

/// Replaces every blank line-run separating content with a single blank
/// line, then reduces a leading blank run to one newline.
fn collapse_blank_lines(text: &str) -> String {
    let collapsed = BLANK_RUN.replace_all(text, "\n\n");
    LEADING_BLANK.replace(&collapsed, "\n").into_owned()
}
