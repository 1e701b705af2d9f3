//! Single-file rendering.
//!
//! Renders one template from a file or stdin and writes the result to a
//! derived path, an explicit path, or stdout. By default the source template
//! is deleted once the output has been written.

use crate::cli::RenderCli;
use crate::error::ConfigError;
use crate::template::{self, EngineExtension, RenderOptions, UndefinedPolicy};
use crate::vars::Variables;
use anyhow::{Context as _, Result};
use std::io::{Read as _, Write as _};
use std::path::PathBuf;

/// Suffix marking a file as a template.
///
/// The default output path is the input path with this suffix removed.
pub const TEMPLATE_SUFFIX: &str = ".tpl";

// ---------------------------------------------------------------------------
// Output target
// ---------------------------------------------------------------------------

/// Where rendered output should be written.
#[derive(Debug, PartialEq, Eq)]
enum OutputTarget {
    /// Write to the given path.
    File(PathBuf),
    /// Write to standard output.
    Stdout,
}

/// Derives the output target from the explicit flag or the input name.
///
/// An explicit `-` selects stdout. Without an explicit output, a file input
/// must end in [`TEMPLATE_SUFFIX`] and the output is the input with the
/// suffix removed. Stdin input without an explicit output goes to stdout.
fn output_target(args: &RenderCli) -> Result<OutputTarget, ConfigError> {
    if let Some(explicit) = &args.output_file {
        if explicit == "-" {
            return Ok(OutputTarget::Stdout);
        }
        return Ok(OutputTarget::File(PathBuf::from(explicit)));
    }

    let Some(input) = &args.input_file else {
        return Ok(OutputTarget::Stdout);
    };

    let raw = input.to_string_lossy().into_owned();
    if !raw.ends_with(TEMPLATE_SUFFIX) {
        return Err(ConfigError::OutputNameUnderivable {
            input: raw,
            suffix: TEMPLATE_SUFFIX,
        });
    }
    let stem_len = raw.len() - TEMPLATE_SUFFIX.len();
    if stem_len == 0 {
        return Err(ConfigError::EmptyOutputName { input: raw });
    }
    let mut stem = raw;
    stem.truncate(stem_len);
    Ok(OutputTarget::File(PathBuf::from(stem)))
}

/// Parses `--jinja2-extension` values, rejecting unknown names.
fn parse_extensions(names: &[String]) -> Result<Vec<EngineExtension>, ConfigError> {
    names.iter().map(|name| name.parse()).collect()
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Runs the single-file pipeline for the parsed arguments.
///
/// # Errors
///
/// Returns an error when the arguments are inconsistent, when the template
/// cannot be read or rendered, or when the output cannot be written.
pub fn run(args: &RenderCli) -> Result<()> {
    if args.keep_template && args.input_file.is_none() {
        return Err(ConfigError::KeepTemplateRequiresInput.into());
    }

    let extensions = parse_extensions(&args.jinja2_extension)?;
    let target = output_target(args)?;
    let options = RenderOptions {
        policy: if args.allow_missing {
            UndefinedPolicy::Lenient
        } else {
            UndefinedPolicy::Strict
        },
        search_paths: args.search_paths.clone(),
        reduce_blank_lines: args.reduce_multi_blank_lines,
        extensions,
    };

    let vars = Variables::from_env();
    tracing::debug!("captured {} environment variables", vars.len());

    let rendered = match &args.input_file {
        Some(path) => {
            tracing::debug!("rendering {}", path.display());
            template::render_file(path, &vars, &options)?
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("reading template from stdin")?;
            template::render_str(&source, &vars, &options)?
        }
    };

    match &target {
        OutputTarget::File(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        OutputTarget::Stdout => {
            std::io::stdout()
                .write_all(rendered.as_bytes())
                .context("writing rendered output to stdout")?;
        }
    }

    // The template is removed only after the output has been fully written,
    // so a render failure never loses the source.
    if let Some(path) = &args.input_file
        && !args.keep_template
    {
        std::fs::remove_file(path)
            .with_context(|| format!("removing template {}", path.display()))?;
        tracing::debug!("removed template {}", path.display());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser as _;

    fn args(argv: &[&str]) -> RenderCli {
        RenderCli::parse_from(argv)
    }

    // -----------------------------------------------------------------------
    // output_target
    // -----------------------------------------------------------------------

    #[test]
    fn output_derived_by_stripping_suffix() {
        let target = output_target(&args(&["envtpl", "config.yml.tpl"])).unwrap();
        assert_eq!(target, OutputTarget::File(PathBuf::from("config.yml")));
    }

    #[test]
    fn output_derivation_keeps_directories() {
        let target = output_target(&args(&["envtpl", "etc/app/config.yml.tpl"])).unwrap();
        assert_eq!(
            target,
            OutputTarget::File(PathBuf::from("etc/app/config.yml"))
        );
    }

    #[test]
    fn explicit_output_wins_over_derivation() {
        let target =
            output_target(&args(&["envtpl", "config.yml.tpl", "-o", "other.yml"])).unwrap();
        assert_eq!(target, OutputTarget::File(PathBuf::from("other.yml")));
    }

    #[test]
    fn dash_output_selects_stdout() {
        let target = output_target(&args(&["envtpl", "config.yml.tpl", "-o", "-"])).unwrap();
        assert_eq!(target, OutputTarget::Stdout);
    }

    #[test]
    fn stdin_without_output_selects_stdout() {
        let target = output_target(&args(&["envtpl"])).unwrap();
        assert_eq!(target, OutputTarget::Stdout);
    }

    #[test]
    fn input_without_suffix_is_rejected() {
        let err = output_target(&args(&["envtpl", "config.yml"])).unwrap_err();
        assert!(matches!(err, ConfigError::OutputNameUnderivable { .. }));
        assert!(err.to_string().contains("config.yml"));
    }

    #[test]
    fn bare_suffix_input_is_rejected() {
        let err = output_target(&args(&["envtpl", ".tpl"])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyOutputName { .. }));
    }

    // -----------------------------------------------------------------------
    // run argument validation
    // -----------------------------------------------------------------------

    #[test]
    fn keep_template_without_input_is_rejected() {
        let err = run(&args(&["envtpl", "--keep-template"])).unwrap_err();
        assert!(err.to_string().contains("--keep-template"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = run(&args(&["envtpl", "--jinja2-extension", "jinja2.ext.i18n"])).unwrap_err();
        assert!(err.to_string().contains("jinja2.ext.i18n"));
    }

    #[test]
    fn loopcontrols_extension_parses() {
        let parsed = parse_extensions(&["loopcontrols".to_string()]).unwrap();
        assert_eq!(parsed, vec![EngineExtension::LoopControls]);
    }
}
