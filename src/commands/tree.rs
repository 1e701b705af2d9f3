//! Recursive directory rendering.
//!
//! Mirrors a source tree into a target directory, rendering every text file
//! as a template and copying binary files byte for byte. Source files are
//! never modified or removed.

use crate::cli::TreeCli;
use crate::error::ConfigError;
use crate::template::{RenderOptions, UndefinedPolicy};
use crate::vars::Variables;
use crate::walker;
use anyhow::{Context as _, Result};
use std::path::absolute;

/// Splits each `KEY,VALUE` argument on its first comma.
///
/// The value may itself contain commas. An argument without a comma is
/// rejected rather than silently dropped.
fn parse_extra_vars(raw: &[String]) -> Result<Vec<(String, String)>, ConfigError> {
    raw.iter()
        .map(|argument| {
            argument
                .split_once(',')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| ConfigError::InvalidExtraVar {
                    argument: argument.clone(),
                })
        })
        .collect()
}

/// Runs the directory pipeline for the parsed arguments.
///
/// # Errors
///
/// Returns an error when the source is not a directory, when an
/// `--extra-var` argument is malformed, or when any file in the tree fails
/// to render or copy.
pub fn run(args: &TreeCli) -> Result<()> {
    let source = absolute(&args.source_directory)
        .with_context(|| format!("resolving {}", args.source_directory.display()))?;
    let target = absolute(&args.target_directory)
        .with_context(|| format!("resolving {}", args.target_directory.display()))?;

    if !source.is_dir() {
        return Err(ConfigError::SourceNotDirectory {
            path: source.display().to_string(),
        }
        .into());
    }

    let overrides = parse_extra_vars(&args.extra_vars)?;
    let vars = Variables::from_env().with_overrides(overrides);
    let options = RenderOptions {
        policy: if args.die_on_missing {
            UndefinedPolicy::Strict
        } else {
            UndefinedPolicy::Lenient
        },
        search_paths: args.extra_search_paths.clone(),
        reduce_blank_lines: false,
        extensions: Vec::new(),
    };

    std::fs::create_dir_all(&target)
        .with_context(|| format!("creating target directory {}", target.display()))?;

    tracing::debug!("mirroring {} into {}", source.display(), target.display());
    walker::mirror_tree(&source, &target, &vars, &options)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
