//! Domain-specific error types for the rendering pipeline.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors ([`ConfigError`], [`TemplateError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError   — fatal CLI usage errors (output derivation, extra vars)
//! TemplateError — rendering failures, classified by engine error kind
//! ```

use minijinja::ErrorKind;
use thiserror::Error;

/// Fatal usage errors raised before any rendering happens.
///
/// These correspond to CLI invocations that cannot be acted on at all, as
/// opposed to [`TemplateError`] which covers failures while rendering.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `--keep-template` was combined with stdin input.
    #[error("--keep-template requires an input file")]
    KeepTemplateRequiresInput,

    /// No `-o` was given and the input name does not end with the template
    /// suffix, so no output name can be derived.
    #[error("Cannot derive an output filename: '{input}' does not end with '{suffix}'")]
    OutputNameUnderivable {
        /// The input path as given on the command line.
        input: String,
        /// The template suffix that was expected.
        suffix: &'static str,
    },

    /// Stripping the template suffix from the input name left nothing.
    #[error("Deriving an output filename from '{input}' leaves an empty name")]
    EmptyOutputName {
        /// The input path as given on the command line.
        input: String,
    },

    /// A `--jinja2-extension` argument named an unknown extension.
    #[error("Unsupported template engine extension '{name}': supported extensions are {supported}")]
    UnsupportedExtension {
        /// The extension name as given on the command line.
        name: String,
        /// Comma-separated list of supported extension names.
        supported: &'static str,
    },

    /// An `--extra-var` argument did not contain a comma separator.
    #[error("Invalid extra variable '{argument}': expected KEY,VALUE")]
    InvalidExtraVar {
        /// The argument as given on the command line.
        argument: String,
    },

    /// The source path given to the recursive mode is not a directory.
    #[error("Source path '{path}' is not a directory")]
    SourceNotDirectory {
        /// The source path as given on the command line.
        path: String,
    },
}

/// Errors that arise while loading or rendering a template.
///
/// Engine failures are classified by [`minijinja::ErrorKind`] so callers and
/// tests can distinguish undefined-variable aborts and unresolved includes
/// from other rendering failures; see [`TemplateError::from_render`].
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A template referenced an undefined variable under the strict policy.
    /// Carries the engine's diagnostic text (name and location if known).
    #[error("Undefined variable: {0}")]
    Undefined(String),

    /// The primary template or a referenced include/parent template could
    /// not be located on any search path.
    #[error("{0}")]
    NotFound(String),

    /// Any other engine failure: syntax errors, helper failures (malformed
    /// JSON, bad glob pattern, failed `shell` command), type errors.
    #[error(transparent)]
    Render(minijinja::Error),

    /// The template source could not be read.
    #[error("IO error reading template {path}: {source}")]
    Io {
        /// Path to the template that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl TemplateError {
    /// Classifies an engine error into the variants above.
    ///
    /// Undefined-variable and template-not-found failures get their own
    /// variants; everything else stays a [`TemplateError::Render`].
    #[must_use]
    pub fn from_render(err: minijinja::Error) -> Self {
        match err.kind() {
            ErrorKind::UndefinedError => Self::Undefined(err.to_string()),
            ErrorKind::TemplateNotFound => Self::NotFound(err.to_string()),
            _ => Self::Render(err),
        }
    }
}
