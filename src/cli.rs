//! Command-line argument definitions for the two binaries.

use clap::Parser;
use std::path::PathBuf;

/// Build version string: release version injected at build time, falling
/// back to a dev tag derived from the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("ENVTPL_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")))
}

/// Parses one comma-separated search-path element, trimming surrounding
/// whitespace so spaced lists like `-i "/a, /b"` resolve cleanly.
#[allow(clippy::unnecessary_wraps)] // clap's fn-pointer parsers must return Result
fn trimmed_path(raw: &str) -> Result<PathBuf, std::convert::Infallible> {
    Ok(PathBuf::from(raw.trim()))
}

/// CLI for `envtpl`: render a single template.
#[derive(Parser, Debug)]
#[command(
    name = "envtpl",
    about = "Render a template file from environment variables",
    version = version()
)]
pub struct RenderCli {
    /// Template file to render; reads stdin when omitted
    pub input_file: Option<PathBuf>,

    /// Output path; `-` writes to stdout. Defaults to the input name with
    /// its .tpl suffix stripped, or stdout when reading stdin
    #[arg(short = 'o', long)]
    pub output_file: Option<String>,

    /// Comma-separated extra directories searched for includes and template
    /// inheritance
    #[arg(short = 'i', long, value_delimiter = ',', value_parser = trimmed_path)]
    pub search_paths: Vec<PathBuf>,

    /// Render references to unset variables as empty instead of failing
    #[arg(long)]
    pub allow_missing: bool,

    /// Keep the input template instead of deleting it after a successful
    /// render
    #[arg(long)]
    pub keep_template: bool,

    /// Collapse runs of blank lines in the output to a single blank line
    #[arg(long)]
    pub reduce_multi_blank_lines: bool,

    /// Template engine extension to enable (repeatable)
    #[arg(long = "jinja2-extension", value_name = "NAME")]
    pub jinja2_extension: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI for `renvtpl`: mirror a directory tree, rendering text files.
#[derive(Parser, Debug)]
#[command(
    name = "renvtpl",
    about = "Recursively render a directory of templates from environment variables",
    version = version()
)]
pub struct TreeCli {
    /// Directory containing the templates
    pub source_directory: PathBuf,

    /// Directory that receives the rendered tree
    pub target_directory: PathBuf,

    /// Fail on references to unset variables instead of rendering them as
    /// empty
    #[arg(long)]
    pub die_on_missing: bool,

    /// Extra variable overriding the environment, as KEY,VALUE (repeatable)
    #[arg(long = "extra-var", value_name = "KEY,VALUE")]
    pub extra_vars: Vec<String>,

    /// Extra directory searched for includes (repeatable)
    #[arg(long = "extra-search-path", value_name = "DIR")]
    pub extra_search_paths: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
