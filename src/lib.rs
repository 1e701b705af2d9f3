//! Environment-driven template rendering engine.
//!
//! Renders Jinja-style templates where the render context is the process
//! environment: every environment variable is a template variable. Two
//! front ends share the engine:
//!
//! - **[`commands::render`]** renders one template file (or stdin) and
//!   writes the result next to it, to an explicit path, or to stdout
//! - **[`commands::tree`]** mirrors a whole directory tree, rendering text
//!   files and copying binary files untouched
//!
//! The layers underneath:
//!
//! - **[`vars`]** holds an immutable snapshot of the environment
//! - **[`template`]** is the engine: policies, helpers, include resolution,
//!   and output normalisation
//! - **[`walker`]** mirrors directory trees with binary detection
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod logging;
pub mod template;
pub mod vars;
pub mod walker;
