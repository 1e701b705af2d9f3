//! Engine construction and the two rendering entry points.
//!
//! Every render builds a fresh environment: undefined-variable behaviour
//! from the policy, a search-path loader for includes, the helper registry
//! bound to the variable snapshot, and the primary template registered
//! under its own name so it shadows any same-named file on the search
//! paths.

use super::{RenderOptions, helpers, loader, normalize};
use crate::error::TemplateError;
use crate::vars::Variables;
use minijinja::{AutoEscape, Environment, ErrorKind, Template};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name under which an inline (stdin) template is registered.
const INLINE_TEMPLATE_NAME: &str = "<stdin>";

/// Renders the template file at `path`.
///
/// Includes resolve against the file's own directory first, then each of
/// `options.search_paths` in order.
///
/// # Errors
///
/// Returns [`TemplateError::NotFound`] if the file does not exist,
/// [`TemplateError::Io`] for any other read failure, and the classified
/// engine error for any rendering failure.
pub fn render_file(
    path: &Path,
    vars: &Variables,
    options: &RenderOptions,
) -> Result<String, TemplateError> {
    let source = std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            TemplateError::NotFound(format!("template not found: {}", path.display()))
        } else {
            TemplateError::Io {
                path: path.display().to_string(),
                source: err,
            }
        }
    })?;
    let name = path.file_name().map_or_else(
        || INLINE_TEMPLATE_NAME.to_string(),
        |file_name| file_name.to_string_lossy().into_owned(),
    );
    let base_dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    render_with(&name, source, base_dir, vars, options)
}

/// Renders an inline template string.
///
/// Includes resolve against the current working directory first, then each
/// of `options.search_paths` in order.
///
/// # Errors
///
/// Returns [`TemplateError::Io`] if the working directory cannot be
/// determined, and the classified engine error for any rendering failure.
pub fn render_str(
    source: &str,
    vars: &Variables,
    options: &RenderOptions,
) -> Result<String, TemplateError> {
    let base_dir = std::env::current_dir().map_err(|err| TemplateError::Io {
        path: ".".to_string(),
        source: err,
    })?;
    render_with(INLINE_TEMPLATE_NAME, source.to_string(), base_dir, vars, options)
}

fn render_with(
    name: &str,
    source: String,
    base_dir: PathBuf,
    vars: &Variables,
    options: &RenderOptions,
) -> Result<String, TemplateError> {
    let mut search_paths = Vec::with_capacity(options.search_paths.len() + 1);
    search_paths.push(base_dir);
    search_paths.extend(options.search_paths.iter().cloned());

    let mut env = Environment::new();
    // The engine's default callback HTML-escapes templates whose name ends
    // in .html, .htm or .xml; substituted values must reach the output
    // verbatim whatever the template is called.
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(options.policy.behavior());
    env.set_loader(loader::search_path_loader(search_paths));
    helpers::register(&mut env, &Arc::new(vars.clone()));
    for extension in &options.extensions {
        extension.apply(&mut env);
    }

    env.add_template_owned(name.to_string(), source.clone())
        .map_err(TemplateError::from_render)?;
    let template = env.get_template(name).map_err(TemplateError::from_render)?;
    let rendered = template.render(vars.as_map()).map_err(|err| {
        // The engine reports strict-mode aborts as a bare "undefined value";
        // recover the variable name from the template's references so the
        // diagnostic says which one is unset.
        if err.kind() == ErrorKind::UndefinedError
            && let Some(name) = first_missing_variable(&template, vars)
        {
            return TemplateError::Undefined(name);
        }
        TemplateError::from_render(err)
    })?;
    Ok(normalize::apply(&source, rendered, options.reduce_blank_lines))
}

/// Best-effort identification of the variable behind a strict-mode abort:
/// the alphabetically first variable referenced by the template but absent
/// from the snapshot. Returns `None` when the abort came from somewhere the
/// reference analysis cannot see, such as an included template.
fn first_missing_variable(template: &Template<'_, '_>, vars: &Variables) -> Option<String> {
    template
        .undeclared_variables(false)
        .into_iter()
        .filter(|name| vars.get(name).is_none())
        .min()
}
