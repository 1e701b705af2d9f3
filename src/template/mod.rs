//! Template rendering pipeline.
//!
//! This module owns everything between a template source and its rendered
//! text: policy types ([`UndefinedPolicy`], [`EngineExtension`],
//! [`RenderOptions`]), the engine entry points ([`render_file`],
//! [`render_str`]), helper registration, include resolution, and output
//! normalisation.

mod engine;
mod helpers;
mod loader;
mod normalize;

pub use engine::{render_file, render_str};

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

/// How rendering treats references to variables absent from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedPolicy {
    /// Any reference to an unset variable aborts rendering.
    #[default]
    Strict,
    /// Unset variables render as empty output.
    Lenient,
}

impl UndefinedPolicy {
    /// The engine-level behaviour implementing this policy.
    pub(crate) fn behavior(self) -> minijinja::UndefinedBehavior {
        match self {
            Self::Strict => minijinja::UndefinedBehavior::Strict,
            Self::Lenient => minijinja::UndefinedBehavior::Lenient,
        }
    }
}

/// Engine extensions selectable with `--jinja2-extension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineExtension {
    /// `{% break %}` and `{% continue %}` inside loops.
    LoopControls,
}

impl EngineExtension {
    /// Comma-separated list of the supported extension names.
    pub const SUPPORTED: &'static str = "loopcontrols";

    /// Activates the extension on an engine environment.
    pub(crate) fn apply(self, _env: &mut minijinja::Environment<'_>) {
        match self {
            Self::LoopControls => {
                // Loop controls are compiled into the engine; the request is
                // validated at parse time and nothing needs switching on here.
                tracing::debug!("loopcontrols extension active");
            }
        }
    }
}

impl FromStr for EngineExtension {
    type Err = ConfigError;

    /// Accepts the bare extension name and its historical dotted module
    /// path (`jinja2.ext.<name>`).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "loopcontrols" | "jinja2.ext.loopcontrols" => Ok(Self::LoopControls),
            _ => Err(ConfigError::UnsupportedExtension {
                name: name.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }
}

/// One rendering configuration, shared by both entry points.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Undefined-variable policy.
    pub policy: UndefinedPolicy,
    /// Extra directories consulted for includes and inheritance, in order.
    pub search_paths: Vec<PathBuf>,
    /// Collapse runs of blank lines in the output.
    pub reduce_blank_lines: bool,
    /// Engine extensions to activate.
    pub extensions: Vec<EngineExtension>,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_strict() {
        assert_eq!(UndefinedPolicy::default(), UndefinedPolicy::Strict);
    }

    #[test]
    fn extension_parses_bare_name() {
        let ext: EngineExtension = "loopcontrols".parse().expect("supported name");
        assert_eq!(ext, EngineExtension::LoopControls);
    }

    #[test]
    fn extension_parses_dotted_module_path() {
        let ext: EngineExtension = "jinja2.ext.loopcontrols".parse().expect("supported name");
        assert_eq!(ext, EngineExtension::LoopControls);
    }

    #[test]
    fn unknown_extension_is_rejected_by_name() {
        let err = "jinja2.ext.i18n".parse::<EngineExtension>().unwrap_err();
        assert!(err.to_string().contains("jinja2.ext.i18n"));
        assert!(err.to_string().contains("loopcontrols"));
    }

    #[test]
    fn default_options_have_no_search_paths() {
        let options = RenderOptions::default();
        assert!(options.search_paths.is_empty());
        assert!(!options.reduce_blank_lines);
        assert!(options.extensions.is_empty());
    }
}
