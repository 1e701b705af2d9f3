//! Template resolution across ordered search paths.

use minijinja::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Builds an engine loader that resolves template names against `dirs` in
/// order, first match wins.
///
/// Names are relative paths. Absolute names and names containing
/// parent-directory components never resolve, so includes cannot escape
/// the search directories.
pub(super) fn search_path_loader(
    dirs: Vec<PathBuf>,
) -> impl Fn(&str) -> Result<Option<String>, minijinja::Error> + Send + Sync + 'static {
    move |name| {
        if !is_safe_name(name) {
            return Ok(None);
        }
        for dir in &dirs {
            let candidate = dir.join(name);
            if candidate.is_file() {
                tracing::debug!("resolved template `{name}` to {}", candidate.display());
                return std::fs::read_to_string(&candidate).map(Some).map_err(|err| {
                    minijinja::Error::new(
                        ErrorKind::InvalidOperation,
                        format!("could not read template {}", candidate.display()),
                    )
                    .with_source(err)
                });
            }
        }
        Ok(None)
    }
}

/// A name is safe when joining it to a search directory cannot step outside
/// that directory.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolves_from_the_first_matching_directory() {
        let first = tempfile::tempdir().expect("create temp dir");
        let second = tempfile::tempdir().expect("create temp dir");
        fs::write(first.path().join("inc.tpl"), "from first").unwrap();
        fs::write(second.path().join("inc.tpl"), "from second").unwrap();

        let loader = search_path_loader(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(loader("inc.tpl").unwrap(), Some("from first".to_string()));
    }

    #[test]
    fn falls_through_to_later_directories() {
        let first = tempfile::tempdir().expect("create temp dir");
        let second = tempfile::tempdir().expect("create temp dir");
        fs::write(second.path().join("only-here.tpl"), "found").unwrap();

        let loader = search_path_loader(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(loader("only-here.tpl").unwrap(), Some("found".to_string()));
    }

    #[test]
    fn missing_template_resolves_to_none() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loader = search_path_loader(vec![dir.path().to_path_buf()]);
        assert_eq!(loader("absent.tpl").unwrap(), None);
    }

    #[test]
    fn nested_relative_names_resolve() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join("partials")).unwrap();
        fs::write(dir.path().join("partials/header.tpl"), "header").unwrap();

        let loader = search_path_loader(vec![dir.path().to_path_buf()]);
        assert_eq!(
            loader("partials/header.tpl").unwrap(),
            Some("header".to_string())
        );
    }

    #[test]
    fn parent_traversal_never_resolves() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("secret"), "data").unwrap();
        let inner = dir.path().join("inner");
        fs::create_dir(&inner).unwrap();

        let loader = search_path_loader(vec![inner]);
        assert_eq!(loader("../secret").unwrap(), None);
    }

    #[test]
    fn absolute_names_never_resolve() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let target = dir.path().join("abs.tpl");
        fs::write(&target, "data").unwrap();

        let loader = search_path_loader(vec![dir.path().to_path_buf()]);
        let name = target.display().to_string();
        assert_eq!(loader(&name).unwrap(), None);
    }

    #[test]
    fn empty_name_never_resolves() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loader = search_path_loader(vec![dir.path().to_path_buf()]);
        assert_eq!(loader("").unwrap(), None);
    }
}
