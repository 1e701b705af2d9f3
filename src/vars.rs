//! Environment-variable snapshot used as the template context.
//!
//! Rendering is a pure function of the snapshot taken here: the process
//! environment is read exactly once per invocation, and every helper that
//! looks up variables (`getenv`, `environment`) reads this snapshot rather
//! than ambient global state.

use std::collections::BTreeMap;

/// An immutable mapping of variable names to string values.
///
/// Built from the process environment, optionally merged with explicit
/// overrides (overrides win on key collision). Iteration order is sorted by
/// key, which the `environment()` template function relies on.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    map: BTreeMap<String, String>,
}

impl Variables {
    /// Snapshots the current process environment.
    ///
    /// Pairs whose name or value is not valid UTF-8 are skipped, so a
    /// template referencing such a variable sees it as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let map = std::env::vars_os()
            .filter_map(|(key, value)| {
                let key = match key.into_string() {
                    Ok(key) => key,
                    Err(raw) => {
                        tracing::debug!(
                            "skipping environment variable {}: name is not UTF-8",
                            raw.to_string_lossy()
                        );
                        return None;
                    }
                };
                let Ok(value) = value.into_string() else {
                    tracing::debug!("skipping environment variable {key}: value is not UTF-8");
                    return None;
                };
                Some((key, value))
            })
            .collect();
        Self { map }
    }

    /// Merges `overrides` into the snapshot, replacing same-named entries.
    #[must_use]
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in overrides {
            self.map.insert(key, value);
        }
        self
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Iterates all entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// The underlying map, used as the rendering context.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.map
    }

    /// Number of variables in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(String, String)> for Variables {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}
