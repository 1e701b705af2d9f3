//! The helper functions exposed to templates.
//!
//! Filters: `from_json`, `shell`, `getenv`, `uuid`, `fnmatch`. Global
//! functions: `environment`. The lookup helpers (`getenv`, `environment`)
//! read the variable snapshot captured at startup, never the ambient
//! process environment, so a render is a pure function of its inputs.

use crate::exec;
use crate::vars::Variables;
use minijinja::value::{Kwargs, Value};
use minijinja::{Environment, Error, ErrorKind};
use std::sync::Arc;

/// Registers every helper on `env`, binding the lookup helpers to `vars`.
pub(super) fn register(env: &mut Environment<'_>, vars: &Arc<Variables>) {
    env.add_filter("from_json", from_json);
    env.add_filter("shell", shell);
    env.add_filter("uuid", salted_uuid);
    env.add_filter("fnmatch", glob_match);

    let snapshot = Arc::clone(vars);
    env.add_filter(
        "getenv",
        move |name: String, default: Option<Value>| -> Result<Value, Error> {
            if let Some(value) = snapshot.get(&name) {
                return Ok(Value::from(value));
            }
            default.ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("environment variable `{name}` is not set and no default was given"),
                )
            })
        },
    );

    let snapshot = Arc::clone(vars);
    env.add_function(
        "environment",
        move |prefix: Option<String>, kwargs: Kwargs| -> Result<Value, Error> {
            let prefix = match prefix {
                Some(given) => given,
                None => kwargs.get::<Option<String>>("prefix")?.unwrap_or_default(),
            };
            kwargs.assert_all_used()?;
            let pairs: Vec<Value> = snapshot
                .iter()
                .filter_map(|(key, value)| {
                    key.strip_prefix(&prefix).map(|stripped| {
                        Value::from(vec![Value::from(stripped), Value::from(value)])
                    })
                })
                .collect();
            Ok(Value::from(pairs))
        },
    );
}

/// Parses a JSON-encoded string into a template value.
fn from_json(text: &str) -> Result<Value, Error> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|parsed| Value::from_serialize(&parsed))
        .map_err(|err| Error::new(ErrorKind::InvalidOperation, format!("malformed JSON: {err}")))
}

/// Runs a command through the platform shell and returns its combined
/// output. `die_on_error` and `encoding` may be given positionally or as
/// keyword arguments.
fn shell(
    command: &str,
    die_on_error: Option<bool>,
    encoding: Option<&str>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    let die_on_error = match die_on_error {
        Some(flag) => flag,
        None => kwargs.get::<Option<bool>>("die_on_error")?.unwrap_or(false),
    };
    let encoding = match encoding {
        Some(label) => label.to_string(),
        None => kwargs
            .get::<Option<String>>("encoding")?
            .unwrap_or_else(|| "utf8".to_string()),
    };
    kwargs.assert_all_used()?;

    if !is_utf8_label(&encoding) {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("unsupported shell output encoding `{encoding}`"),
        ));
    }
    exec::shell_capture(command, die_on_error)
        .map_err(|err| Error::new(ErrorKind::InvalidOperation, format!("{err:#}")))
}

/// Only UTF-8 output is supported; the label is kept for compatibility
/// with the historical `shell(value, die_on_error, encoding)` signature.
fn is_utf8_label(label: &str) -> bool {
    label.eq_ignore_ascii_case("utf8") || label.eq_ignore_ascii_case("utf-8")
}

/// Hashes `seed` together with a fresh random 128-bit identifier and
/// returns the lowercase hex digest. Not deterministic across calls: the
/// identifier is drawn anew each time, making this a salted hash rather
/// than a stable function of `seed`.
fn salted_uuid(seed: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let salt = uuid::Uuid::new_v4().simple().to_string();
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(seed.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for b in &digest {
        // write! to a String is infallible; unwrap_or(()) makes that explicit.
        write!(hex, "{b:02x}").unwrap_or(());
    }
    hex
}

/// Glob-style match of `value` against `pattern` (`*`, `?`, `[...]`).
fn glob_match(value: &str, pattern: &str) -> Result<bool, Error> {
    glob::Pattern::new(pattern)
        .map(|compiled| compiled.matches(value))
        .map_err(|err| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("invalid glob pattern `{pattern}`: {err}"),
            )
        })
}
