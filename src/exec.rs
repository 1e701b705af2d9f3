//! Shell subprocess execution backing the `shell` template helper.

use anyhow::{Context, Result, bail};
use std::process::Command;

/// Runs `command` through the platform shell and returns its combined
/// stdout+stderr output.
///
/// When `die_on_error` is false the command is wrapped so the shell exits
/// zero regardless of the command's own status; failures surface only
/// through whatever the command printed. When true, a non-zero exit becomes
/// an error carrying the exit code and the captured output. Shell startup
/// and parse failures are errors in both modes.
///
/// # Errors
///
/// Returns an error if the shell cannot be spawned, if the shell itself
/// fails to parse the command, or (with `die_on_error`) if the command
/// exits non-zero.
pub fn shell_capture(command: &str, die_on_error: bool) -> Result<String> {
    let output = shell_command(&wrap(command, die_on_error))
        .output()
        .with_context(|| format!("failed to spawn shell for `{command}`"))?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    // The redirect inside the wrapper merges the command's stderr into
    // stdout. Anything left on the shell's own stderr is a shell-level
    // failure message; keep it with the output.
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        text.push_str(&stderr);
    }

    if !output.status.success() {
        bail!(
            "shell command `{command}` failed (exit {}): {}",
            output.status.code().unwrap_or(-1),
            text.trim()
        );
    }
    Ok(text)
}

/// Builds the platform shell invocation for a script string.
fn shell_command(script: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", script]);
        cmd
    }

    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", script]);
        cmd
    }
}

/// Wraps the user command with the stderr merge and, unless `die_on_error`,
/// an unconditional `exit 0` so ordinary failures are swallowed.
fn wrap(command: &str, die_on_error: bool) -> String {
    #[cfg(windows)]
    {
        if die_on_error {
            format!("({command}) 2>&1")
        } else {
            format!("({command}) 2>&1 & exit 0")
        }
    }

    #[cfg(not(windows))]
    {
        if die_on_error {
            format!("({command}) 2>&1")
        } else {
            format!("({command}) 2>&1 ; exit 0")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = shell_capture("echo hello", false).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn merges_stderr_into_output() {
        #[cfg(windows)]
        let out = shell_capture("echo oops 1>&2", false).unwrap();
        #[cfg(not(windows))]
        let out = shell_capture("echo oops >&2", false).unwrap();
        assert_eq!(out.trim(), "oops");
    }

    #[test]
    fn non_zero_exit_is_swallowed_by_default() {
        let out = shell_capture("exit 3", false).unwrap();
        assert_eq!(out.trim(), "");
    }

    #[test]
    fn non_zero_exit_fails_with_die_on_error() {
        let err = shell_capture("exit 3", true).unwrap_err();
        assert!(err.to_string().contains("exit 3"));
    }

    #[test]
    fn output_before_failure_is_reported() {
        #[cfg(windows)]
        let err = shell_capture("echo partial & exit 2", true).unwrap_err();
        #[cfg(not(windows))]
        let err = shell_capture("echo partial ; exit 2", true).unwrap_err();
        assert!(err.to_string().contains("partial"));
    }
}
