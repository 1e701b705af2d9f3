// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed file tree and a scoped environment
// override so each integration test can render against a known set of
// variables without leaking state into other tests.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

// ---------------------------------------------------------------------------
// Test trees
// ---------------------------------------------------------------------------

/// An isolated directory tree backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped (via the underlying
/// [`tempfile::TempDir`]).
pub struct TestTree {
    /// Temporary directory containing the test files.
    pub root: tempfile::TempDir,
}

impl TestTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the tree root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `relative` inside the tree.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Write a text file at `relative`, creating parent directories as needed.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        self.write_bytes(relative, content.as_bytes())
    }

    /// Write a binary file at `relative`, creating parent directories as needed.
    pub fn write_bytes(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write test file");
        path
    }

    /// Read the file at `relative` as UTF-8 text.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.join(relative)).expect("read test file")
    }

    /// Read the file at `relative` as raw bytes.
    pub fn read_bytes(&self, relative: &str) -> Vec<u8> {
        std::fs::read(self.join(relative)).expect("read test file")
    }

    /// Whether anything exists at `relative`.
    pub fn exists(&self, relative: &str) -> bool {
        self.join(relative).exists()
    }
}

// ---------------------------------------------------------------------------
// Environment control
// ---------------------------------------------------------------------------

/// Serialises tests that read or mutate process environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Acquire the process-wide environment lock.
///
/// Every test that captures the real environment must hold this lock for its
/// whole body, so it cannot race with tests that install a [`ScopedEnv`].
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Environment variable overrides held for the lifetime of the guard.
///
/// Takes the environment lock on construction, applies the given variables,
/// and restores the previous values (or removes the variables) on drop.
pub struct ScopedEnv {
    _lock: MutexGuard<'static, ()>,
    saved: Vec<(String, Option<OsString>)>,
}

impl ScopedEnv {
    /// Set each `(key, value)` pair, remembering the previous values.
    #[allow(unsafe_code)] // set_var/remove_var require unsafe since Rust 1.83
    pub fn set(pairs: &[(&str, &str)]) -> Self {
        let lock = env_lock();
        let mut saved = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            saved.push(((*key).to_string(), std::env::var_os(key)));
            // SAFETY: test-only env var mutation; serialized via ENV_MUTEX.
            unsafe { std::env::set_var(key, value) };
        }
        Self { _lock: lock, saved }
    }
}

impl Drop for ScopedEnv {
    #[allow(unsafe_code)] // set_var/remove_var require unsafe since Rust 1.83
    fn drop(&mut self) {
        for (key, previous) in &self.saved {
            // SAFETY: restored before the lock in `_lock` is released.
            unsafe {
                match previous {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
