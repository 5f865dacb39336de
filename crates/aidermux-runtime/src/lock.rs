//! One aidermux command at a time per editor server.
//!
//! Every `:Aider*` command is its own `jobstart` child, so two quick
//! commands would otherwise both see no session and both start one. Each
//! run holds an exclusive lock on a file keyed by the server address until
//! it exits; a second run blocks until then.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context;
use fs2::FileExt;

/// Held for the lifetime of one command. Dropping it releases the lock.
#[derive(Debug)]
pub struct CommandLock {
    _file: File,
    path: PathBuf,
}

impl CommandLock {
    /// Block until no other command holds the lock for `server`.
    pub fn acquire(dir: &Path, server: &str) -> anyhow::Result<Self> {
        let path = lock_path(dir, server);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))?;
        if file.try_lock_exclusive().is_err() {
            tracing::debug!("waiting for another aidermux command on {server}");
            file.lock_exclusive()
                .with_context(|| format!("Failed to acquire lock: {}", path.display()))?;
        }
        tracing::debug!("holding {}", path.display());
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Lock file for `server` under `dir`. The address is flattened into one
/// file name component.
pub fn lock_path(dir: &Path, server: &str) -> PathBuf {
    let key: String = server
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("aidermux-{key}.lock"))
}
