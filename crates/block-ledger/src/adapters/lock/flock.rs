//! # File Lock Implementation
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

use super::security::{is_process_running, validate_lock_path, DEFAULT_LOCK_TIMEOUT};

/// Errors from data directory locking
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Failed to create lock file: {0}")]
    CreateFailed(#[source] io::Error),

    #[error("Ledger data directory already in use{} ({})", pid_suffix(.pid), .path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}

fn pid_suffix(pid: &Option<u32>) -> String {
    pid.map(|p| format!(" by process {}", p)).unwrap_or_default()
}

/// Exclusive lock on a ledger data directory.
///
/// Acquired on node startup, released on drop (RAII).
///
/// ```ignore
/// let lock = DatabaseLock::acquire(Path::new("./data"))?;
/// // Lock is held until `lock` goes out of scope
/// ```
#[derive(Debug)]
pub struct DatabaseLock {
    /// Kept open to maintain the lock
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DatabaseLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire an exclusive lock on the data directory, waiting up to
    /// `DEFAULT_LOCK_TIMEOUT` for another holder to go away.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire_with_timeout(data_dir, DEFAULT_LOCK_TIMEOUT)
    }

    /// Acquire with an explicit wait budget.
    ///
    /// Retries with exponential backoff. A lock whose recorded PID no longer
    /// belongs to a running process is treated as stale and taken over.
    ///
    /// # Errors
    ///
    /// Returns `LockError::AlreadyLocked` if another holder keeps the lock
    /// past `timeout`.
    pub fn acquire_with_timeout(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        std::fs::create_dir_all(data_dir).map_err(LockError::CreateFailed)?;

        let deadline = Instant::now() + timeout;
        let lock_path = data_dir.join(Self::LOCK_FILE);
        let mut retry_delay = Duration::from_millis(50);

        loop {
            if lock_path.exists() && !validate_lock_path(data_dir, &lock_path) {
                return Err(LockError::CreateFailed(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "Lock path escapes data directory",
                )));
            }

            // Not truncated here: the current holder's PID must stay readable.
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)
                .map_err(LockError::CreateFailed)?;

            match file.try_lock_exclusive() {
                Ok(()) => {
                    let pid = std::process::id();
                    let mut locked = file;
                    locked.set_len(0).map_err(LockError::WriteFailed)?;
                    writeln!(locked, "{}", pid).map_err(LockError::WriteFailed)?;
                    locked.sync_all().map_err(LockError::WriteFailed)?;

                    tracing::info!(path = %lock_path.display(), pid, "Acquired data directory lock");
                    return Ok(Self {
                        file: locked,
                        path: lock_path,
                        pid,
                    });
                }
                Err(_) => {
                    let existing_pid = Self::read_existing_pid(&lock_path);

                    if let Some(pid) = existing_pid {
                        if !is_process_running(pid) {
                            tracing::warn!(pid, path = %lock_path.display(), "Removing stale lock");
                            drop(file);
                            let _ = std::fs::remove_file(&lock_path);
                            continue;
                        }
                    }

                    if Instant::now() >= deadline {
                        return Err(LockError::AlreadyLocked {
                            pid: existing_pid,
                            path: lock_path,
                        });
                    }

                    drop(file);
                    std::thread::sleep(retry_delay);
                    retry_delay = (retry_delay * 2).min(Duration::from_millis(500));
                }
            }
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DatabaseLock {
    fn drop(&mut self) {
        #[allow(clippy::incompatible_msrv)]
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.path);
    }
}
