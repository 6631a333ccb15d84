//! # Lock Security
//!
//! - Stale locks are detected via PID check
//! - Acquisition is non-blocking with a bounded retry budget

use std::path::Path;
use std::time::Duration;

/// Default wait budget for `DatabaseLock::acquire`.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Checks if a process with the given PID is still running.
pub fn is_process_running(pid: u32) -> bool {
    #[cfg(unix)]
    {
        std::path::Path::new(&format!("/proc/{}", pid)).exists()
    }

    #[cfg(not(unix))]
    {
        // No cheap liveness check; assume alive.
        let _ = pid;
        true
    }
}

/// Validates that a lock file path is within the expected data directory.
pub fn validate_lock_path(data_dir: &Path, lock_path: &Path) -> bool {
    lock_path
        .canonicalize()
        .ok()
        .and_then(|canonical| {
            data_dir
                .canonicalize()
                .ok()
                .map(|data_canonical| canonical.starts_with(&data_canonical))
        })
        .unwrap_or(false)
}
