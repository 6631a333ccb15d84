//! # Data Directory Locking
//!
//! Prevents two node processes from opening the same ledger data directory.
//!
//! ## Modules
//!
//! - `flock`: `DatabaseLock` implementation using fs2
//! - `security`: Lock timeout and stale-lock detection

mod flock;
mod security;

pub use flock::{DatabaseLock, LockError};
