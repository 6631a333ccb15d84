//! # Hash Engine
//!
//! Deterministic digest over block-linkage data:
//! `SHA-256(previous_hash ‖ canonical_timestamp(timestamp))`, lowercase hex.
//!
//! The canonical timestamp format is fixed. Recomputing a stored block's hash
//! with any other rendering of its timestamp yields a different digest.

use sha2::{Digest, Sha256};

use super::block::Timestamp;

/// Fixed rendering used as hash input: UTC, microseconds, no offset.
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Length of a hex-encoded block hash.
pub const BLOCK_HASH_HEX_LEN: usize = 64;

/// Render a timestamp the way the hash engine consumes it.
pub fn canonical_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format(CANONICAL_TIMESTAMP_FORMAT).to_string()
}

/// Compute a block hash. A missing previous hash hashes as the empty string.
pub fn compute_hash(previous_hash: Option<&str>, timestamp: &Timestamp) -> String {
    let mut hasher = Sha256::new();
    hasher.update(previous_hash.unwrap_or_default().as_bytes());
    hasher.update(canonical_timestamp(timestamp).as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `hash` has the shape the hash engine produces.
pub fn is_well_formed_hash(hash: &str) -> bool {
    hash.len() == BLOCK_HASH_HEX_LEN
        && hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
