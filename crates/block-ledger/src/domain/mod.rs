//! # Domain Layer
//!
//! Pure domain logic for the ledger. No I/O happens here.
//!
//! ## Modules
//!
//! - `block` - Block entity, identifiers and the genesis sentinel
//! - `hashing` - Hash engine (SHA-256 over linkage data)
//! - `filter` - Search filter and sort key
//! - `stats` - Aggregate chain statistics
//! - `integrity` - Chain verification walk
//! - `errors` - Domain error types

pub mod block;
pub mod errors;
pub mod filter;
pub mod hashing;
pub mod integrity;
pub mod stats;
