//! # Block Ledger Engine
//!
//! The ledger core: appends blocks to a single hash-linked chain and serves
//! the read-side query surface (lookups, filtered search, latest/genesis,
//! statistics, existence checks, chain verification).
//!
//! ## Append Flow
//!
//! ```text
//! create_block()
//!     │
//!     ├── count() == 0 ──→ genesis: previous_hash = "0" × 68
//!     │
//!     └── count() > 0  ──→ find_latest() ──→ link to head
//!                                │
//!                                └── none ──→ InconsistentChain (fatal)
//!     ↓
//! stamp timestamp (µs) → SHA-256(previous_hash ‖ timestamp) → size ∈ [2, 6]
//!     ↓
//! BlockStore::insert (rejects duplicate hash / second successor)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Single Genesis | Exactly one block carries the sentinel previous hash |
//! | 2 | Hash Linkage | `previous_hash` equals the predecessor's `block_hash` |
//! | 3 | Unique Hash | `block_hash` is unique across the store |
//! | 4 | Linear Chain | At most one successor per predecessor |
//! | 5 | Immutable Linkage | Hash and link fields never change after creation |
//! | 6 | Serialized Appends | Count → latest → insert runs under one write lock |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Block entity, hash engine, filters, stats, verification, errors
//! - `ports/` - Port traits (inbound `LedgerApi`, outbound store/clock/sizer)
//! - `adapters/` - Stores, KV backends, clock, sizer, serializer, process lock
//! - `service/` - `LedgerService`: chain builder and query service
//!
//! ## Usage
//!
//! ```ignore
//! use block_ledger::{LedgerApi, LedgerService};
//!
//! let ledger = LedgerService::in_memory();
//! let genesis = ledger.create_block()?;
//! let next = ledger.create_block()?;
//! assert_eq!(next.previous_hash, genesis.block_hash);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export key types for convenience
pub use domain::block::{Block, BlockId, NewBlock, Timestamp, GENESIS_PREVIOUS_HASH};
pub use domain::errors::{ErrorKind, LedgerError, StoreError};
pub use domain::filter::{BlockFilter, SortKey};
pub use domain::hashing::{canonical_timestamp, compute_hash};
pub use domain::integrity::{ChainReport, ChainViolation};
pub use domain::stats::ChainStats;
pub use ports::inbound::LedgerApi;
pub use ports::outbound::{BlockSerializer, BlockSizer, BlockStore, KeyValueStore, TimeSource};
pub use service::{LedgerDependencies, LedgerService};
