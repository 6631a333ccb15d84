//! # Adapters Module
//!
//! Adapter implementations for the ledger's outbound ports.
//!
//! ## Modules
//!
//! - `store`: `BlockStore` implementations (arena, KV-backed)
//! - `kv`: `KeyValueStore` backends (in-memory, file-backed)
//! - `infra`: clocks, block sizers
//! - `serializer`: bincode `BlockSerializer`
//! - `lock`: data directory process lock (singleton guard)

pub mod infra;
pub mod kv;
#[cfg(feature = "file-store")]
pub mod lock;
pub mod serializer;
pub mod store;

pub use infra::{FixedBlockSizer, ManualTimeSource, SecureRandomSizer, SystemTimeSource};
#[cfg(feature = "file-store")]
pub use kv::FileBackedKVStore;
pub use kv::InMemoryKVStore;
#[cfg(feature = "file-store")]
pub use lock::{DatabaseLock, LockError};
pub use serializer::BincodeBlockSerializer;
pub use store::{InMemoryBlockStore, KvBlockStore};
