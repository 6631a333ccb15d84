//! Key-Value Backends
//!
//! Implementations of the `KeyValueStore` trait used by `KvBlockStore`.

#[cfg(feature = "file-store")]
mod file;
mod memory;

#[cfg(feature = "file-store")]
pub use file::FileBackedKVStore;
pub use memory::InMemoryKVStore;
