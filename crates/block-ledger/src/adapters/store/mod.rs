//! Block Store Adapters
//!
//! Implementations of the `BlockStore` trait.

mod kv;
mod memory;

pub use kv::KvBlockStore;
pub use memory::InMemoryBlockStore;
