//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the ledger service. Adapters live in
//! `crate::adapters`.

use crate::domain::block::{Block, BlockId, NewBlock, Timestamp};
use crate::domain::errors::{KVStoreError, SerializationError, StoreError};
use crate::domain::filter::BlockFilter;

/// Persistent, ordered collection of blocks.
///
/// Implementations must reject an insert whose hash already exists
/// (`DuplicateHash`) and an insert whose `previous_block_id` already has a
/// successor (`DuplicatePredecessor`). Lookups signal absence with `None`.
///
/// Production: `KvBlockStore` over `FileBackedKVStore`
/// Testing: `InMemoryBlockStore`
pub trait BlockStore: Send + Sync {
    /// Assign an id, persist, and return the stored block.
    fn insert(&mut self, block: NewBlock) -> Result<Block, StoreError>;

    fn find_by_id(&self, id: BlockId) -> Result<Option<Block>, StoreError>;

    fn find_by_hash(&self, hash: &str) -> Result<Option<Block>, StoreError>;

    fn exists_by_hash(&self, hash: &str) -> Result<bool, StoreError>;

    /// Block with the greatest timestamp; ties go to the highest id.
    fn find_latest(&self) -> Result<Option<Block>, StoreError>;

    /// The block whose previous hash is the genesis sentinel.
    fn find_genesis(&self) -> Result<Option<Block>, StoreError>;

    /// The block whose `previous_block_id` is `id`.
    fn find_successor(&self, id: BlockId) -> Result<Option<Block>, StoreError>;

    fn count(&self) -> Result<u64, StoreError>;

    /// Mean `block_size`, or `None` when empty.
    fn average_size(&self) -> Result<Option<f64>, StoreError>;

    /// Filtered, ordered blocks. See [`BlockFilter`].
    fn search(&self, filter: &BlockFilter) -> Result<Vec<Block>, StoreError>;
}

/// Result of a prefix scan: (key, value) pairs.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value database operations.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Iterate over keys with a prefix.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Assigns the synthetic `block_size` of a new block.
pub trait BlockSizer: Send + Sync {
    fn assign(&self) -> u64;
}

/// Abstract interface for block serialization.
pub trait BlockSerializer: Send + Sync {
    fn serialize(&self, block: &Block) -> Result<Vec<u8>, SerializationError>;

    fn deserialize(&self, data: &[u8]) -> Result<Block, SerializationError>;
}
