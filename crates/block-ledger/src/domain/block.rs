//! # Block Entity
//!
//! The ledger's unit of record. Blocks live in an arena addressed by
//! [`BlockId`]; the chain relation is stored as nullable id references
//! (`previous_block_id` owned, `next_block_id` derived) instead of object
//! references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Surrogate identifier assigned by the store, increasing in creation order.
///
/// This is not a verified chain height; see `LedgerApi::block_height`.
pub type BlockId = u64;

/// Instant type used for block and bookkeeping timestamps.
pub type Timestamp = DateTime<Utc>;

/// Previous hash carried by the genesis block: 68 `'0'` characters.
pub const GENESIS_PREVIOUS_HASH: &str =
    "00000000000000000000000000000000000000000000000000000000000000000000";

/// A persisted block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Store-assigned identifier.
    pub id: BlockId,
    /// Hash of the predecessor, or [`GENESIS_PREVIOUS_HASH`].
    pub previous_hash: String,
    /// Lowercase hex SHA-256, 64 characters, unique.
    pub block_hash: String,
    /// Creation instant (microsecond precision).
    pub timestamp: Timestamp,
    /// Synthetic size assigned at creation.
    pub block_size: u64,
    /// Owning side of the chain relation. `None` only for genesis.
    pub previous_block_id: Option<BlockId>,
    /// Inverse side, resolved by the store on read. Never persisted.
    #[serde(skip)]
    pub next_block_id: Option<BlockId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Block {
    /// Assemble a stored block from an insert request and its assigned id.
    pub fn from_new(id: BlockId, new: NewBlock) -> Self {
        Self {
            id,
            previous_hash: new.previous_hash,
            block_hash: new.block_hash,
            timestamp: new.timestamp,
            block_size: new.block_size,
            previous_block_id: new.previous_block_id,
            next_block_id: None,
            created_at: new.created_at,
            updated_at: new.updated_at,
        }
    }

    /// Whether this block carries the genesis sentinel.
    pub fn is_genesis(&self) -> bool {
        self.previous_hash == GENESIS_PREVIOUS_HASH
    }

    /// Ordering key for "latest": timestamp first, then insertion order.
    pub(crate) fn recency_key(&self) -> (Timestamp, BlockId) {
        (self.timestamp, self.id)
    }
}

/// A block that has been built but not yet persisted (no id yet).
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    pub previous_hash: String,
    pub block_hash: String,
    pub timestamp: Timestamp,
    pub block_size: u64,
    pub previous_block_id: Option<BlockId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
