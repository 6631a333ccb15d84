//! # Chain Builder
//!
//! Appends exactly one block to the head of the chain.

use chrono::SubsecRound;

use super::LedgerService;
use crate::domain::block::{Block, NewBlock, GENESIS_PREVIOUS_HASH};
use crate::domain::errors::LedgerError;
use crate::domain::hashing::compute_hash;
use crate::ports::outbound::{BlockSizer, BlockStore, TimeSource};

impl<S, T, Z> LedgerService<S, T, Z>
where
    S: BlockStore,
    T: TimeSource,
    Z: BlockSizer,
{
    /// Build and persist the next block.
    ///
    /// The write lock is held across count → latest → insert.
    pub(crate) fn append_block(&self) -> Result<Block, LedgerError> {
        let mut store = self.store.write();

        let count = store.count()?;
        let head = if count == 0 {
            None
        } else {
            match store.find_latest()? {
                Some(head) => Some(head),
                None => {
                    tracing::error!(count, "Store reports blocks but no latest block");
                    return Err(LedgerError::InconsistentChain { count });
                }
            }
        };

        let block = self.next_block(head.as_ref());
        let stored = store.insert(block).map_err(|e| {
            tracing::warn!(error = %e, "Block insert rejected");
            LedgerError::from(e)
        })?;

        tracing::info!(
            id = stored.id,
            hash = %stored.block_hash,
            previous_block_id = ?stored.previous_block_id,
            block_size = stored.block_size,
            "Created block"
        );
        Ok(stored)
    }

    /// Linkage, timestamp, hash and size for the block following `head`
    /// (or genesis when `head` is `None`).
    fn next_block(&self, head: Option<&Block>) -> NewBlock {
        let (previous_hash, previous_block_id) = match head {
            Some(head) => (head.block_hash.clone(), Some(head.id)),
            None => (GENESIS_PREVIOUS_HASH.to_string(), None),
        };

        // Never older than the head: latest is (timestamp, id), so a clock
        // step backwards must not demote the block being appended.
        let now = self.time_source.now().trunc_subsecs(6);
        let timestamp = match head {
            Some(head) => now.max(head.timestamp),
            None => now,
        };
        let block_hash = compute_hash(Some(&previous_hash), &timestamp);

        NewBlock {
            previous_hash,
            block_hash,
            timestamp,
            block_size: self.sizer.assign(),
            previous_block_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}
