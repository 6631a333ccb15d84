//! # Ledger Queries
//!
//! Read-side operations. All run under the shared read lock.

use super::LedgerService;
use crate::domain::block::{Block, BlockId};
use crate::domain::errors::LedgerError;
use crate::domain::filter::{BlockFilter, SortKey};
use crate::domain::integrity::{verify_blocks, ChainReport};
use crate::domain::stats::ChainStats;
use crate::ports::outbound::{BlockSizer, BlockStore, TimeSource};

impl<S, T, Z> LedgerService<S, T, Z>
where
    S: BlockStore,
    T: TimeSource,
    Z: BlockSizer,
{
    pub(crate) fn block_by_id(&self, id: BlockId) -> Result<Block, LedgerError> {
        self.store
            .read()
            .find_by_id(id)?
            .ok_or(LedgerError::BlockNotFound { id })
    }

    pub(crate) fn block_by_hash(&self, hash: &str) -> Result<Block, LedgerError> {
        self.store
            .read()
            .find_by_hash(hash)?
            .ok_or_else(|| LedgerError::HashNotFound {
                hash: hash.to_string(),
            })
    }

    pub(crate) fn latest_block(&self) -> Result<Block, LedgerError> {
        self.store
            .read()
            .find_latest()?
            .ok_or(LedgerError::EmptyChain)
    }

    pub(crate) fn genesis_block(&self) -> Result<Option<Block>, LedgerError> {
        Ok(self.store.read().find_genesis()?)
    }

    pub(crate) fn search(&self, filter: &BlockFilter) -> Result<Vec<Block>, LedgerError> {
        let blocks = self.store.read().search(filter)?;
        tracing::debug!(matched = blocks.len(), sort_by = filter.sort_by.as_str(), "Searched blocks");
        Ok(blocks)
    }

    pub(crate) fn exists(&self, hash: &str) -> Result<bool, LedgerError> {
        Ok(self.store.read().exists_by_hash(hash)?)
    }

    /// Count and average are required; latest and genesis are best-effort.
    pub(crate) fn stats(&self) -> Result<ChainStats, LedgerError> {
        let store = self.store.read();

        let total_blocks = store.count()?;
        let average_block_size = store.average_size()?;

        let latest_block = store.find_latest().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load latest block for stats");
            None
        });
        let genesis_block = store.find_genesis().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load genesis block for stats");
            None
        });

        Ok(ChainStats {
            total_blocks,
            average_block_size,
            latest_block,
            genesis_block,
        })
    }

    pub(crate) fn verify(&self) -> Result<ChainReport, LedgerError> {
        let blocks = self
            .store
            .read()
            .search(&BlockFilter::new().sorted_by(SortKey::TimestampAsc))?;
        let report = verify_blocks(&blocks);

        if report.is_valid() {
            tracing::info!(checked = report.checked, "Chain verified");
        } else {
            tracing::warn!(
                checked = report.checked,
                violations = report.violations.len(),
                "Chain verification found violations"
            );
        }
        Ok(report)
    }

    /// Walk predecessor links back to genesis.
    pub(crate) fn height_of(&self, id: BlockId) -> Result<u64, LedgerError> {
        let store = self.store.read();
        let count = store.count()?;

        let mut current = store
            .find_by_id(id)?
            .ok_or(LedgerError::BlockNotFound { id })?;
        let mut height = 0u64;

        while let Some(previous_block_id) = current.previous_block_id {
            height += 1;
            if height >= count {
                // Longer than the chain itself: the links form a cycle.
                return Err(LedgerError::InconsistentChain { count });
            }
            current = store
                .find_by_id(previous_block_id)?
                .ok_or(LedgerError::BlockNotFound {
                    id: previous_block_id,
                })?;
        }
        Ok(height)
    }

    pub(crate) fn successor_of(&self, id: BlockId) -> Result<Option<Block>, LedgerError> {
        let store = self.store.read();
        if store.find_by_id(id)?.is_none() {
            return Err(LedgerError::BlockNotFound { id });
        }
        Ok(store.find_successor(id)?)
    }
}
