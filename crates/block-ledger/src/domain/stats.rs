//! # Chain Statistics
//!
//! Aggregate view returned by `LedgerApi::chain_stats`. `latest_block` and
//! `genesis_block` are best-effort: a failed sub-fetch leaves them `None`.

use super::block::Block;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainStats {
    pub total_blocks: u64,
    /// `None` when the store is empty.
    pub average_block_size: Option<f64>,
    pub latest_block: Option<Block>,
    pub genesis_block: Option<Block>,
}

impl ChainStats {
    /// Whether the ledger has never had a block appended.
    pub fn is_empty(&self) -> bool {
        self.total_blocks == 0
    }
}
