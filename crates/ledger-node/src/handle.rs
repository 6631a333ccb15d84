//! # Ledger Handle
//!
//! Async facade over a blocking [`LedgerApi`]. Each call runs on tokio's
//! blocking pool and is bounded by the configured store timeout.
//!
//! A call that times out is abandoned, not aborted: the blocking task may
//! still finish (a `create_block` may still append).

use std::sync::Arc;
use std::time::Duration;

use block_ledger::{Block, BlockFilter, BlockId, ChainReport, ChainStats, LedgerApi, LedgerError};
use tokio::task;

#[derive(Clone)]
pub struct LedgerHandle {
    ledger: Arc<dyn LedgerApi>,
    timeout: Duration,
}

impl LedgerHandle {
    pub fn new(ledger: Arc<dyn LedgerApi>, timeout: Duration) -> Self {
        Self { ledger, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `f` against the ledger on the blocking pool.
    ///
    /// ## Errors
    ///
    /// - `Timeout`: `f` did not finish within the handle's timeout
    /// - `Cancelled`: the blocking task panicked or was aborted
    pub async fn call<R, F>(&self, operation: &'static str, f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&dyn LedgerApi) -> Result<R, LedgerError> + Send + 'static,
        R: Send + 'static,
    {
        let ledger = Arc::clone(&self.ledger);
        let join = task::spawn_blocking(move || f(ledger.as_ref()));

        match tokio::time::timeout(self.timeout, join).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::error!(operation, error = %e, "Ledger task did not complete");
                Err(LedgerError::Cancelled { operation })
            }
            Err(_) => {
                let after_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(operation, after_ms, "Ledger call timed out");
                Err(LedgerError::Timeout {
                    operation,
                    after_ms,
                })
            }
        }
    }

    pub async fn create_block(&self) -> Result<Block, LedgerError> {
        self.call("create_block", |l| l.create_block()).await
    }

    pub async fn get_block_by_id(&self, id: BlockId) -> Result<Block, LedgerError> {
        self.call("get_block_by_id", move |l| l.get_block_by_id(id)).await
    }

    pub async fn get_block_by_hash(&self, hash: String) -> Result<Block, LedgerError> {
        self.call("get_block_by_hash", move |l| l.get_block_by_hash(&hash)).await
    }

    pub async fn get_latest_block(&self) -> Result<Block, LedgerError> {
        self.call("get_latest_block", |l| l.get_latest_block()).await
    }

    pub async fn get_genesis_block(&self) -> Result<Option<Block>, LedgerError> {
        self.call("get_genesis_block", |l| l.get_genesis_block()).await
    }

    pub async fn list_blocks(&self) -> Result<Vec<Block>, LedgerError> {
        self.call("list_blocks", |l| l.list_blocks()).await
    }

    pub async fn search_blocks(&self, filter: BlockFilter) -> Result<Vec<Block>, LedgerError> {
        self.call("search_blocks", move |l| l.search_blocks(&filter)).await
    }

    pub async fn block_exists(&self, hash: String) -> Result<bool, LedgerError> {
        self.call("block_exists", move |l| l.block_exists(&hash)).await
    }

    pub async fn chain_stats(&self) -> Result<ChainStats, LedgerError> {
        self.call("chain_stats", |l| l.chain_stats()).await
    }

    pub async fn verify_chain(&self) -> Result<ChainReport, LedgerError> {
        self.call("verify_chain", |l| l.verify_chain()).await
    }

    pub async fn block_height(&self, id: BlockId) -> Result<u64, LedgerError> {
        self.call("block_height", move |l| l.block_height(id)).await
    }

    pub async fn get_successor(&self, id: BlockId) -> Result<Option<Block>, LedgerError> {
        self.call("get_successor", move |l| l.get_successor(id)).await
    }
}
