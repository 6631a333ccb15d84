//! # Ledger Service
//!
//! The service implementing [`LedgerApi`]: the chain builder (`builder`)
//! and the read-side queries (`query`).
//!
//! ## Concurrency
//!
//! The store sits behind a `parking_lot::RwLock`. `create_block` holds the
//! write lock from the emptiness check through the insert, so two appends can
//! never observe the same head. Reads share the lock.

mod builder;
mod query;

use parking_lot::RwLock;

use crate::adapters::{InMemoryBlockStore, SecureRandomSizer, SystemTimeSource};
use crate::domain::block::{Block, BlockId};
use crate::domain::errors::LedgerError;
use crate::domain::filter::BlockFilter;
use crate::domain::integrity::ChainReport;
use crate::domain::stats::ChainStats;
use crate::ports::inbound::LedgerApi;
use crate::ports::outbound::{BlockSizer, BlockStore, TimeSource};

/// The Ledger Service.
pub struct LedgerService<S, T, Z>
where
    S: BlockStore,
    T: TimeSource,
    Z: BlockSizer,
{
    pub(crate) store: RwLock<S>,
    pub(crate) time_source: T,
    pub(crate) sizer: Z,
}

/// Dependencies for [`LedgerService`].
pub struct LedgerDependencies<S, T, Z> {
    pub store: S,
    pub time_source: T,
    pub sizer: Z,
}

impl<S, T, Z> LedgerService<S, T, Z>
where
    S: BlockStore,
    T: TimeSource,
    Z: BlockSizer,
{
    pub fn new(deps: LedgerDependencies<S, T, Z>) -> Self {
        Self {
            store: RwLock::new(deps.store),
            time_source: deps.time_source,
            sizer: deps.sizer,
        }
    }
}

impl LedgerService<InMemoryBlockStore, SystemTimeSource, SecureRandomSizer> {
    /// Volatile ledger with the production clock and sizer.
    pub fn in_memory() -> Self {
        Self::new(LedgerDependencies {
            store: InMemoryBlockStore::new(),
            time_source: SystemTimeSource,
            sizer: SecureRandomSizer,
        })
    }
}

impl<S, T, Z> LedgerApi for LedgerService<S, T, Z>
where
    S: BlockStore,
    T: TimeSource,
    Z: BlockSizer,
{
    fn create_block(&self) -> Result<Block, LedgerError> {
        self.append_block()
    }

    fn get_block_by_id(&self, id: BlockId) -> Result<Block, LedgerError> {
        self.block_by_id(id)
    }

    fn get_block_by_hash(&self, hash: &str) -> Result<Block, LedgerError> {
        self.block_by_hash(hash)
    }

    fn get_latest_block(&self) -> Result<Block, LedgerError> {
        self.latest_block()
    }

    fn get_genesis_block(&self) -> Result<Option<Block>, LedgerError> {
        self.genesis_block()
    }

    fn list_blocks(&self) -> Result<Vec<Block>, LedgerError> {
        self.search(&BlockFilter::default())
    }

    fn search_blocks(&self, filter: &BlockFilter) -> Result<Vec<Block>, LedgerError> {
        self.search(filter)
    }

    fn block_exists(&self, hash: &str) -> Result<bool, LedgerError> {
        self.exists(hash)
    }

    fn chain_stats(&self) -> Result<ChainStats, LedgerError> {
        self.stats()
    }

    fn verify_chain(&self) -> Result<ChainReport, LedgerError> {
        self.verify()
    }

    fn block_height(&self, id: BlockId) -> Result<u64, LedgerError> {
        self.height_of(id)
    }

    fn get_successor(&self, id: BlockId) -> Result<Option<Block>, LedgerError> {
        self.successor_of(id)
    }
}
