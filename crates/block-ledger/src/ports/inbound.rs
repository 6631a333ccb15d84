//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the ledger: the append operation (chain builder) and
//! the read-side query surface.

use crate::domain::block::{Block, BlockId};
use crate::domain::errors::LedgerError;
use crate::domain::filter::BlockFilter;
use crate::domain::integrity::ChainReport;
use crate::domain::stats::ChainStats;

/// Primary API for the ledger.
///
/// Implementations must serialize `create_block` so that at most one block
/// is ever appended per predecessor. Read operations may run in parallel.
pub trait LedgerApi: Send + Sync {
    /// Append one block to the current head (or create genesis).
    ///
    /// No caller-supplied fields are honored: linkage, hash, timestamps and
    /// size are all decided here.
    ///
    /// ## Errors
    ///
    /// - `InconsistentChain`: store reports blocks but no latest block
    /// - `DuplicateHash` / `ForkRejected`: store uniqueness rejected the insert
    fn create_block(&self) -> Result<Block, LedgerError>;

    /// ## Errors
    ///
    /// - `BlockNotFound`: no block with this id
    fn get_block_by_id(&self, id: BlockId) -> Result<Block, LedgerError>;

    /// ## Errors
    ///
    /// - `HashNotFound`: no block with this hash
    fn get_block_by_hash(&self, hash: &str) -> Result<Block, LedgerError>;

    /// The chain head.
    ///
    /// ## Errors
    ///
    /// - `EmptyChain`: no block has ever been created
    fn get_latest_block(&self) -> Result<Block, LedgerError>;

    /// The genesis block, or `None` before the chain is initialized.
    fn get_genesis_block(&self) -> Result<Option<Block>, LedgerError>;

    /// Every block, newest first.
    fn list_blocks(&self) -> Result<Vec<Block>, LedgerError>;

    /// Filtered, ordered blocks. A default filter behaves like `list_blocks`.
    fn search_blocks(&self, filter: &BlockFilter) -> Result<Vec<Block>, LedgerError>;

    /// Whether a block with this hash exists.
    ///
    /// ## Errors
    ///
    /// - `Storage`: the backend could not answer
    fn block_exists(&self, hash: &str) -> Result<bool, LedgerError>;

    /// Count, average size and best-effort latest/genesis.
    ///
    /// Never fails because the chain is empty; only a backend failure of the
    /// count or average aggregate is returned as an error.
    fn chain_stats(&self) -> Result<ChainStats, LedgerError>;

    /// Walk the whole chain and report every broken invariant.
    fn verify_chain(&self) -> Result<ChainReport, LedgerError>;

    /// Position of a block in the chain (genesis = 0), computed by walking
    /// predecessor links rather than trusting the surrogate id.
    ///
    /// ## Errors
    ///
    /// - `BlockNotFound`: the block or one of its predecessors is missing
    fn block_height(&self, id: BlockId) -> Result<u64, LedgerError>;

    /// The block appended directly after `id`, if any.
    ///
    /// ## Errors
    ///
    /// - `BlockNotFound`: no block with this id
    fn get_successor(&self, id: BlockId) -> Result<Option<Block>, LedgerError>;
}
