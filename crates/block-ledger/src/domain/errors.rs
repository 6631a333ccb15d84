//! # Domain Errors
//!
//! Error types for the ledger.
//!
//! ## Design Principles
//!
//! - Each error maps to a specific failure mode or invariant violation
//! - Boundary layers match on [`ErrorKind`], not on individual variants
//! - No panics in domain logic (use Result instead)

use thiserror::Error;

use super::block::BlockId;

/// Errors surfaced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No block with this id.
    #[error("Block not found with ID: {id}")]
    BlockNotFound { id: BlockId },

    /// No block with this hash.
    #[error("Block not found with hash: {hash}")]
    HashNotFound { hash: String },

    /// `latest` requested before any block was created.
    #[error("No blocks found in blockchain")]
    EmptyChain,

    /// Store reports blocks but cannot produce a chain head.
    #[error("Chain inconsistency: store reports {count} block(s) but no latest block")]
    InconsistentChain { count: u64 },

    /// Hash uniqueness violated on insert.
    #[error("Block hash already exists: {hash}")]
    DuplicateHash { hash: String },

    /// A second successor was appended to the same predecessor.
    #[error("Block {previous_block_id} already has a successor (fork rejected)")]
    ForkRejected { previous_block_id: BlockId },

    /// Stored record failed its checksum.
    #[error("Data corruption detected for block {id}: expected checksum {expected}, got {actual}")]
    DataCorruption {
        id: BlockId,
        expected: u32,
        actual: u32,
    },

    /// A store call exceeded the caller-supplied bound.
    #[error("Ledger operation '{operation}' timed out after {after_ms} ms")]
    Timeout {
        operation: &'static str,
        after_ms: u64,
    },

    /// The task running a store call was cancelled before completing.
    #[error("Ledger operation '{operation}' was cancelled")]
    Cancelled { operation: &'static str },

    /// Backend I/O failure.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Encoding/decoding failure.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Coarse classification used by boundary layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    EmptyChain,
    Internal,
    Conflict,
    Timeout,
    Cancelled,
    Storage,
}

impl ErrorKind {
    /// Stable upper-case code for wire responses.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::EmptyChain => "EMPTY_CHAIN",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::Storage => "STORAGE",
        }
    }
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::BlockNotFound { .. } | LedgerError::HashNotFound { .. } => {
                ErrorKind::NotFound
            }
            LedgerError::EmptyChain => ErrorKind::EmptyChain,
            LedgerError::InconsistentChain { .. } | LedgerError::DataCorruption { .. } => {
                ErrorKind::Internal
            }
            LedgerError::DuplicateHash { .. } | LedgerError::ForkRejected { .. } => {
                ErrorKind::Conflict
            }
            LedgerError::Timeout { .. } => ErrorKind::Timeout,
            LedgerError::Cancelled { .. } => ErrorKind::Cancelled,
            LedgerError::Storage { .. } | LedgerError::Serialization { .. } => ErrorKind::Storage,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

/// Errors raised by `BlockStore` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("duplicate block hash {hash}")]
    DuplicateHash { hash: String },

    #[error("block {previous_block_id} already has a successor")]
    DuplicatePredecessor { previous_block_id: BlockId },

    #[error("checksum mismatch for block {id}: expected {expected}, got {actual}")]
    Corrupted {
        id: BlockId,
        expected: u32,
        actual: u32,
    },

    #[error("store backend failure: {message}")]
    Backend { message: String },
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateHash { hash } => LedgerError::DuplicateHash { hash },
            StoreError::DuplicatePredecessor { previous_block_id } => {
                LedgerError::ForkRejected { previous_block_id }
            }
            StoreError::Corrupted {
                id,
                expected,
                actual,
            } => LedgerError::DataCorruption {
                id,
                expected,
                actual,
            },
            StoreError::Backend { message } => LedgerError::Storage { message },
        }
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },
    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

impl From<KVStoreError> for StoreError {
    fn from(err: KVStoreError) -> Self {
        StoreError::Backend {
            message: err.to_string(),
        }
    }
}

/// Serialization errors.
#[derive(Debug, Clone, Error)]
#[error("Serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}

impl From<SerializationError> for StoreError {
    fn from(err: SerializationError) -> Self {
        StoreError::Backend {
            message: err.to_string(),
        }
    }
}

impl From<SerializationError> for LedgerError {
    fn from(err: SerializationError) -> Self {
        LedgerError::Serialization {
            message: err.message,
        }
    }
}
