//! # Ledger Node
//!
//! Runs a [`block_ledger::LedgerService`] behind a REST API.
//!
//! ## Modules
//!
//! - `config` - `NodeConfig` loaded from `LEDGER_*` environment variables
//! - `handle` - `LedgerHandle`: blocking ledger calls bounded by a timeout
//! - `api` - axum router, DTOs and error mapping
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber
//! 2. Load and validate configuration
//! 3. Lock the data directory and open the store (file backend only)
//! 4. Serve `/api/v1/blocks` until Ctrl-C

pub mod api;
pub mod config;
pub mod handle;

pub use config::{ConfigError, NodeConfig, StorageBackend};
pub use handle::LedgerHandle;
