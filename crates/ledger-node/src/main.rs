//! # Ledger Node
//!
//! Entry point: loads configuration from the environment, opens the ledger
//! and serves the REST API until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use block_ledger::adapters::{
    BincodeBlockSerializer, DatabaseLock, FileBackedKVStore, KvBlockStore, SecureRandomSizer,
    SystemTimeSource,
};
use block_ledger::{LedgerApi, LedgerDependencies, LedgerService};
use ledger_node::{api, LedgerHandle, NodeConfig, StorageBackend};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Open the configured ledger. The returned lock must outlive the ledger.
fn open_ledger(config: &NodeConfig) -> Result<(Arc<dyn LedgerApi>, Option<DatabaseLock>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory block store; the chain is not persisted");
            let ledger: Arc<dyn LedgerApi> = Arc::new(LedgerService::in_memory());
            Ok((ledger, None))
        }
        StorageBackend::File => {
            let lock = DatabaseLock::acquire(&config.storage.data_dir).with_context(|| {
                format!(
                    "failed to lock data directory {}",
                    config.storage.data_dir.display()
                )
            })?;

            let path = config.storage.store_path();
            let kv = FileBackedKVStore::open(&path)
                .with_context(|| format!("failed to open store file {}", path.display()))?;
            let store = KvBlockStore::open(kv, BincodeBlockSerializer)
                .context("failed to rebuild ledger index")?;

            let ledger = LedgerService::new(LedgerDependencies {
                store,
                time_source: SystemTimeSource,
                sizer: SecureRandomSizer,
            });
            let ledger: Arc<dyn LedgerApi> = Arc::new(ledger);
            Ok((ledger, Some(lock)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = NodeConfig::from_env().context("invalid node configuration")?;
    info!(
        listen_addr = %config.network.listen_addr,
        backend = ?config.storage.backend,
        data_dir = %config.storage.data_dir.display(),
        store_timeout_ms = config.api.store_timeout.as_millis() as u64,
        "Starting ledger node"
    );

    let (ledger, _lock) = open_ledger(&config)?;
    let stats = ledger.chain_stats().context("failed to read chain stats")?;
    info!(blocks = stats.total_blocks, "Ledger ready");

    let app = api::router(LedgerHandle::new(ledger, config.api.store_timeout));
    let listener = tokio::net::TcpListener::bind(config.network.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.network.listen_addr))?;
    info!(addr = %config.network.listen_addr, "Serving /api/v1/blocks");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Ledger node stopped");
    Ok(())
}
