//! # Persistence Flows
//!
//! File-backed ledger across restarts, guarded by the data directory lock.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use block_ledger::adapters::{
        BincodeBlockSerializer, DatabaseLock, FileBackedKVStore, FixedBlockSizer, KvBlockStore,
        LockError, SystemTimeSource,
    };
    use block_ledger::{LedgerApi, LedgerDependencies, LedgerService};
    use ledger_node::config::STORE_FILE_NAME;

    fn open(dir: &std::path::Path) -> impl LedgerApi {
        let kv = FileBackedKVStore::open(dir.join(STORE_FILE_NAME)).unwrap();
        LedgerService::new(LedgerDependencies {
            store: KvBlockStore::open(kv, BincodeBlockSerializer).unwrap(),
            time_source: SystemTimeSource,
            sizer: FixedBlockSizer(3),
        })
    }

    #[test]
    fn test_chain_continues_after_restart() {
        let dir = tempfile::tempdir().unwrap();

        let head = {
            let _lock = DatabaseLock::acquire(dir.path()).unwrap();
            let ledger = open(dir.path());
            ledger.create_block().unwrap();
            ledger.create_block().unwrap()
        };

        let _lock = DatabaseLock::acquire(dir.path()).unwrap();
        let ledger = open(dir.path());
        assert_eq!(ledger.get_latest_block().unwrap(), head);

        let next = ledger.create_block().unwrap();
        assert_eq!(next.id, 3);
        assert_eq!(next.previous_block_id, Some(head.id));
        assert_eq!(next.previous_hash, head.block_hash);
        assert!(ledger.verify_chain().unwrap().is_valid());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_second_node_cannot_share_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let _first = DatabaseLock::acquire(dir.path()).unwrap();

        let second = DatabaseLock::acquire_with_timeout(dir.path(), Duration::from_millis(100));
        assert!(matches!(second, Err(LockError::AlreadyLocked { .. })));
    }
}
