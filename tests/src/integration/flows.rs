//! # Ledger Flows
//!
//! Append/query scenarios driven through the public `LedgerApi` and the
//! async `LedgerHandle`, the way the node uses them.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use block_ledger::adapters::{
        BincodeBlockSerializer, FixedBlockSizer, InMemoryKVStore, KvBlockStore, ManualTimeSource,
    };
    use block_ledger::{
        compute_hash, BlockFilter, LedgerApi, LedgerDependencies, LedgerService, SortKey,
        GENESIS_PREVIOUS_HASH,
    };
    use chrono::{TimeZone, Utc};
    use ledger_node::LedgerHandle;

    fn kv_ledger() -> impl LedgerApi {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        LedgerService::new(LedgerDependencies {
            store: KvBlockStore::open(InMemoryKVStore::new(), BincodeBlockSerializer).unwrap(),
            time_source: ManualTimeSource::new(start, chrono::Duration::seconds(1)),
            sizer: FixedBlockSizer(5),
        })
    }

    #[test]
    fn test_chain_of_ten_is_verifiable() {
        let ledger = kv_ledger();
        for _ in 0..10 {
            ledger.create_block().unwrap();
        }

        let genesis = ledger.get_genesis_block().unwrap().unwrap();
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);

        // Walk forward through successor links.
        let mut walked = vec![genesis.clone()];
        while let Some(next) = ledger.get_successor(walked.last().unwrap().id).unwrap() {
            assert_eq!(next.previous_hash, walked.last().unwrap().block_hash);
            assert_eq!(
                next.block_hash,
                compute_hash(Some(&next.previous_hash), &next.timestamp)
            );
            walked.push(next);
        }
        assert_eq!(walked.len(), 10);
        assert_eq!(walked.last().unwrap().id, ledger.get_latest_block().unwrap().id);

        let report = ledger.verify_chain().unwrap();
        assert!(report.is_valid());
        assert_eq!(report.checked, 10);
        assert_eq!(ledger.block_height(walked[9].id).unwrap(), 9);
    }

    #[test]
    fn test_search_scenario() {
        let ledger = kv_ledger();
        let blocks: Vec<_> = (0..3).map(|_| ledger.create_block().unwrap()).collect();

        let newest_first: Vec<_> = ledger.list_blocks().unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(newest_first, vec![blocks[2].id, blocks[1].id, blocks[0].id]);

        let filter = BlockFilter::new()
            .with_timestamp_range(Some(blocks[1].timestamp), None)
            .sorted_by(SortKey::TimestampAsc);
        let tail: Vec<_> = ledger
            .search_blocks(&filter)
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(tail, vec![blocks[1].id, blocks[2].id]);

        let stats = ledger.chain_stats().unwrap();
        assert_eq!(stats.total_blocks, 3);
        assert_eq!(stats.average_block_size, Some(5.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_requests_keep_chain_linear() {
        let ledger: Arc<dyn LedgerApi> = Arc::new(LedgerService::in_memory());
        let handle = LedgerHandle::new(ledger, Duration::from_secs(5));

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.create_block().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let report = handle.verify_chain().await.unwrap();
        assert_eq!(report.checked, 32);
        assert!(report.is_valid(), "violations: {:?}", report.violations);

        let stats = handle.chain_stats().await.unwrap();
        let average = stats.average_block_size.unwrap();
        assert!((2.0..=6.0).contains(&average));
    }
}
