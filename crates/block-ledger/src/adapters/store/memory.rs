use std::collections::HashMap;

use crate::domain::block::{Block, BlockId, NewBlock};
use crate::domain::errors::StoreError;
use crate::domain::filter::BlockFilter;
use crate::ports::outbound::BlockStore;

/// Arena-backed block store.
///
/// Blocks are kept in insertion order; the id of `blocks[i]` is `i + 1`.
/// Chain navigation uses id indexes, never references.
#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    blocks: Vec<Block>,
    by_hash: HashMap<String, BlockId>,
    /// predecessor id -> successor id. Doubles as the linearity guard.
    successors: HashMap<BlockId, BlockId>,
    genesis: Option<BlockId>,
    size_sum: u128,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: BlockId) -> Option<&Block> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.blocks.get(index)
    }

    fn hydrate(&self, block: &Block) -> Block {
        let mut block = block.clone();
        block.next_block_id = self.successors.get(&block.id).copied();
        block
    }

    fn lookup(&self, id: BlockId) -> Option<Block> {
        self.slot(id).map(|b| self.hydrate(b))
    }
}

impl BlockStore for InMemoryBlockStore {
    fn insert(&mut self, block: NewBlock) -> Result<Block, StoreError> {
        if self.by_hash.contains_key(&block.block_hash) {
            return Err(StoreError::DuplicateHash {
                hash: block.block_hash,
            });
        }
        if let Some(previous_block_id) = block.previous_block_id {
            if self.successors.contains_key(&previous_block_id) {
                return Err(StoreError::DuplicatePredecessor { previous_block_id });
            }
        }

        let id = self.blocks.len() as BlockId + 1;
        let stored = Block::from_new(id, block);

        self.by_hash.insert(stored.block_hash.clone(), id);
        if let Some(previous_block_id) = stored.previous_block_id {
            self.successors.insert(previous_block_id, id);
        }
        if stored.is_genesis() && self.genesis.is_none() {
            self.genesis = Some(id);
        }
        self.size_sum += u128::from(stored.block_size);
        self.blocks.push(stored.clone());

        Ok(stored)
    }

    fn find_by_id(&self, id: BlockId) -> Result<Option<Block>, StoreError> {
        Ok(self.lookup(id))
    }

    fn find_by_hash(&self, hash: &str) -> Result<Option<Block>, StoreError> {
        Ok(self.by_hash.get(hash).and_then(|id| self.lookup(*id)))
    }

    fn exists_by_hash(&self, hash: &str) -> Result<bool, StoreError> {
        Ok(self.by_hash.contains_key(hash))
    }

    fn find_latest(&self) -> Result<Option<Block>, StoreError> {
        Ok(self
            .blocks
            .iter()
            .max_by_key(|b| b.recency_key())
            .map(|b| self.hydrate(b)))
    }

    fn find_genesis(&self) -> Result<Option<Block>, StoreError> {
        Ok(self.genesis.and_then(|id| self.lookup(id)))
    }

    fn find_successor(&self, id: BlockId) -> Result<Option<Block>, StoreError> {
        Ok(self.successors.get(&id).and_then(|next| self.lookup(*next)))
    }

    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.blocks.len() as u64)
    }

    fn average_size(&self) -> Result<Option<f64>, StoreError> {
        if self.blocks.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.size_sum as f64 / self.blocks.len() as f64))
    }

    fn search(&self, filter: &BlockFilter) -> Result<Vec<Block>, StoreError> {
        Ok(filter.select(self.blocks.iter().map(|b| self.hydrate(b))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::GENESIS_PREVIOUS_HASH;
    use crate::test_utils::{make_new_block, t0};
    use chrono::Duration;

    fn store_with_chain(len: usize) -> InMemoryBlockStore {
        let mut store = InMemoryBlockStore::new();
        let mut head: Option<Block> = None;
        for i in 0..len {
            let ts = t0() + Duration::seconds(i as i64);
            let new = match &head {
                None => make_new_block(GENESIS_PREVIOUS_HASH, None, ts),
                Some(prev) => make_new_block(&prev.block_hash, Some(prev.id), ts),
            };
            head = Some(store.insert(new).unwrap());
        }
        store
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = store_with_chain(3);
        let ids: Vec<_> = (1..=3)
            .map(|id| store.find_by_id(id).unwrap().unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.count().unwrap(), 3);
        assert!(store.find_by_id(0).unwrap().is_none());
        assert!(store.find_by_id(4).unwrap().is_none());
    }

    #[test]
    fn test_navigation_is_hydrated() {
        let store = store_with_chain(3);
        let first = store.find_by_id(1).unwrap().unwrap();
        let last = store.find_by_id(3).unwrap().unwrap();

        assert_eq!(first.next_block_id, Some(2));
        assert_eq!(first.previous_block_id, None);
        assert_eq!(last.next_block_id, None);
        assert_eq!(last.previous_block_id, Some(2));
        assert_eq!(store.find_successor(2).unwrap().unwrap().id, 3);
    }

    #[test]
    fn test_duplicate_hash_rejected() {
        let mut store = InMemoryBlockStore::new();
        let new = make_new_block(GENESIS_PREVIOUS_HASH, None, t0());
        store.insert(new.clone()).unwrap();

        let result = store.insert(new);
        assert!(matches!(result, Err(StoreError::DuplicateHash { .. })));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_second_successor_rejected() {
        let mut store = store_with_chain(1);
        let genesis = store.find_genesis().unwrap().unwrap();

        let a = make_new_block(&genesis.block_hash, Some(1), t0() + Duration::seconds(5));
        let b = make_new_block(&genesis.block_hash, Some(1), t0() + Duration::seconds(6));
        store.insert(a).unwrap();

        let result = store.insert(b);
        assert_eq!(
            result,
            Err(StoreError::DuplicatePredecessor {
                previous_block_id: 1
            })
        );
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_latest_prefers_timestamp_then_id() {
        let mut store = InMemoryBlockStore::new();
        let a = store.insert(make_new_block("aa", None, t0())).unwrap();
        store
            .insert(make_new_block("bb", None, t0() - Duration::seconds(1)))
            .unwrap();
        assert_eq!(store.find_latest().unwrap().unwrap().id, a.id);

        let c = store.insert(make_new_block("cc", None, t0())).unwrap();
        assert_eq!(store.find_latest().unwrap().unwrap().id, c.id);
    }

    #[test]
    fn test_aggregates() {
        let empty = InMemoryBlockStore::new();
        assert_eq!(empty.count().unwrap(), 0);
        assert_eq!(empty.average_size().unwrap(), None);
        assert!(empty.find_latest().unwrap().is_none());
        assert!(empty.find_genesis().unwrap().is_none());

        let mut store = InMemoryBlockStore::new();
        let mut first = make_new_block(GENESIS_PREVIOUS_HASH, None, t0());
        first.block_size = 2;
        let first = store.insert(first).unwrap();
        let mut second = make_new_block(&first.block_hash, Some(first.id), t0());
        second.block_size = 5;
        store.insert(second).unwrap();

        assert_eq!(store.average_size().unwrap(), Some(3.5));
        assert_eq!(store.find_genesis().unwrap().unwrap().id, 1);
    }

    #[test]
    fn test_exists_and_find_by_hash() {
        let store = store_with_chain(2);
        let second = store.find_by_id(2).unwrap().unwrap();

        assert!(store.exists_by_hash(&second.block_hash).unwrap());
        assert_eq!(
            store.find_by_hash(&second.block_hash).unwrap().unwrap().id,
            2
        );
        assert!(!store.exists_by_hash("deadbeef").unwrap());
        assert!(store.find_by_hash("deadbeef").unwrap().is_none());
    }

    #[test]
    fn test_search_delegates_to_filter() {
        let store = store_with_chain(3);
        let all = store.search(&BlockFilter::new()).unwrap();
        assert_eq!(all.iter().map(|b| b.id).collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(all[2].next_block_id, Some(2));
    }
}
