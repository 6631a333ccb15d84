use chrono::{Duration, TimeZone, Utc};

use crate::domain::block::{Block, BlockId, NewBlock, Timestamp, GENESIS_PREVIOUS_HASH};
use crate::domain::hashing::compute_hash;

/// Fixed reference instant: 2024-01-01T00:00:00Z.
pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid reference instant")
}

pub fn make_new_block(
    previous_hash: &str,
    previous_block_id: Option<BlockId>,
    timestamp: Timestamp,
) -> NewBlock {
    NewBlock {
        previous_hash: previous_hash.to_string(),
        block_hash: compute_hash(Some(previous_hash), &timestamp),
        timestamp,
        block_size: 4,
        previous_block_id,
        created_at: timestamp,
        updated_at: timestamp,
    }
}

/// Standalone block (not linked) with the given size and timestamp.
pub fn make_block(id: BlockId, block_size: u64, timestamp: Timestamp) -> Block {
    let previous_hash = format!("{:064x}", id);
    let mut new = make_new_block(&previous_hash, None, timestamp);
    new.block_size = block_size;
    Block::from_new(id, new)
}

/// Well-formed chain of `len` blocks, one second apart, ids from 1.
pub fn make_chain(len: usize, start: Timestamp) -> Vec<Block> {
    let mut chain: Vec<Block> = Vec::with_capacity(len);
    for i in 0..len {
        let timestamp = start + Duration::seconds(i as i64);
        let new = match chain.last() {
            None => make_new_block(GENESIS_PREVIOUS_HASH, None, timestamp),
            Some(prev) => make_new_block(&prev.block_hash, Some(prev.id), timestamp),
        };
        let block = Block::from_new(i as BlockId + 1, new);
        if let Some(prev) = chain.last_mut() {
            prev.next_block_id = Some(block.id);
        }
        chain.push(block);
    }
    chain
}
