//! # Chain Verification
//!
//! Read-only walk over the full block set checking every chain invariant.
//! Violations are collected, not repaired.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use super::block::{Block, BlockId};
use super::hashing::compute_hash;

/// A single broken invariant found by [`verify_blocks`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainViolation {
    #[error("chain has blocks but no genesis block")]
    MissingGenesis,

    #[error("multiple genesis blocks: {ids:?}")]
    MultipleGenesis { ids: Vec<BlockId> },

    #[error("genesis block {id} references predecessor {previous_block_id}")]
    GenesisHasPredecessor {
        id: BlockId,
        previous_block_id: BlockId,
    },

    #[error("block {id} hash does not match its linkage data")]
    HashMismatch { id: BlockId },

    #[error("block {id} has no predecessor reference")]
    MissingPredecessor { id: BlockId },

    #[error("block {id} references unknown predecessor {previous_block_id}")]
    DanglingPredecessor {
        id: BlockId,
        previous_block_id: BlockId,
    },

    #[error("block {id} previous hash does not match block {previous_block_id}")]
    BrokenLink {
        id: BlockId,
        previous_block_id: BlockId,
    },

    #[error("block {previous_block_id} has multiple successors: {successors:?}")]
    Fork {
        previous_block_id: BlockId,
        successors: Vec<BlockId>,
    },

    #[error("blocks unreachable from genesis: {ids:?}")]
    Unreachable { ids: Vec<BlockId> },
}

/// Outcome of a verification walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
    /// Number of blocks inspected.
    pub checked: u64,
    pub violations: Vec<ChainViolation>,
}

impl ChainReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Verify linkage, hashes, genesis uniqueness and linearity.
pub fn verify_blocks(blocks: &[Block]) -> ChainReport {
    let mut report = ChainReport {
        checked: blocks.len() as u64,
        violations: Vec::new(),
    };
    if blocks.is_empty() {
        return report;
    }

    let by_id: HashMap<BlockId, &Block> = blocks.iter().map(|b| (b.id, b)).collect();
    let mut successors: BTreeMap<BlockId, Vec<BlockId>> = BTreeMap::new();
    let mut genesis_ids = Vec::new();

    for block in blocks {
        if compute_hash(Some(&block.previous_hash), &block.timestamp) != block.block_hash {
            report
                .violations
                .push(ChainViolation::HashMismatch { id: block.id });
        }

        if block.is_genesis() {
            genesis_ids.push(block.id);
            if let Some(previous_block_id) = block.previous_block_id {
                report.violations.push(ChainViolation::GenesisHasPredecessor {
                    id: block.id,
                    previous_block_id,
                });
            }
            continue;
        }

        let Some(previous_block_id) = block.previous_block_id else {
            report
                .violations
                .push(ChainViolation::MissingPredecessor { id: block.id });
            continue;
        };
        successors.entry(previous_block_id).or_default().push(block.id);

        match by_id.get(&previous_block_id) {
            None => report.violations.push(ChainViolation::DanglingPredecessor {
                id: block.id,
                previous_block_id,
            }),
            Some(previous) if previous.block_hash != block.previous_hash => {
                report.violations.push(ChainViolation::BrokenLink {
                    id: block.id,
                    previous_block_id,
                })
            }
            Some(_) => {}
        }
    }

    for (previous_block_id, ids) in &successors {
        if ids.len() > 1 {
            report.violations.push(ChainViolation::Fork {
                previous_block_id: *previous_block_id,
                successors: ids.clone(),
            });
        }
    }

    genesis_ids.sort_unstable();
    match genesis_ids.as_slice() {
        [] => report.violations.push(ChainViolation::MissingGenesis),
        [genesis] => {
            let unreachable = unreachable_from(*genesis, blocks, &successors);
            if !unreachable.is_empty() {
                report
                    .violations
                    .push(ChainViolation::Unreachable { ids: unreachable });
            }
        }
        ids => report
            .violations
            .push(ChainViolation::MultipleGenesis { ids: ids.to_vec() }),
    }

    report
}

fn unreachable_from(
    genesis: BlockId,
    blocks: &[Block],
    successors: &BTreeMap<BlockId, Vec<BlockId>>,
) -> Vec<BlockId> {
    let mut reached = std::collections::HashSet::new();
    let mut frontier = vec![genesis];
    while let Some(id) = frontier.pop() {
        if !reached.insert(id) {
            continue;
        }
        if let Some(next) = successors.get(&id) {
            frontier.extend(next.iter().copied());
        }
    }

    let mut ids: Vec<BlockId> = blocks
        .iter()
        .map(|b| b.id)
        .filter(|id| !reached.contains(id))
        .collect();
    ids.sort_unstable();
    ids
}
