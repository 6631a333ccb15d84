//! Request/response bodies (camelCase on the wire).

use block_ledger::{Block, BlockFilter, BlockId, ChainReport, ChainStats, SortKey, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    pub id: BlockId,
    pub previous_hash: String,
    pub block_hash: String,
    pub timestamp: Timestamp,
    pub block_size: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub previous_block_id: Option<BlockId>,
    pub next_block_id: Option<BlockId>,
}

impl From<Block> for BlockResponse {
    fn from(block: Block) -> Self {
        Self {
            id: block.id,
            previous_hash: block.previous_hash,
            block_hash: block.block_hash,
            timestamp: block.timestamp,
            block_size: block.block_size,
            created_at: block.created_at,
            updated_at: block.updated_at,
            previous_block_id: block.previous_block_id,
            next_block_id: block.next_block_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStatsResponse {
    pub total_blocks: u64,
    pub average_block_size: Option<f64>,
    pub latest_block: Option<BlockResponse>,
    pub genesis_block: Option<BlockResponse>,
}

impl From<ChainStats> for BlockStatsResponse {
    fn from(stats: ChainStats) -> Self {
        Self {
            total_blocks: stats.total_blocks,
            average_block_size: stats.average_block_size,
            latest_block: stats.latest_block.map(BlockResponse::from),
            genesis_block: stats.genesis_block.map(BlockResponse::from),
        }
    }
}

/// Search body. Absent fields do not constrain; `sortBy` defaults to
/// `timestampDesc` and unknown values fall back to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub block_hash: Option<String>,
    pub previous_hash: Option<String>,
    pub min_block_size: Option<u64>,
    pub max_block_size: Option<u64>,
    pub timestamp_after: Option<Timestamp>,
    pub timestamp_before: Option<Timestamp>,
    pub created_after: Option<Timestamp>,
    pub created_before: Option<Timestamp>,
    pub sort_by: SortKey,
}

impl From<SearchRequest> for BlockFilter {
    fn from(req: SearchRequest) -> Self {
        BlockFilter {
            block_hash: req.block_hash,
            previous_hash: req.previous_hash,
            min_block_size: req.min_block_size,
            max_block_size: req.max_block_size,
            timestamp_after: req.timestamp_after,
            timestamp_before: req.timestamp_before,
            created_after: req.created_after,
            created_before: req.created_before,
            sort_by: req.sort_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    pub checked: u64,
    pub violations: Vec<String>,
}

impl From<ChainReport> for VerifyResponse {
    fn from(report: ChainReport) -> Self {
        Self {
            valid: report.is_valid(),
            checked: report.checked,
            violations: report.violations.iter().map(ToString::to_string).collect(),
        }
    }
}
