//! # Search Filter
//!
//! Optional, conjunctive predicates over blocks plus a sort key. Stores that
//! cannot push the filter down evaluate it with [`BlockFilter::select`].

use serde::{Deserialize, Serialize};

use super::block::{Block, Timestamp};

/// Result ordering for searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum SortKey {
    #[default]
    TimestampDesc,
    TimestampAsc,
    SizeDesc,
    SizeAsc,
}

impl SortKey {
    /// Parse a wire name. Unknown names fall back to `TimestampDesc`.
    pub fn parse(name: &str) -> Self {
        match name {
            "timestampAsc" => SortKey::TimestampAsc,
            "blockSizeDesc" => SortKey::SizeDesc,
            "blockSizeAsc" => SortKey::SizeAsc,
            _ => SortKey::TimestampDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::TimestampDesc => "timestampDesc",
            SortKey::TimestampAsc => "timestampAsc",
            SortKey::SizeDesc => "blockSizeDesc",
            SortKey::SizeAsc => "blockSizeAsc",
        }
    }

    /// Sort in place. Ties fall back to insertion order in the same direction.
    pub fn sort(&self, blocks: &mut [Block]) {
        match self {
            SortKey::TimestampDesc => blocks.sort_by(|a, b| b.recency_key().cmp(&a.recency_key())),
            SortKey::TimestampAsc => blocks.sort_by_key(|b| b.recency_key()),
            SortKey::SizeDesc => blocks.sort_by(|a, b| (b.block_size, b.id).cmp(&(a.block_size, a.id))),
            SortKey::SizeAsc => blocks.sort_by_key(|b| (b.block_size, b.id)),
        }
    }
}

impl From<String> for SortKey {
    fn from(name: String) -> Self {
        SortKey::parse(&name)
    }
}

impl From<SortKey> for &'static str {
    fn from(key: SortKey) -> Self {
        key.as_str()
    }
}

/// Search criteria. Every field is optional; present fields are ANDed.
///
/// Range bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockFilter {
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

impl BlockFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_hash(mut self, hash: impl Into<String>) -> Self {
        self.block_hash = Some(hash.into());
        self
    }

    pub fn with_previous_hash(mut self, hash: impl Into<String>) -> Self {
        self.previous_hash = Some(hash.into());
        self
    }

    pub fn with_size_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_block_size = min;
        self.max_block_size = max;
        self
    }

    pub fn with_timestamp_range(
        mut self,
        after: Option<Timestamp>,
        before: Option<Timestamp>,
    ) -> Self {
        self.timestamp_after = after;
        self.timestamp_before = before;
        self
    }

    pub fn with_created_range(mut self, after: Option<Timestamp>, before: Option<Timestamp>) -> Self {
        self.created_after = after;
        self.created_before = before;
        self
    }

    pub fn sorted_by(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Whether `block` satisfies every present predicate.
    pub fn matches(&self, block: &Block) -> bool {
        fn within<T: PartialOrd>(value: &T, min: Option<&T>, max: Option<&T>) -> bool {
            min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
        }

        self.block_hash
            .as_deref()
            .map_or(true, |h| block.block_hash == h)
            && self
                .previous_hash
                .as_deref()
                .map_or(true, |h| block.previous_hash == h)
            && within(
                &block.block_size,
                self.min_block_size.as_ref(),
                self.max_block_size.as_ref(),
            )
            && within(
                &block.timestamp,
                self.timestamp_after.as_ref(),
                self.timestamp_before.as_ref(),
            )
            && within(
                &block.created_at,
                self.created_after.as_ref(),
                self.created_before.as_ref(),
            )
    }

    /// Filter and order a candidate set.
    pub fn select(&self, blocks: impl IntoIterator<Item = Block>) -> Vec<Block> {
        let mut selected: Vec<Block> = blocks.into_iter().filter(|b| self.matches(b)).collect();
        self.sort_by.sort(&mut selected);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{make_block, t0};
    use chrono::Duration;

    fn sample() -> Vec<Block> {
        vec![
            make_block(1, 4, t0()),
            make_block(2, 2, t0() + Duration::seconds(1)),
            make_block(3, 6, t0() + Duration::seconds(2)),
        ]
    }

    fn ids(blocks: &[Block]) -> Vec<u64> {
        blocks.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_sort_key_parse_falls_back() {
        assert_eq!(SortKey::parse("timestampAsc"), SortKey::TimestampAsc);
        assert_eq!(SortKey::parse("blockSizeAsc"), SortKey::SizeAsc);
        assert_eq!(SortKey::parse("bogus"), SortKey::TimestampDesc);
        assert_eq!(SortKey::parse(""), SortKey::TimestampDesc);
    }

    #[test]
    fn test_sort_key_serde_roundtrip_names() {
        let key: SortKey = serde_json::from_str("\"blockSizeDesc\"").unwrap();
        assert_eq!(key, SortKey::SizeDesc);
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"blockSizeDesc\"");

        let unknown: SortKey = serde_json::from_str("\"newest\"").unwrap();
        assert_eq!(unknown, SortKey::TimestampDesc);
    }

    #[test]
    fn test_empty_filter_returns_all_newest_first() {
        let result = BlockFilter::new().select(sample());
        assert_eq!(ids(&result), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_orders() {
        let asc = BlockFilter::new()
            .sorted_by(SortKey::TimestampAsc)
            .select(sample());
        assert_eq!(ids(&asc), vec![1, 2, 3]);

        let size_desc = BlockFilter::new().sorted_by(SortKey::SizeDesc).select(sample());
        assert_eq!(ids(&size_desc), vec![3, 1, 2]);

        let size_asc = BlockFilter::new().sorted_by(SortKey::SizeAsc).select(sample());
        assert_eq!(ids(&size_asc), vec![2, 1, 3]);
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_id() {
        let blocks = vec![make_block(1, 3, t0()), make_block(2, 3, t0())];
        let result = BlockFilter::new().select(blocks);
        assert_eq!(ids(&result), vec![2, 1]);
    }

    #[test]
    fn test_size_range_is_inclusive() {
        let result = BlockFilter::new()
            .with_size_range(Some(2), Some(4))
            .select(sample());
        assert_eq!(ids(&result), vec![2, 1]);
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let blocks = sample();
        let target = blocks[1].block_hash.clone();

        let hit = BlockFilter::new()
            .with_block_hash(target.clone())
            .with_size_range(Some(2), None)
            .select(blocks.clone());
        assert_eq!(ids(&hit), vec![2]);

        let miss = BlockFilter::new()
            .with_block_hash(target)
            .with_size_range(Some(5), None)
            .select(blocks);
        assert!(miss.is_empty());
    }

    #[test]
    fn test_timestamp_and_created_ranges() {
        let result = BlockFilter::new()
            .with_timestamp_range(Some(t0() + Duration::seconds(1)), None)
            .select(sample());
        assert_eq!(ids(&result), vec![3, 2]);

        let result = BlockFilter::new()
            .with_created_range(None, Some(t0()))
            .select(sample());
        assert_eq!(ids(&result), vec![1]);
    }
}
