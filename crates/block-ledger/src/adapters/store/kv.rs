//! # KV-backed Block Store
//!
//! Persists blocks in any [`KeyValueStore`]. Every insert is one atomic
//! batch; aggregates are served from an index rebuilt on [`KvBlockStore::open`].
//!
//! ## Key Layout
//!
//! | Prefix | Key suffix | Value |
//! |--------|------------|-------|
//! | `b:` | id (u64 BE) | `[crc32 LE][serialized block]` |
//! | `h:` | block hash (utf-8) | id (u64 BE) |
//! | `n:` | predecessor id (u64 BE) | successor id (u64 BE) |
//! | `m:` | `seq` | last assigned id (u64 BE) |

use crate::domain::block::{Block, BlockId, NewBlock, Timestamp};
use crate::domain::errors::StoreError;
use crate::domain::filter::BlockFilter;
use crate::ports::outbound::{BatchOperation, BlockSerializer, BlockStore, KeyValueStore};

/// Key namespaces used by [`KvBlockStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    Block,
    BlockByHash,
    Successor,
    Metadata,
}

impl KeyPrefix {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Block => b"b:",
            KeyPrefix::BlockByHash => b"h:",
            KeyPrefix::Successor => b"n:",
            KeyPrefix::Metadata => b"m:",
        }
    }

    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    pub fn block_key(id: BlockId) -> Vec<u8> {
        KeyPrefix::Block.key(&id.to_be_bytes())
    }

    pub fn hash_key(hash: &str) -> Vec<u8> {
        KeyPrefix::BlockByHash.key(hash.as_bytes())
    }

    pub fn successor_key(previous_block_id: BlockId) -> Vec<u8> {
        KeyPrefix::Successor.key(&previous_block_id.to_be_bytes())
    }

    pub fn sequence_key() -> Vec<u8> {
        KeyPrefix::Metadata.key(b"seq")
    }
}

/// In-memory aggregates over the persisted blocks.
#[derive(Debug, Default, Clone)]
struct ChainIndex {
    last_id: BlockId,
    count: u64,
    size_sum: u128,
    latest: Option<(Timestamp, BlockId)>,
    genesis: Option<BlockId>,
}

impl ChainIndex {
    fn on_block_stored(&mut self, block: &Block) {
        self.last_id = self.last_id.max(block.id);
        self.count += 1;
        self.size_sum += u128::from(block.block_size);
        let key = block.recency_key();
        if self.latest.map_or(true, |current| key > current) {
            self.latest = Some(key);
        }
        if block.is_genesis() && self.genesis.is_none() {
            self.genesis = Some(block.id);
        }
    }
}

/// Block store over a key-value backend.
///
/// Records carry a CRC32 of the serialized block; a mismatch on read is
/// reported as [`StoreError::Corrupted`].
pub struct KvBlockStore<KV: KeyValueStore, BS: BlockSerializer> {
    kv: KV,
    serializer: BS,
    index: ChainIndex,
}

impl<KV: KeyValueStore, BS: BlockSerializer> KvBlockStore<KV, BS> {
    /// Open the store and rebuild the index from every persisted record.
    ///
    /// Fails if any record is corrupted.
    pub fn open(kv: KV, serializer: BS) -> Result<Self, StoreError> {
        let mut store = Self {
            kv,
            serializer,
            index: ChainIndex::default(),
        };

        let mut index = ChainIndex::default();
        for block in store.scan_blocks()? {
            index.on_block_stored(&block);
        }
        if let Some(seq) = store.kv.get(&KeyPrefix::sequence_key())? {
            index.last_id = index.last_id.max(decode_id(&seq)?);
        }
        store.index = index;

        tracing::info!(
            blocks = store.index.count,
            last_id = store.index.last_id,
            "Rebuilt ledger index"
        );
        Ok(store)
    }

    /// Borrow the underlying key-value backend.
    pub fn kv(&self) -> &KV {
        &self.kv
    }

    fn encode_record(&self, block: &Block) -> Result<Vec<u8>, StoreError> {
        let payload = self.serializer.serialize(block)?;
        let mut record = Vec::with_capacity(payload.len() + 4);
        record.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        record.extend_from_slice(&payload);
        Ok(record)
    }

    fn decode_record(&self, id: BlockId, record: &[u8]) -> Result<Block, StoreError> {
        if record.len() < 4 {
            return Err(StoreError::Backend {
                message: format!("truncated record for block {}", id),
            });
        }
        let (checksum, payload) = record.split_at(4);
        let mut buf = [0u8; 4];
        buf.copy_from_slice(checksum);
        let expected = u32::from_le_bytes(buf);
        let actual = crc32fast::hash(payload);
        if expected != actual {
            tracing::error!(id, expected, actual, "Block record failed checksum");
            return Err(StoreError::Corrupted {
                id,
                expected,
                actual,
            });
        }
        Ok(self.serializer.deserialize(payload)?)
    }

    fn successor_id(&self, id: BlockId) -> Result<Option<BlockId>, StoreError> {
        self.kv
            .get(&KeyPrefix::successor_key(id))?
            .map(|raw| decode_id(&raw))
            .transpose()
    }

    fn hydrate(&self, mut block: Block) -> Result<Block, StoreError> {
        block.next_block_id = self.successor_id(block.id)?;
        Ok(block)
    }

    fn load(&self, id: BlockId) -> Result<Option<Block>, StoreError> {
        match self.kv.get(&KeyPrefix::block_key(id))? {
            Some(record) => {
                let block = self.decode_record(id, &record)?;
                self.hydrate(block).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Every stored block in id order, unhydrated.
    fn scan_blocks(&self) -> Result<Vec<Block>, StoreError> {
        let prefix = KeyPrefix::Block.as_bytes();
        self.kv
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(key, record)| {
                let id = decode_id(&key[prefix.len()..])?;
                self.decode_record(id, &record)
            })
            .collect()
    }
}

fn decode_id(raw: &[u8]) -> Result<BlockId, StoreError> {
    let bytes: [u8; 8] = raw.try_into().map_err(|_| StoreError::Backend {
        message: format!("malformed id encoding ({} bytes)", raw.len()),
    })?;
    Ok(BlockId::from_be_bytes(bytes))
}

impl<KV: KeyValueStore, BS: BlockSerializer> BlockStore for KvBlockStore<KV, BS> {
    fn insert(&mut self, block: NewBlock) -> Result<Block, StoreError> {
        if self.kv.exists(&KeyPrefix::hash_key(&block.block_hash))? {
            return Err(StoreError::DuplicateHash {
                hash: block.block_hash,
            });
        }
        if let Some(previous_block_id) = block.previous_block_id {
            if self.kv.exists(&KeyPrefix::successor_key(previous_block_id))? {
                return Err(StoreError::DuplicatePredecessor { previous_block_id });
            }
        }

        let id = self.index.last_id + 1;
        let stored = Block::from_new(id, block);
        let record = self.encode_record(&stored)?;

        let mut operations = vec![
            BatchOperation::put(KeyPrefix::block_key(id), record),
            BatchOperation::put(KeyPrefix::hash_key(&stored.block_hash), id.to_be_bytes()),
            BatchOperation::put(KeyPrefix::sequence_key(), id.to_be_bytes()),
        ];
        if let Some(previous_block_id) = stored.previous_block_id {
            operations.push(BatchOperation::put(
                KeyPrefix::successor_key(previous_block_id),
                id.to_be_bytes(),
            ));
        }
        self.kv.atomic_batch_write(operations)?;

        self.index.on_block_stored(&stored);
        tracing::debug!(id, hash = %stored.block_hash, "Persisted block");
        Ok(stored)
    }

    fn find_by_id(&self, id: BlockId) -> Result<Option<Block>, StoreError> {
        self.load(id)
    }

    fn find_by_hash(&self, hash: &str) -> Result<Option<Block>, StoreError> {
        match self.kv.get(&KeyPrefix::hash_key(hash))? {
            Some(raw) => self.load(decode_id(&raw)?),
            None => Ok(None),
        }
    }

    fn exists_by_hash(&self, hash: &str) -> Result<bool, StoreError> {
        Ok(self.kv.exists(&KeyPrefix::hash_key(hash))?)
    }

    fn find_latest(&self) -> Result<Option<Block>, StoreError> {
        match self.index.latest {
            Some((_, id)) => self.load(id),
            None => Ok(None),
        }
    }

    fn find_genesis(&self) -> Result<Option<Block>, StoreError> {
        match self.index.genesis {
            Some(id) => self.load(id),
            None => Ok(None),
        }
    }

    fn find_successor(&self, id: BlockId) -> Result<Option<Block>, StoreError> {
        match self.successor_id(id)? {
            Some(next) => self.load(next),
            None => Ok(None),
        }
    }

    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.index.count)
    }

    fn average_size(&self) -> Result<Option<f64>, StoreError> {
        if self.index.count == 0 {
            return Ok(None);
        }
        Ok(Some(self.index.size_sum as f64 / self.index.count as f64))
    }

    fn search(&self, filter: &BlockFilter) -> Result<Vec<Block>, StoreError> {
        let blocks = self
            .scan_blocks()?
            .into_iter()
            .map(|b| self.hydrate(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(filter.select(blocks))
    }
}
