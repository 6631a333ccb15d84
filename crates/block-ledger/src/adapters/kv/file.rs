use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// File-backed key-value store.
///
/// The whole map is held in memory and rewritten on every batch via a
/// temp file + rename, so a crash leaves either the old or the new image.
///
/// On-disk format: `[key_len:u32 le][key][value_len:u32 le][value]...`
pub struct FileBackedKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open (or create on first write) the store at `path`.
    ///
    /// A missing file is an empty store; a truncated or malformed file is
    /// a `CorruptionError`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = match std::fs::File::open(&path) {
            Ok(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes).map_err(io_error)?;
                let data = decode(&bytes)?;
                tracing::info!(
                    path = %path.display(),
                    bytes = bytes.len(),
                    keys = data.len(),
                    "Loaded ledger storage file"
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No existing storage file, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(io_error(e)),
        };

        Ok(Self { data, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_to_file(&self) -> Result<(), KVStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut bytes = Vec::new();
        for (key, value) in &self.data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;

        Ok(())
    }
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

fn decode(bytes: &[u8]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, KVStoreError> {
    fn take<'a>(bytes: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8], KVStoreError> {
        let end = cursor
            .checked_add(len)
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| KVStoreError::CorruptionError {
                message: format!("truncated record at offset {}", cursor),
            })?;
        let slice = &bytes[*cursor..end];
        *cursor = end;
        Ok(slice)
    }

    fn take_len(bytes: &[u8], cursor: &mut usize) -> Result<usize, KVStoreError> {
        let raw = take(bytes, cursor, 4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(raw);
        Ok(u32::from_le_bytes(buf) as usize)
    }

    let mut data = BTreeMap::new();
    let mut cursor = 0;
    while cursor < bytes.len() {
        let key_len = take_len(bytes, &mut cursor)?;
        let key = take(bytes, &mut cursor, key_len)?.to_vec();
        let value_len = take_len(bytes, &mut cursor)?;
        let value = take(bytes, &mut cursor, value_len)?.to_vec();
        data.insert(key, value);
    }
    Ok(data)
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let snapshot = self.data.clone();
        for op in operations {
            let BatchOperation::Put { key, value } = op;
            self.data.insert(key, value);
        }
        if let Err(e) = self.save_to_file() {
            self.data = snapshot;
            return Err(e);
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        let results: Vec<_> = self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackedKVStore::open(dir.path().join("ledger.db")).unwrap();
        assert!(store.prefix_scan(b"").unwrap().is_empty());
    }

    #[test]
    fn test_batch_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.db");

        let mut store = FileBackedKVStore::open(&path).unwrap();
        store
            .atomic_batch_write(vec![
                BatchOperation::put(b"k1".to_vec(), b"v1".to_vec()),
                BatchOperation::put(b"k2".to_vec(), Vec::new()),
            ])
            .unwrap();
        drop(store);

        let reopened = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(reopened.get(b"k1").unwrap(), Some(b"v1".to_vec()));
        assert_eq!(reopened.get(b"k2").unwrap(), Some(Vec::new()));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_truncated_file_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        std::fs::write(&path, [5u8, 0, 0, 0, b'a']).unwrap();

        let result = FileBackedKVStore::open(&path);
        assert!(matches!(result, Err(KVStoreError::CorruptionError { .. })));
    }
}
