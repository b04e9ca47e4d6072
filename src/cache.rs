// Decoded tables keyed by the SHA-256 of their source text.
use crate::loader::{decode_table, LoadReport};
use crate::types::DecodedTable;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub fn content_key(blob: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(blob.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct CachedTable {
    pub table: Arc<DecodedTable>,
    pub report: LoadReport,
}

#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<String, CachedTable>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `blob`, or hand back the earlier decode of identical text.
    pub fn decode(&mut self, blob: &str) -> CachedTable {
        let key = content_key(blob);
        if let Some(hit) = self.entries.get(&key) {
            debug!(key = &key[..12], "table cache hit");
            return hit.clone();
        }
        let (table, report) = decode_table(blob);
        let entry = CachedTable {
            table: Arc::new(table),
            report,
        };
        debug!(key = &key[..12], rows = entry.table.len(), "table cache miss");
        self.entries.insert(key, entry.clone());
        entry
    }

    /// Distinct source texts decoded so far.
    pub fn cached_tables(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_blobs_share_one_decode() {
        let mut cache = TableCache::new();
        let a = cache.decode("RegionName,2024-01-31\nBoise,1\n");
        let b = cache.decode("RegionName,2024-01-31\nBoise,1\n");
        assert!(Arc::ptr_eq(&a.table, &b.table));
        assert_eq!(cache.cached_tables(), 1);
    }

    #[test]
    fn different_blobs_are_decoded_separately() {
        let mut cache = TableCache::new();
        cache.decode("RegionName\nBoise\n");
        cache.decode("RegionName\nReno\n");
        assert_eq!(cache.cached_tables(), 2);
    }

    #[test]
    fn key_is_hex_sha256() {
        let key = content_key("");
        assert_eq!(key.len(), 64);
        assert_eq!(
            key,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
