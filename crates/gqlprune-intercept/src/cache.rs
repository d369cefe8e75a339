//! Bounded cache of rewrite results
//!
//! Keyed by a SHA-256 fingerprint of the SQL text plus the serialized
//! selection tree, so the same query asked with different field sets caches
//! independently. The cache stops accepting entries once full; rewrites are
//! cheap enough that eviction is not worth the bookkeeping.

use std::collections::HashMap;
use std::sync::Mutex;

use gqlprune_engine::SelectionTree;
use sha2::{Digest, Sha256};

pub struct RewriteCache {
    entries: Mutex<HashMap<String, String>>,
    max_entries: usize,
}

impl RewriteCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries,
        }
    }

    /// Cache key for one (query, field set) pair.
    pub fn key(sql: &str, context: &SelectionTree) -> String {
        let fields =
            serde_json::to_string(context).expect("selection tree should always serialize");
        let mut hasher = Sha256::new();
        hasher.update(sql.as_bytes());
        hasher.update([0u8]);
        hasher.update(fields.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn insert(&self, key: String, sql: String) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() < self.max_entries {
                entries.insert(key, sql);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
