//! Process-wide cache of loaded wide tables.
//!
//! Entries are keyed by the three input paths and the wide fill policy. Once
//! stored an entry never changes; it is dropped only by [`LoadCache::clear`].
//! File contents are not re-checked, so edits on disk need an explicit clear.
//!
//! Callers read an entry through its `Arc` with no lock held. The map lock is
//! taken only to look up or insert a key and is released before returning.

use crate::config::{DataPaths, WideFillPolicy};
use crate::data::loader::DataLoader;
use crate::data::table::WideTableSet;
use crate::error::LoadError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    paths: DataPaths,
    fill: WideFillPolicy,
}

/// Shared, thread-safe memo of [`DataLoader::load_set`] results.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: RwLock<HashMap<CacheKey, Arc<WideTableSet>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached tables for `paths`, loading them on first use.
    /// Failed loads are not cached.
    pub fn get_or_load(
        &self,
        loader: &DataLoader,
        paths: &DataPaths,
    ) -> Result<Arc<WideTableSet>, LoadError> {
        let key = CacheKey {
            paths: paths.clone(),
            fill: loader.fill_policy(),
        };

        if let Some(set) = self.read_entries().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(dir = ?paths.data_dir(), "load cache hit");
            return Ok(Arc::clone(set));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(dir = ?paths.data_dir(), "load cache miss");
        let set = Arc::new(loader.load_set(paths)?);

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // A concurrent loader may have won the race; keep the first entry.
        let stored = entries.entry(key).or_insert(set);
        Ok(Arc::clone(stored))
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let dropped = entries.len();
        entries.clear();
        tracing::info!(entries = dropped, "load cache cleared");
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    fn read_entries(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Arc<WideTableSet>>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
