use crate::{engine::JdbcValuesMetadata, JdbcValuesMapping, ResultSetMappingKey};
use resultmap_core::{Result, Schema};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
};

/// Caches resolved mappings by SQL string and mapping snapshot.
///
/// Lookups take a read lock; only inserts and evictions write. When a
/// capacity is set, the least recently used entry is evicted first.
#[derive(Debug, Default)]
pub struct ResultSetMappingCache {
    capacity: Option<usize>,
    entries: RwLock<HashMap<CacheKey, Entry>>,

    /// Logical clock for recency
    generation: AtomicU64,

    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    sql: String,
    mapping: ResultSetMappingKey,
}

#[derive(Debug)]
struct Entry {
    mapping: Arc<JdbcValuesMapping>,
    last_access: AtomicU64,
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
    pub capacity: Option<usize>,
}

impl CacheStats {
    /// Share of lookups served from the cache, `0.0` before any lookup.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl ResultSetMappingCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns the cached mapping for `sql` and `key`, resolving it on a
    /// miss. Resolution errors are returned and nothing is cached.
    pub fn resolve(
        &self,
        sql: &str,
        key: &ResultSetMappingKey,
        schema: &Schema,
        metadata: &dyn JdbcValuesMetadata,
    ) -> Result<Arc<JdbcValuesMapping>> {
        let cache_key = CacheKey {
            sql: sql.to_string(),
            mapping: key.clone(),
        };

        if let Some(found) = self.touch(&cache_key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(sql, "result-set mapping cache hit");
            return Ok(found);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(sql, "result-set mapping cache miss");

        if self.capacity == Some(0) {
            return Ok(Arc::new(key.resolve(schema, metadata)?));
        }

        // Resolve outside the lock
        let mapping = Arc::new(key.resolve(schema, metadata)?);

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another thread may have inserted while we resolved
        if let Some(entry) = entries.get(&cache_key) {
            entry.last_access.store(self.tick(), Ordering::Relaxed);
            return Ok(Arc::clone(&entry.mapping));
        }

        entries.insert(
            cache_key,
            Entry {
                mapping: Arc::clone(&mapping),
                last_access: AtomicU64::new(self.tick()),
            },
        );

        if let Some(capacity) = self.capacity {
            let evicted = evict_lru(&mut entries, capacity);
            if evicted > 0 {
                self.evictions.fetch_add(evicted, Ordering::Relaxed);
                tracing::debug!(evicted, "evicted result-set mappings");
            }
        }

        Ok(mapping)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size: self.len(),
            capacity: self.capacity,
        }
    }

    fn touch(&self, key: &CacheKey) -> Option<Arc<JdbcValuesMapping>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let entry = entries.get(key)?;
        entry.last_access.store(self.tick(), Ordering::Relaxed);
        Some(Arc::clone(&entry.mapping))
    }

    fn tick(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }
}

fn evict_lru(entries: &mut HashMap<CacheKey, Entry>, capacity: usize) -> u64 {
    let mut evicted = 0;

    while entries.len() > capacity {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access.load(Ordering::Relaxed))
            .map(|(key, _)| key.clone());

        match oldest {
            Some(key) => {
                entries.remove(&key);
                evicted += 1;
            }
            None => break,
        }
    }

    evicted
}
