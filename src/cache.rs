//! Keyword report cache with a time-to-live
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

const MS_PER_HOUR: i64 = 3_600_000;

/// A cached payload and the time it was stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub keyword: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub payload: Value,
}

impl CacheEntry {
    fn new(keyword: &str, payload: Value) -> Self {
        Self {
            keyword: keyword.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            payload,
        }
    }

    fn age_ms(&self, now_ms: i64) -> i64 {
        (now_ms - self.timestamp).max(0)
    }

    fn is_valid(&self, ttl_ms: i64, now_ms: i64) -> bool {
        self.age_ms(now_ms) <= ttl_ms
    }
}

/// Get/set contract shared by the cache backends.
///
/// Storage failures never reach the caller: a failed read is a miss and a
/// failed write is skipped.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;
    async fn set(&self, key: &str, payload: Value);
}

/// Listing row for cache maintenance
#[derive(Debug, Clone, Serialize)]
pub struct CacheListing {
    pub keyword: String,
    pub age_hours: f64,
    pub valid: bool,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// Cache backed by a single JSON file holding a keyword -> entry map
pub struct FileCache {
    path: PathBuf,
    ttl_hours: u64,
    write_lock: Mutex<()>,
}

impl FileCache {
    pub fn new(path: PathBuf, ttl_hours: u64) -> Self {
        Self {
            path,
            ttl_hours,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ttl_ms(&self) -> i64 {
        self.ttl_hours as i64 * MS_PER_HOUR
    }

    async fn read_map(&self) -> Result<HashMap<String, CacheEntry>> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(HashMap::new());
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_map(&self, map: &HashMap<String, CacheEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json_content = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, json_content).await?;
        Ok(())
    }

    async fn store(&self, entry: CacheEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = match self.read_map().await {
            Ok(map) => map,
            Err(e) => {
                warn!("⚠️ Replacing unreadable cache file {}: {}", self.path.display(), e);
                HashMap::new()
            }
        };
        map.insert(entry.keyword.clone(), entry);
        self.write_map(&map).await
    }

    /// List every entry with its age and validity
    pub async fn list(&self) -> Result<Vec<CacheListing>> {
        let now = Utc::now().timestamp_millis();
        let ttl = self.ttl_ms();
        let mut rows: Vec<CacheListing> = self
            .read_map()
            .await?
            .into_values()
            .map(|entry| CacheListing {
                age_hours: entry.age_ms(now) as f64 / MS_PER_HOUR as f64,
                valid: entry.is_valid(ttl, now),
                keyword: entry.keyword,
            })
            .collect();
        rows.sort_by(|a, b| a.keyword.cmp(&b.keyword));
        Ok(rows)
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        let now = Utc::now().timestamp_millis();
        let ttl = self.ttl_ms();
        let map = self.read_map().await?;

        let mut stats = CacheStats {
            total_entries: map.len(),
            ..Default::default()
        };
        for entry in map.values() {
            if entry.is_valid(ttl, now) {
                stats.valid_entries += 1;
            } else {
                stats.expired_entries += 1;
            }
        }
        Ok(stats)
    }

    /// Remove one keyword, returning whether it existed
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        let removed = map.remove(key).is_some();
        if removed {
            self.write_map(&map).await?;
            info!("🗑️ Invalidated cache entry: {}", key);
        }
        Ok(removed)
    }

    /// Remove all entries, returning how many there were
    pub async fn clear(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let count = self.read_map().await?.len();
        self.write_map(&HashMap::new()).await?;
        info!("🧹 Cleared {} cache entries", count);
        Ok(count)
    }

    pub async fn cleanup_expired(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let now = Utc::now().timestamp_millis();
        let ttl = self.ttl_ms();
        let mut map = self.read_map().await?;
        let before = map.len();
        map.retain(|_, entry| entry.is_valid(ttl, now));
        let cleaned = before - map.len();

        if cleaned > 0 {
            self.write_map(&map).await?;
            info!("🧹 Cleaned up {} expired cache entries", cleaned);
        }
        Ok(cleaned)
    }

    #[cfg(test)]
    pub(crate) async fn insert_entry(&self, entry: CacheEntry) -> Result<()> {
        self.store(entry).await
    }
}

#[async_trait]
impl CacheStore for FileCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let map = match self.read_map().await {
            Ok(map) => map,
            Err(e) => {
                warn!("Failed to read cache file {}: {}", self.path.display(), e);
                return None;
            }
        };

        let Some(entry) = map.get(key) else {
            debug!("Cache miss: {}", key);
            return None;
        };

        if entry.is_valid(self.ttl_ms(), Utc::now().timestamp_millis()) {
            info!("📚 Cache hit: {}", key);
            Some(entry.payload.clone())
        } else {
            debug!("⏰ Cache expired for key: {}", key);
            None
        }
    }

    async fn set(&self, key: &str, payload: Value) {
        match self.store(CacheEntry::new(key, payload)).await {
            Ok(()) => debug!("💾 Saved cache entry: {}", key),
            Err(e) => warn!("Failed to write cache file {}: {}", self.path.display(), e),
        }
    }
}

/// In-process cache, used when persistence is disabled and in tests
pub struct MemoryCache {
    ttl_hours: u64,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new(ttl_hours: u64) -> Self {
        Self {
            ttl_hours,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        let ttl = self.ttl_hours as i64 * MS_PER_HOUR;
        entry
            .is_valid(ttl, Utc::now().timestamp_millis())
            .then(|| entry.payload.clone())
    }

    async fn set(&self, key: &str, payload: Value) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), CacheEntry::new(key, payload));
    }
}
