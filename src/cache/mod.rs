//! Disk-backed response cache.
//!
//! Every entry is one JSON document stored as `<key>.dat` under the cache
//! root, where the key is a fingerprint of the request that produced it.
//! Writes go to a temporary file in the same directory which is then renamed
//! over the entry, so a reader only ever sees a complete payload.
//!
//! The cache never evicts by itself: it records an age (the modification
//! time of the entry) and leaves the staleness decision to the caller, see
//! [`crate::catalog::Catalog`]. Expired entries are removed by [`FileCache::sweep`].

use std::{
    collections::HashMap,
    ffi::OsStr,
    fmt, io,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use futures_util::StreamExt;
use serde_json::Value;

use crate::{config::DEFAULT_CACHE_TTL, debug, utils, warning};

const ENTRY_EXTENSION: &str = "dat";

#[derive(Debug)]
pub enum CacheError {
    IoError(io::Error),
    SerdeError(serde_json::Error),
}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        CacheError::IoError(err)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::SerdeError(err)
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::IoError(e) => write!(f, "io error: {}", e),
            CacheError::SerdeError(e) => write!(f, "serialization error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

pub struct FileCache {
    base_path: PathBuf,
    default_ttl: u64,
    ttl_overrides: HashMap<String, u64>,
}

impl FileCache {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            default_ttl: DEFAULT_CACHE_TTL,
            ttl_overrides: HashMap::new(),
        }
    }

    pub fn with_default_ttl(mut self, secs: u64) -> Self {
        self.default_ttl = secs;
        self
    }

    pub fn with_ttl(mut self, endpoint: &str, secs: u64) -> Self {
        self.ttl_overrides.insert(endpoint.to_string(), secs);
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Deterministic fingerprint of a logical request.
    ///
    /// Positional segments keep their order, named arguments are sorted by
    /// name first, so `make_key(&["a"], [("x", 1), ("y", 2)])` and
    /// `make_key(&["a"], [("y", 2), ("x", 1)])` are the same key.
    pub fn make_key<K, V>(segments: &[&str], named: impl IntoIterator<Item = (K, V)>) -> String
    where
        K: ToString,
        V: ToString,
    {
        let mut pairs: Vec<(String, String)> = named
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        pairs.sort();

        let canonical = format!(
            "{path}?{query}",
            path = segments.join("/"),
            query = pairs
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&")
        );
        utils::fingerprint(&canonical)
    }

    /// Time-to-live in seconds of responses from `endpoint`.
    pub fn ttl(&self, endpoint: &str) -> u64 {
        self.ttl_overrides
            .get(endpoint)
            .copied()
            .unwrap_or(self.default_ttl)
    }

    pub async fn load(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);
        let content = match async_fs::read(&path).await {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warning!("Cannot read cache entry {}: {}", path.display(), e);
                }
                return None;
            }
        };

        match serde_json::from_slice(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warning!("Dropping broken cache entry {}: {}", path.display(), e);
                let _ = async_fs::remove_file(&path).await;
                None
            }
        }
    }

    /// Persists `payload` under `key`, replacing any previous entry at once.
    ///
    /// Returns `false` when anything goes wrong; no entry is left behind for
    /// the key in that case.
    pub async fn store(&self, key: &str, payload: &Value) -> bool {
        let path = self.entry_path(key);
        match self.write_atomic(&path, payload).await {
            Ok(()) => true,
            Err(e) => {
                let _ = async_fs::remove_file(&path).await;
                warning!("Writing cache entry {} failed: {}", path.display(), e);
                false
            }
        }
    }

    pub async fn delete(&self, key: &str) -> bool {
        async_fs::remove_file(self.entry_path(key)).await.is_ok()
    }

    /// How long ago the entry for `key` was written.
    pub async fn age(&self, key: &str) -> Option<Duration> {
        let metadata = async_fs::metadata(self.entry_path(key)).await.ok()?;
        let modified = metadata.modified().ok()?;
        Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO),
        )
    }

    /// Removes up to `limit` entries older than `max_age`, returns how many
    /// were removed.
    pub async fn sweep(&self, max_age: Duration, limit: usize) -> usize {
        let mut removed = 0;
        for path in self.entry_paths().await {
            if removed >= limit {
                break;
            }
            let expired = match async_fs::metadata(&path).await.and_then(|m| m.modified()) {
                Ok(modified) => SystemTime::now()
                    .duration_since(modified)
                    .map(|age| age > max_age)
                    .unwrap_or(false),
                Err(_) => false,
            };
            if !expired {
                continue;
            }
            match async_fs::remove_file(&path).await {
                Ok(()) => {
                    debug!("Removed expired cache entry {}", path.display());
                    removed += 1;
                }
                Err(e) => warning!("Cannot remove {}: {}", path.display(), e),
            }
        }
        removed
    }

    /// Removes every entry, returns how many were removed.
    pub async fn clear(&self) -> usize {
        let mut removed = 0;
        for path in self.entry_paths().await {
            if async_fs::remove_file(&path).await.is_ok() {
                removed += 1;
            }
        }
        removed
    }

    pub async fn entries(&self) -> usize {
        self.entry_paths().await.len()
    }

    async fn write_atomic(&self, path: &Path, payload: &Value) -> Result<(), CacheError> {
        async_fs::create_dir_all(&self.base_path).await?;
        let json = serde_json::to_vec(payload)?;

        let guard = TempFile::new(path.with_extension(format!(
            "{}.{}.tmp",
            ENTRY_EXTENSION,
            utils::random_suffix(8)
        )));
        async_fs::write(guard.path(), &json).await?;
        async_fs::File::open(guard.path()).await?.sync_all().await?;
        async_fs::rename(guard.path(), path).await?;
        guard.commit();
        Ok(())
    }

    async fn entry_paths(&self) -> Vec<PathBuf> {
        let Ok(mut read_dir) = async_fs::read_dir(&self.base_path).await else {
            return Vec::new();
        };

        let mut paths = Vec::new();
        while let Some(entry) = read_dir.next().await {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            if path.extension() != Some(OsStr::new(ENTRY_EXTENSION)) {
                continue;
            }
            if entry.file_type().await.is_ok_and(|kind| kind.is_file()) {
                paths.push(path);
            }
        }
        paths
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.{}", key, ENTRY_EXTENSION))
    }
}

/// Temporary file removed on drop unless it was committed (renamed into
/// place).
struct TempFile {
    path: PathBuf,
    committed: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
