use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::MediaError;

/// Cache fingerprint for one thumbnail: a truncated BLAKE3 digest of the
/// logical path, with the source file size and the requested pixel size
/// appended verbatim. The size fields double as a cheap validity check;
/// if the source file changes size, the old entry simply stops matching.
pub fn cache_key(relative_path: &str, file_size: u64, requested_size: u32) -> String {
    let digest = blake3::hash(relative_path.as_bytes()).to_hex();
    format!("{}_{}_{}", &digest.as_str()[..16], file_size, requested_size)
}

/// Disk-backed thumbnail store under a dot-directory inside the root,
/// with one subdirectory ("bucket") per requested pixel size. There is no
/// in-memory index; existence is re-checked on every lookup.
///
/// Caching is a pure optimization: lookups degrade to misses and stores
/// are fire-and-forget, so a broken cache never blocks serving.
pub struct ThumbnailCache {
    dir: PathBuf,
}

impl ThumbnailCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn bucket(&self, size: u32) -> PathBuf {
        self.dir.join(size.to_string())
    }

    fn entry_path(&self, relative_path: &str, file_size: u64, size: u32) -> PathBuf {
        self.bucket(size)
            .join(cache_key(relative_path, file_size, size))
    }

    /// Fetch a cached thumbnail. Any read failure counts as a miss and the
    /// caller regenerates.
    pub fn lookup(&self, relative_path: &str, file_size: u64, size: u32) -> Option<Vec<u8>> {
        fs::read(self.entry_path(relative_path, file_size, size)).ok()
    }

    /// Write a freshly generated thumbnail. Failures are logged and
    /// swallowed.
    pub fn store(&self, relative_path: &str, file_size: u64, size: u32, bytes: &[u8]) {
        let bucket = self.bucket(size);
        if let Err(err) = fs::create_dir_all(&bucket) {
            warn!(bucket = %bucket.display(), %err, "cannot create cache bucket");
            return;
        }

        let path = bucket.join(cache_key(relative_path, file_size, size));
        if let Err(err) = fs::write(&path, bytes) {
            warn!(path = %path.display(), %err, "cache write failed");
        }
    }

    /// Remove every size bucket except `active_size`, wholesale. Only one
    /// requested size is ever live per session, so stale buckets would
    /// otherwise accumulate indefinitely.
    pub fn evict_other_sizes(&self, active_size: u32) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return, // no cache tree yet
        };

        let active = active_size.to_string();
        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy() == active {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                debug!(bucket = %path.display(), "evicting stale size bucket");
                if let Err(err) = fs::remove_dir_all(&path) {
                    warn!(bucket = %path.display(), %err, "bucket eviction failed");
                }
            }
        }
    }

    /// Drop the entries for one source file from every existing bucket.
    /// Used just before the file itself is deleted, when the size the
    /// client last requested is unknown.
    pub fn purge(&self, relative_path: &str, file_size: u64) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let size: u32 = match name.to_string_lossy().parse() {
                Ok(size) => size,
                Err(_) => continue,
            };

            let path = entry.path().join(cache_key(relative_path, file_size, size));
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "purged cache entry"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => warn!(path = %path.display(), %err, "cache purge failed"),
            }
        }
    }

    /// Reset the whole cache tree.
    pub fn clear(&self) -> Result<(), MediaError> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).map_err(|source| MediaError::CacheIo {
                path: self.dir.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&self.dir).map_err(|source| MediaError::CacheIo {
            path: self.dir.clone(),
            source,
        })
    }

    /// Total bytes and file count across all buckets.
    pub fn stats(&self) -> CacheStats {
        let mut total_size = 0u64;
        let mut file_count = 0usize;

        for entry in WalkDir::new(&self.dir).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                if let Ok(metadata) = entry.metadata() {
                    total_size += metadata.len();
                    file_count += 1;
                }
            }
        }

        CacheStats {
            total_size,
            file_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_size: u64,
    pub file_count: usize,
}
