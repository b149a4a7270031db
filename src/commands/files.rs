use serde::Serialize;
use std::fs;
use std::io;
use tracing::{info, warn};

use crate::cache::ThumbnailCache;
use crate::config::Config;
use crate::models::{media_kind, MediaKind};
use crate::sandbox::PathSandbox;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    NotAFile,
    NotMedia,
    PermissionDenied,
}

/// Delete a media file inside the root. Its cache entries are purged from
/// every size bucket first; the file delete is attempted regardless of
/// whether the purge succeeded.
pub fn delete_file(config: &Config, logical_path: &str) -> DeleteOutcome {
    let sandbox = PathSandbox::new(&config.root_folder);
    let path = sandbox.resolve(logical_path).into_path();

    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            return DeleteOutcome::PermissionDenied
        }
        Err(_) => return DeleteOutcome::NotFound,
    };

    if !metadata.is_file() {
        return DeleteOutcome::NotAFile;
    }
    if media_kind(&path).is_none() {
        return DeleteOutcome::NotMedia;
    }

    let cache = ThumbnailCache::new(config.cache_dir());
    cache.purge(logical_path, metadata.len());

    match fs::remove_file(&path) {
        Ok(()) => {
            info!(file = %logical_path, "deleted media file");
            DeleteOutcome::Deleted
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => DeleteOutcome::NotFound,
        Err(err) => {
            warn!(file = %logical_path, %err, "delete failed");
            DeleteOutcome::PermissionDenied
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Fetched { kind: MediaKind, bytes: Vec<u8> },
    NotFound,
    NotAFile,
    NotMedia,
    PermissionDenied,
}

/// Read a full-size media file for single-file serving.
pub fn fetch_file(config: &Config, logical_path: &str) -> FetchOutcome {
    let sandbox = PathSandbox::new(&config.root_folder);
    let path = sandbox.resolve(logical_path).into_path();

    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            return FetchOutcome::PermissionDenied
        }
        Err(_) => return FetchOutcome::NotFound,
    };

    if !metadata.is_file() {
        return FetchOutcome::NotAFile;
    }
    let kind = match media_kind(&path) {
        Some(kind) => kind,
        None => return FetchOutcome::NotMedia,
    };

    match fs::read(&path) {
        Ok(bytes) => FetchOutcome::Fetched { kind, bytes },
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            FetchOutcome::PermissionDenied
        }
        Err(_) => FetchOutcome::NotFound,
    }
}
