use serde::Serialize;

use crate::cache::{CacheStats, ThumbnailCache};
use crate::config::Config;
use crate::models::FolderListing;
use crate::sandbox::PathSandbox;
use crate::scanner;

/// List the contents of a logical folder. Escaping paths clamp to the
/// root, missing folders come back empty.
pub fn list_folder(config: &Config, logical_path: &str) -> FolderListing {
    let sandbox = PathSandbox::new(&config.root_folder);
    scanner::scan(sandbox.resolve(logical_path).path())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub folders: usize,
    pub images: usize,
    pub videos: usize,
    pub cache: CacheStats,
}

/// Content counts for one logical folder plus cache occupancy, as exposed
/// on the health endpoint.
pub fn library_stats(config: &Config, logical_path: &str) -> LibraryStats {
    let listing = list_folder(config, logical_path);
    let cache = ThumbnailCache::new(config.cache_dir());

    LibraryStats {
        folders: listing.subfolders.len(),
        images: listing.images.len(),
        videos: listing.videos.len(),
        cache: cache.stats(),
    }
}
