use base64::{engine::general_purpose::STANDARD, Engine as _};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::cache::ThumbnailCache;
use crate::config::Config;
use crate::models::{EntryKind, MediaKind, ThumbnailEntry};
use crate::preview;
use crate::sandbox::PathSandbox;
use crate::scanner;
use crate::thumbnail;

/// Produce the thumbnail listing for a logical folder: subfolder entries
/// first (each with an optional recursive preview), then images, then
/// videos, all in scan order.
///
/// The requested size is clamped into the configured range, and all other
/// cache size buckets are evicted up front, so at most one bucket stays
/// resident. Generation failures stay per-item: a broken image is omitted,
/// a broken video keeps its entry without a thumbnail so the client can
/// fall back to an icon.
pub fn list_thumbnails(
    config: &Config,
    logical_path: &str,
    requested_size: u32,
) -> Vec<ThumbnailEntry> {
    let size = config.clamp_size(requested_size);
    let sandbox = PathSandbox::new(&config.root_folder);
    let folder = sandbox.resolve(logical_path).into_path();
    let cache = ThumbnailCache::new(config.cache_dir());

    // stale size buckets go before this request's own lookups
    cache.evict_other_sizes(size);

    let listing = scanner::scan(&folder);
    let mut entries = Vec::with_capacity(
        listing.subfolders.len() + listing.images.len() + listing.videos.len(),
    );

    entries.par_extend(listing.subfolders.par_iter().map(|name| {
        folder_entry(config, &cache, &folder, logical_path, name, size)
    }));
    entries.par_extend(listing.images.par_iter().filter_map(|name| {
        media_entry(config, &cache, &folder, logical_path, name, MediaKind::Image, size)
    }));
    entries.par_extend(listing.videos.par_iter().filter_map(|name| {
        media_entry(config, &cache, &folder, logical_path, name, MediaKind::Video, size)
    }));

    entries
}

fn folder_entry(
    config: &Config,
    cache: &ThumbnailCache,
    parent: &Path,
    parent_logical: &str,
    name: &str,
    size: u32,
) -> ThumbnailEntry {
    let relative_path = join_logical(parent_logical, name);
    let subfolder = parent.join(name);

    let mut thumbnail = None;
    let mut preview_kind = None;

    // key folder previews by the discovered source file's size, so a
    // changed source invalidates them like any plain thumbnail
    if let Some((kind, source)) = preview::find_first_media(&subfolder, config.preview_depth) {
        let file_size = fs::metadata(&source).map(|m| m.len()).unwrap_or(0);

        let bytes = match cache.lookup(&relative_path, file_size, size) {
            Some(bytes) => Some(bytes),
            None => match generate(&source, kind, size, config.thumbnail_quality) {
                Ok(bytes) => {
                    cache.store(&relative_path, file_size, size, &bytes);
                    Some(bytes)
                }
                Err(err) => {
                    debug!(folder = %relative_path, %err, "folder preview failed");
                    None
                }
            },
        };

        if let Some(bytes) = bytes {
            thumbnail = Some(data_uri(&bytes));
            preview_kind = Some(kind);
        }
    }

    ThumbnailEntry {
        kind: EntryKind::Folder,
        name: name.to_string(),
        relative_path,
        thumbnail,
        preview_kind,
    }
}

fn media_entry(
    config: &Config,
    cache: &ThumbnailCache,
    parent: &Path,
    parent_logical: &str,
    name: &str,
    kind: MediaKind,
    size: u32,
) -> Option<ThumbnailEntry> {
    let relative_path = join_logical(parent_logical, name);
    let source = parent.join(name);
    let file_size = fs::metadata(&source).map(|m| m.len()).unwrap_or(0);

    let bytes = match cache.lookup(&relative_path, file_size, size) {
        Some(bytes) => Some(bytes),
        None => match generate(&source, kind, size, config.thumbnail_quality) {
            Ok(bytes) => {
                cache.store(&relative_path, file_size, size, &bytes);
                Some(bytes)
            }
            Err(err) => {
                debug!(file = %relative_path, %err, "thumbnail generation failed");
                None
            }
        },
    };

    let entry_kind = match kind {
        MediaKind::Image => EntryKind::Image,
        MediaKind::Video => EntryKind::Video,
    };

    match (bytes, kind) {
        (Some(bytes), _) => Some(ThumbnailEntry {
            kind: entry_kind,
            name: name.to_string(),
            relative_path,
            thumbnail: Some(data_uri(&bytes)),
            preview_kind: None,
        }),
        // undecodable images are dropped from the listing
        (None, MediaKind::Image) => None,
        // videos keep their entry; the client shows fallback iconography
        (None, MediaKind::Video) => Some(ThumbnailEntry {
            kind: entry_kind,
            name: name.to_string(),
            relative_path,
            thumbnail: None,
            preview_kind: None,
        }),
    }
}

fn generate(
    source: &Path,
    kind: MediaKind,
    size: u32,
    quality: u8,
) -> Result<Vec<u8>, crate::error::MediaError> {
    match kind {
        MediaKind::Image => thumbnail::image_thumbnail(source, size, quality),
        MediaKind::Video => thumbnail::video_frame_thumbnail(source, size, quality),
    }
}

fn join_logical(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

fn data_uri(bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}
