//! Sandboxed media directory browsing with disk-backed thumbnail caching.
//!
//! The serving layer hands this crate a logical folder or file path plus a
//! requested thumbnail size; everything here resolves that path inside the
//! configured root, scans directories, and generates or replays cached
//! thumbnails. Transport, sessions and rendering live elsewhere.

pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod preview;
pub mod sandbox;
pub mod scanner;
pub mod thumbnail;

pub use cache::{cache_key, CacheStats, ThumbnailCache};
pub use commands::{
    delete_file, fetch_file, library_stats, list_folder, list_thumbnails, DeleteOutcome,
    FetchOutcome, LibraryStats,
};
pub use config::Config;
pub use error::MediaError;
pub use models::{FolderListing, FolderPreview, MediaKind, ThumbnailEntry};
pub use sandbox::{PathSandbox, Resolved};
