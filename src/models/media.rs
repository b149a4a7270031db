use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "ogg", "avi", "mov", "mkv", "m4v", "mpg", "mpeg",
];

/// Classify a path by filename extension, case-insensitively.
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// The immediate children of one directory, classified and sorted.
/// Produced fresh on every scan; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FolderListing {
    pub subfolders: Vec<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

impl FolderListing {
    pub fn is_empty(&self) -> bool {
        self.subfolders.is_empty() && self.images.is_empty() && self.videos.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    Image,
    Video,
}

/// One row of a thumbnail listing, as handed to the serving layer.
///
/// `thumbnail` holds a `data:image/jpeg;base64,...` URI. A video entry
/// with no thumbnail means frame extraction failed and the client should
/// fall back to its own iconography; a failed image entry is omitted from
/// the listing entirely.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailEntry {
    pub kind: EntryKind,
    pub name: String,
    pub relative_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// For folder entries: which kind of media the preview was derived from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_kind: Option<MediaKind>,
}

/// A folder-preview thumbnail and the kind of media it was derived from.
#[derive(Debug, Clone)]
pub struct FolderPreview {
    pub kind: MediaKind,
    pub bytes: Vec<u8>,
}
