pub mod media;

pub use media::{
    media_kind, EntryKind, FolderListing, FolderPreview, MediaKind, ThumbnailEntry,
    IMAGE_EXTENSIONS, VIDEO_EXTENSIONS,
};
