use std::fs;
use std::path::Path;
use tracing::debug;

use crate::models::{media_kind, FolderListing, MediaKind};

/// List the immediate children of `path`, classified into subfolders,
/// images and videos. A missing or unreadable directory yields an empty
/// listing; entries that fail mid-enumeration are skipped, never fatal.
///
/// Dot-named directories are hidden, which also keeps the cache directory
/// itself out of listings. All three sequences come back lexically sorted
/// so repeated scans are stable.
pub fn scan(path: &Path) -> FolderListing {
    let mut listing = FolderListing::default();

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(path = %path.display(), %err, "directory not scannable");
            return listing;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(path = %path.display(), %err, "skipping unreadable entry");
                continue;
            }
        };

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue, // non-UTF-8 names are not addressable by logical paths
        };

        // follows symlinks, like the listing the user sees
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(err) => {
                debug!(entry = %name, %err, "skipping entry without metadata");
                continue;
            }
        };

        if metadata.is_dir() {
            if !name.starts_with('.') {
                listing.subfolders.push(name);
            }
        } else if metadata.is_file() {
            match media_kind(Path::new(&name)) {
                Some(MediaKind::Image) => listing.images.push(name),
                Some(MediaKind::Video) => listing.videos.push(name),
                None => {}
            }
        }
    }

    listing.subfolders.sort();
    listing.images.sort();
    listing.videos.sort();
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn missing_directory_yields_empty_listing() {
        let listing = scan(Path::new("/no/such/directory"));
        assert!(listing.is_empty());
    }

    #[test]
    fn classifies_and_sorts_children() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::create_dir(root.join("zoo")).unwrap();
        fs::create_dir(root.join("alps")).unwrap();
        fs::create_dir(root.join(".thumbcache")).unwrap();
        File::create(root.join("b.jpg")).unwrap();
        File::create(root.join("a.PNG")).unwrap();
        File::create(root.join("clip.mp4")).unwrap();
        File::create(root.join("notes.txt")).unwrap();

        let listing = scan(root);
        assert_eq!(listing.subfolders, vec!["alps", "zoo"]);
        assert_eq!(listing.images, vec!["a.PNG", "b.jpg"]);
        assert_eq!(listing.videos, vec!["clip.mp4"]);
    }

    #[test]
    fn repeated_scans_are_stable() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.jpg", "a.jpg", "b.jpg"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let first = scan(dir.path());
        let second = scan(dir.path());
        assert_eq!(first, second);
        assert_eq!(first.images, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }
}
