use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{FolderPreview, MediaKind};
use crate::scanner;
use crate::thumbnail;

/// Find the first media file worth representing a folder with. Direct
/// images win over direct videos; with neither present and depth budget
/// remaining, subfolders are searched depth-first in lexical order and the
/// first hit wins. `max_depth` counts directory levels, so 2 covers the
/// folder itself plus one level of subfolders.
pub fn find_first_media(folder: &Path, max_depth: u32) -> Option<(MediaKind, PathBuf)> {
    if max_depth == 0 {
        return None;
    }

    let listing = scanner::scan(folder);

    if let Some(name) = listing.images.first() {
        return Some((MediaKind::Image, folder.join(name)));
    }
    if let Some(name) = listing.videos.first() {
        return Some((MediaKind::Video, folder.join(name)));
    }

    for subfolder in &listing.subfolders {
        if let Some(found) = find_first_media(&folder.join(subfolder), max_depth - 1) {
            return Some(found);
        }
    }

    None
}

/// Produce a preview thumbnail for a folder, or nothing if no media is
/// found within the depth budget or the chosen file will not decode.
pub fn preview(folder: &Path, size: u32, quality: u8, max_depth: u32) -> Option<FolderPreview> {
    let (kind, source) = find_first_media(folder, max_depth)?;

    let result = match kind {
        MediaKind::Image => thumbnail::image_thumbnail(&source, size, quality),
        MediaKind::Video => thumbnail::video_frame_thumbnail(&source, size, quality),
    };

    match result {
        Ok(bytes) => Some(FolderPreview { kind, bytes }),
        Err(err) => {
            debug!(source = %source.display(), %err, "folder preview failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs::{self, File};

    fn write_jpg(path: &Path) {
        RgbImage::from_pixel(32, 32, Rgb([200, 100, 50]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn images_take_precedence_over_videos() {
        let dir = tempfile::tempdir().unwrap();
        write_jpg(&dir.path().join("photo.jpg"));
        File::create(dir.path().join("clip.mp4")).unwrap();

        let (kind, source) = find_first_media(dir.path(), 2).unwrap();
        assert_eq!(kind, MediaKind::Image);
        assert!(source.ends_with("photo.jpg"));
    }

    #[test]
    fn video_only_folder_yields_a_video() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("clip.mp4")).unwrap();

        let (kind, _) = find_first_media(dir.path(), 2).unwrap();
        assert_eq!(kind, MediaKind::Video);
    }

    #[test]
    fn recurses_one_level_within_default_depth() {
        let dir = tempfile::tempdir().unwrap();
        let beach = dir.path().join("beach");
        fs::create_dir(&beach).unwrap();
        write_jpg(&beach.join("sunset.jpg"));

        let found = preview(dir.path(), 100, 85, 2).unwrap();
        assert_eq!(found.kind, MediaKind::Image);
        assert!(!found.bytes.is_empty());
    }

    #[test]
    fn depth_budget_bounds_the_search() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        write_jpg(&deep.join("photo.jpg"));

        // photo sits three levels down; the default budget stops short
        assert!(find_first_media(dir.path(), 2).is_none());
        assert!(find_first_media(dir.path(), 3).is_some());
    }

    #[test]
    fn subfolders_are_searched_in_lexical_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zebra", "apple"] {
            let sub = dir.path().join(name);
            fs::create_dir(&sub).unwrap();
            write_jpg(&sub.join("pic.jpg"));
        }

        let (_, source) = find_first_media(dir.path(), 2).unwrap();
        assert!(source.starts_with(dir.path().join("apple")));
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        assert!(preview(dir.path(), 100, 85, 2).is_none());
    }

    #[test]
    fn missing_folder_yields_nothing() {
        assert!(preview(Path::new("/no/such/folder"), 100, 85, 2).is_none());
    }
}
