pub mod files;
pub mod listing;
pub mod thumbnails;

pub use files::{delete_file, fetch_file, DeleteOutcome, FetchOutcome};
pub use listing::{library_stats, list_folder, LibraryStats};
pub use thumbnails::list_thumbnails;
