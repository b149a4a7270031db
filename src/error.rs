use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    /// The source media could not be opened, or no frame could be decoded.
    #[error("cannot decode `{}`: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// A cache maintenance operation failed outright. Routine lookups and
    /// stores never raise this; they degrade to misses instead.
    #[error("cache operation failed at `{}`", path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MediaError {
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
