use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Outcome of resolving a logical path against the root.
///
/// A violation never surfaces as an error: the resolver falls back to the
/// root itself and marks the result as clamped, so callers can choose
/// between silently serving the root listing and rejecting the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// The path normalized to a location at or under the root.
    Within(PathBuf),
    /// The path tried to escape the root and was replaced by it.
    Clamped(PathBuf),
}

impl Resolved {
    pub fn path(&self) -> &Path {
        match self {
            Resolved::Within(path) | Resolved::Clamped(path) => path,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Resolved::Within(path) | Resolved::Clamped(path) => path,
        }
    }

    pub fn is_clamped(&self) -> bool {
        matches!(self, Resolved::Clamped(_))
    }
}

/// Resolves slash-separated logical paths against a fixed root directory.
/// Purely lexical: no filesystem access, no symlink chasing.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
}

impl PathSandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalize `relative` and join it under the root. The empty string
    /// maps to the root itself. Any `..` that would climb above the root,
    /// and any absolute or prefixed input, clamps to the root.
    pub fn resolve(&self, relative: &str) -> Resolved {
        if relative.is_empty() {
            return Resolved::Within(self.root.clone());
        }

        let mut segments: Vec<OsString> = Vec::new();
        let mut escaped = false;

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_os_string()),
                Component::ParentDir => {
                    if segments.pop().is_none() {
                        escaped = true;
                    }
                }
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => escaped = true,
            }
        }

        if escaped {
            return Resolved::Clamped(self.root.clone());
        }

        let mut resolved = self.root.clone();
        for segment in segments {
            resolved.push(segment);
        }
        Resolved::Within(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> PathSandbox {
        PathSandbox::new("/srv/media")
    }

    #[test]
    fn empty_input_maps_to_root() {
        assert_eq!(
            sandbox().resolve(""),
            Resolved::Within(PathBuf::from("/srv/media"))
        );
    }

    #[test]
    fn plain_paths_join_under_root() {
        assert_eq!(
            sandbox().resolve("trips/beach"),
            Resolved::Within(PathBuf::from("/srv/media/trips/beach"))
        );
        assert_eq!(
            sandbox().resolve("./trips/./beach"),
            Resolved::Within(PathBuf::from("/srv/media/trips/beach"))
        );
    }

    #[test]
    fn dotdot_collapses_within_root() {
        assert_eq!(
            sandbox().resolve("trips/../beach"),
            Resolved::Within(PathBuf::from("/srv/media/beach"))
        );
        // collapses to nothing, which is the root
        assert_eq!(
            sandbox().resolve("trips/.."),
            Resolved::Within(PathBuf::from("/srv/media"))
        );
    }

    #[test]
    fn escape_attempts_clamp_to_root() {
        let root = PathBuf::from("/srv/media");
        assert!(sandbox().resolve("..").is_clamped());
        assert!(!sandbox().resolve("trips").is_clamped());
        assert_eq!(sandbox().resolve(".."), Resolved::Clamped(root.clone()));
        assert_eq!(
            sandbox().resolve("../etc/passwd"),
            Resolved::Clamped(root.clone())
        );
        assert_eq!(
            sandbox().resolve("a/../../b"),
            Resolved::Clamped(root.clone())
        );
        assert_eq!(
            sandbox().resolve("/etc/passwd"),
            Resolved::Clamped(root)
        );
    }

    #[test]
    fn every_resolution_stays_inside_root() {
        let sandbox = sandbox();
        let hostile = [
            "",
            ".",
            "..",
            "../../..",
            "/",
            "/etc",
            "a/b/c",
            "a/../../../b",
            "./../a",
            "trips/../../trips",
        ];
        for input in hostile {
            let resolved = sandbox.resolve(input);
            assert!(
                resolved.path().starts_with(sandbox.root()),
                "{input:?} resolved outside the root: {:?}",
                resolved.path()
            );
        }
    }
}
