use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A configured image, addressed relative to the public base directory.
///
/// Leading roots are stripped so `/images/a.png` and `images/a.png` name
/// the same file; joining an absolute path onto the base would otherwise
/// discard the base entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath(PathBuf);

impl ImagePath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let relative = path
            .as_ref()
            .components()
            .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
            .collect();
        Self(relative)
    }

    pub fn relative(&self) -> &Path {
        &self.0
    }

    /// Live location of the image under `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.0)
    }

    pub fn file_name(&self) -> Option<&OsStr> {
        self.0.file_name()
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for ImagePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for ImagePath {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}
