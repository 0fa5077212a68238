use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for the background remover.
///
/// Per-image variants are carried as values inside an `ImageOutcome` so a
/// single bad file never aborts the batch. Only `DirectoryPrecondition`
/// stops a run.
#[derive(Error, Debug)]
pub enum BgError {
    #[error("Directory precondition failed: {reason}")]
    DirectoryPrecondition { reason: String },

    #[error("File not found: {path:?}")]
    MissingFile { path: PathBuf },

    #[error("Failed to decode image {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image {path:?} has no pixels")]
    EmptyImage { path: PathBuf },

    #[error("No writable image format for {path:?}")]
    UnsupportedFormat { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, BgError>;

impl BgError {
    pub(crate) fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Fatal errors abort the whole batch; everything else is per image.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DirectoryPrecondition { .. })
    }

    /// Renders the error with its full `source` chain on one line.
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// Convert I/O errors to filesystem errors.
///
/// Fallback for call sites without path context. Code that knows the path
/// and operation should build `BgError::FileSystem` directly.
impl From<std::io::Error> for BgError {
    fn from(err: std::io::Error) -> Self {
        Self::file_system("unknown", "unknown", err)
    }
}
