use crate::errors::Result;
use crate::imageops::KeyStats;
use std::path::Path;

/// Removes the background of a stored image in place.
///
/// The pipeline depends on this abstraction rather than on
/// `BackgroundRemover` directly, so orchestration can be tested without
/// decoding real images.
pub trait BackgroundRemoval {
    /// Decodes the image at `path`, keys out its background and overwrites
    /// the file with the result.
    fn remove_background(&self, path: &Path) -> Result<KeyStats>;

    /// Threshold applied to every image of the batch.
    fn threshold(&self) -> u32;
}
