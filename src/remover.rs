use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};
use tempfile::NamedTempFile;

use crate::errors::{BgError, Result};
use crate::imageops::{into_keyable, KeyBackground, KeyStats};
use crate::traits::BackgroundRemoval;

/// Corner-color background remover.
///
/// The reference color is the RGB of pixel (0,0). Every pixel whose color
/// distance to it is below the threshold gets alpha 0.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundRemover {
    threshold: u32,
}

impl BackgroundRemover {
    pub const fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// In-memory half of the operation. `path` is only used for error context.
    pub fn process_image(
        &self,
        image: DynamicImage,
        path: &Path,
    ) -> Result<(RgbaImage, KeyStats)> {
        let mut rgba = into_keyable(image);
        let stats = rgba
            .key_background(self.threshold)
            .ok_or_else(|| BgError::EmptyImage {
                path: path.to_path_buf(),
            })?;
        Ok((rgba, stats))
    }
}

impl BackgroundRemoval for BackgroundRemover {
    fn remove_background(&self, path: &Path) -> Result<KeyStats> {
        let format = writable_format(path)?;
        let image = image::open(path).map_err(|source| match source {
            ImageError::IoError(e) => BgError::file_system(path, "open image", e),
            source => BgError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let (rgba, stats) = self.process_image(image, path)?;
        write_atomically(&rgba, path, format)?;
        Ok(stats)
    }

    fn threshold(&self) -> u32 {
        self.threshold
    }
}

fn writable_format(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_path(path)
        .ok()
        .filter(|format| format.writing_enabled())
        .ok_or_else(|| BgError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
}

/// Encodes into a sibling temporary file, then renames it over `path`.
///
/// The original is left untouched if encoding or writing fails. A symlinked
/// `path` is resolved first so the link survives and its target is rewritten.
fn write_atomically(image: &RgbaImage, path: &Path, format: ImageFormat) -> Result<()> {
    let target = fs::canonicalize(path)
        .map_err(|e| BgError::file_system(path, "resolve image path", e))?;
    let dir = target
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let mut temp = NamedTempFile::new_in(&dir)
        .map_err(|e| BgError::file_system(&dir, "create temporary file", e))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        image
            .write_to(&mut writer, format)
            .map_err(|source| match source {
                ImageError::IoError(e) => BgError::file_system(path, "write image", e),
                source => BgError::Encode {
                    path: path.to_path_buf(),
                    source,
                },
            })?;
        writer
            .flush()
            .map_err(|e| BgError::file_system(path, "write image", e))?;
    }

    // NamedTempFile is created owner-only; keep the original's mode
    let permissions = fs::metadata(&target)
        .map_err(|e| BgError::file_system(&target, "read permissions", e))?
        .permissions();
    fs::set_permissions(temp.path(), permissions)
        .map_err(|e| BgError::file_system(temp.path(), "copy permissions", e))?;

    temp.persist(&target)
        .map_err(|e| BgError::file_system(&target, "replace original", e.error))?;
    Ok(())
}
