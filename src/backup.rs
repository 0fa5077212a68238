use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::config::BatchConfig;
use crate::errors::{BgError, Result};
use crate::image_path::ImagePath;

/// How backup files are named under the originals directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackupLayout {
    /// `<originals>/<file name>`. Two images sharing a file name share one
    /// slot, and only the first original is kept.
    #[default]
    Flat,
    /// `<originals>/<relative path>`, one slot per configured image.
    Mirrored,
}

/// Keeps exactly one pristine copy of every image, written before the first
/// mutation and never overwritten afterwards.
#[derive(Debug, Clone)]
pub struct BackupManager {
    base_dir: PathBuf,
    originals_dir: PathBuf,
    layout: BackupLayout,
}

impl BackupManager {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        originals_dir: impl Into<PathBuf>,
        layout: BackupLayout,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            originals_dir: originals_dir.into(),
            layout,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(
            &config.base_dir,
            &config.originals_dir,
            config.backup_layout,
        )
    }

    pub fn originals_dir(&self) -> &Path {
        &self.originals_dir
    }

    /// Creates the originals directory up front.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.originals_dir)
            .map_err(|e| BgError::file_system(&self.originals_dir, "create originals directory", e))
    }

    pub fn backup_path(&self, image: &ImagePath) -> Result<PathBuf> {
        match self.layout {
            BackupLayout::Flat => image
                .file_name()
                .map(|name| self.originals_dir.join(name))
                .ok_or_else(|| {
                    BgError::file_system(
                        image.relative(),
                        "derive backup name",
                        io::Error::new(ErrorKind::InvalidInput, "path has no file name"),
                    )
                }),
            BackupLayout::Mirrored => Ok(self.originals_dir.join(image.relative())),
        }
    }

    /// Copies the live file into its backup slot unless the slot is taken.
    ///
    /// Returns `true` when a new backup was written.
    pub fn ensure_backup(&self, image: &ImagePath) -> Result<bool> {
        let target = self.backup_path(image)?;
        if target.exists() {
            return Ok(false);
        }

        let source = image.resolve(&self.base_dir);
        let mut reader = match File::open(&source) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BgError::MissingFile { path: source })
            }
            Err(e) => return Err(BgError::file_system(&source, "open original", e)),
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BgError::file_system(parent, "create backup directory", e))?;
        }

        let mut writer = match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(BgError::file_system(&target, "create backup", e)),
        };

        if let Err(e) = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all()) {
            // a truncated backup would otherwise be kept forever
            drop(writer);
            let _ = fs::remove_file(&target);
            return Err(BgError::file_system(&target, "copy original", e));
        }

        let permissions = reader
            .metadata()
            .map_err(|e| BgError::file_system(&source, "read permissions", e))?
            .permissions();
        fs::set_permissions(&target, permissions)
            .map_err(|e| BgError::file_system(&target, "copy permissions", e))?;

        Ok(true)
    }
}
