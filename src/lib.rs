pub mod backup;
pub mod batch;
pub mod config;
pub mod errors;
pub mod image_path;
pub mod imageops;
pub mod precondition;
pub mod progress_tracker;
pub mod remover;
pub mod traits;

pub mod mocks;

pub use backup::{BackupLayout, BackupManager};
pub use batch::{BatchReport, ImageOutcome, ProcessedImage};
pub use config::{BatchConfig, Config, Threshold};
pub use errors::{BgError, Result};
pub use image_path::ImagePath;
pub use progress_tracker::ProgressTracker;
pub use remover::BackgroundRemover;
pub use traits::*;

/// Runs a batch: precondition check, then backup and background removal
/// for each configured image, strictly one after the other.
pub struct Pipeline<R: BackgroundRemoval> {
    remover: R,
    config: BatchConfig,
}

impl<R: BackgroundRemoval> Pipeline<R> {
    pub const fn new(remover: R, config: BatchConfig) -> Self {
        Self { remover, config }
    }

    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub const fn remover(&self) -> &R {
        &self.remover
    }

    /// Processes every configured image.
    ///
    /// Only batch-level problems (bad invocation directory, originals
    /// directory not creatable) are returned as `Err`; per-image failures are
    /// recorded in the report and the batch moves on.
    pub fn run(&self, tracker: &ProgressTracker) -> Result<BatchReport> {
        precondition::check_layout(&self.config)?;
        tracker.note("Directory structure and image paths ok.");

        let backups = BackupManager::from_config(&self.config);
        backups.prepare()?;

        let mut report = BatchReport::new(self.config.images.len());
        for image in &self.config.images {
            let result = self.process_single_image(image, &backups, tracker);
            if let Err(e) = &result {
                match e {
                    BgError::MissingFile { path } => {
                        tracker.note(format!("File not found: {}", path.display()))
                    }
                    e => tracker.note(format!(
                        "Error processing {}: {}",
                        image,
                        e.chain_message()
                    )),
                }
            }
            tracker.inc();
            report.push(ImageOutcome {
                image: image.clone(),
                result,
            });
        }

        tracker.finish();
        Ok(report)
    }

    /// Backs the image up, then rewrites it. The remover never runs when the
    /// backup step failed.
    pub fn process_single_image(
        &self,
        image: &ImagePath,
        backups: &BackupManager,
        tracker: &ProgressTracker,
    ) -> Result<ProcessedImage> {
        let live = image.resolve(&self.config.base_dir);
        if !live.is_file() {
            return Err(BgError::MissingFile { path: live });
        }

        tracker.note(format!("Processing {}...", image));

        let backup_path = backups.backup_path(image)?;
        let backup_written = backups.ensure_backup(image)?;
        if backup_written {
            tracker.note(format!("Backing up original to {}...", backup_path.display()));
        } else {
            tracker.note(format!("Backup already present: {}", backup_path.display()));
        }

        let stats = self.remover.remove_background(&live)?;
        tracker.note(format!(
            "Made {} of {} pixels transparent (reference rgb{:?}, threshold {})",
            stats.keyed,
            stats.total,
            stats.reference,
            self.remover.threshold()
        ));

        Ok(ProcessedImage {
            backup_written,
            stats,
        })
    }
}

impl Pipeline<BackgroundRemover> {
    /// Production pipeline keyed on the configured threshold.
    pub fn with_corner_keying(config: BatchConfig) -> Self {
        let remover = BackgroundRemover::new(config.threshold.value);
        Self::new(remover, config)
    }
}
