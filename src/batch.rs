use std::fmt;

use crate::errors::{BgError, Result};
use crate::image_path::ImagePath;
use crate::imageops::KeyStats;

/// What happened to one image that made it through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessedImage {
    pub backup_written: bool,
    pub stats: KeyStats,
}

/// Per-image result. Failures are values here, never control flow.
#[derive(Debug)]
pub struct ImageOutcome {
    pub image: ImagePath,
    pub result: Result<ProcessedImage>,
}

impl ImageOutcome {
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self.result, Err(BgError::MissingFile { .. }))
    }
}

/// Outcomes of a whole batch, in configuration order.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<ImageOutcome>,
    total: usize,
}

impl BatchReport {
    /// `total` is the number of configured images, missing ones included.
    pub fn new(total: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(total),
            total,
        }
    }

    pub fn push(&mut self, outcome: ImageOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[ImageOutcome] {
        &self.outcomes
    }

    pub const fn total(&self) -> usize {
        self.total
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn missing_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_missing()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ImageOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn backups_written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, Ok(ProcessedImage { backup_written: true, .. })))
            .count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} processed successfully.",
            self.success_count(),
            self.total
        )
    }
}
