use clap::Parser;
use std::path::{Path, PathBuf};

use crate::backup::BackupLayout;
use crate::image_path::ImagePath;
use crate::imageops::MAX_COLOR_DISTANCE;

pub const DEFAULT_THRESHOLD: u32 = 30;

/// Images processed when no `--image` is given, relative to the public directory.
pub const DEFAULT_IMAGES: &[&str] = &[
    // good
    "images/1_5_pitches_good_bird_notes.png",
    "images/1_5_pitches_good_bird.png",
    "images/1_5_pitches_good_cat.png",
    "images/1_5_pitches_good_deer.png",
    "images/1_5_pitches_good_dog.png",
    "images/1_5_pitches_good_hedgehog.png",
    "images/1_5_pitches_good_pig.png",
    "images/1_5_pitches_good_ladybug.png",
    "images/1_5_pitches_good_sheep.png",
    // bad
    "images/1_5_pitches_bad_bug.png",
    "images/1_5_pitches_bad_crab.png",
    "images/1_5_pitches_bad_cat.png",
    "images/1_5_pitches_bad_crow.png",
    "images/1_5_pitches_bad_rabbit.png",
    "images/1_5_pitches_bad_snake.png",
];

#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Color distance below which a pixel counts as background
    #[arg(allow_negative_numbers = true)]
    pub threshold: Option<String>,

    /// Public directory, relative to the working directory
    #[arg(long, default_value = "../public")]
    pub public_dir: PathBuf,

    /// Backup directory, relative to the public directory
    #[arg(long, default_value = "images/originals")]
    pub originals_dir: PathBuf,

    /// Name the working directory must have
    #[arg(long, default_value = "tools")]
    pub expected_cwd: String,

    #[arg(long)]
    pub skip_cwd_check: bool,

    /// Process these images instead of the built-in list (repeatable)
    #[arg(long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = BackupLayout::Flat)]
    pub backup_layout: BackupLayout,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    /// Resolves the CLI arguments against `cwd` into the value the pipeline runs on.
    pub fn resolve(&self, cwd: &Path) -> BatchConfig {
        let base_dir = cwd.join(&self.public_dir);
        let images = if self.images.is_empty() {
            DEFAULT_IMAGES.iter().copied().map(ImagePath::from).collect()
        } else {
            self.images.iter().cloned().map(ImagePath::from).collect()
        };

        BatchConfig {
            cwd: cwd.to_path_buf(),
            originals_dir: base_dir.join(&self.originals_dir),
            base_dir,
            expected_cwd: (!self.skip_cwd_check).then(|| self.expected_cwd.clone()),
            images,
            threshold: Threshold::from_arg(self.threshold.as_deref()),
            backup_layout: self.backup_layout,
        }
    }
}

/// Everything one batch needs, fixed before the first image is touched.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub cwd: PathBuf,
    pub base_dir: PathBuf,
    pub originals_dir: PathBuf,
    /// `None` disables the working-directory name check.
    pub expected_cwd: Option<String>,
    pub images: Vec<ImagePath>,
    pub threshold: Threshold,
    pub backup_layout: BackupLayout,
}

impl BatchConfig {
    /// Config rooted at `base_dir` with default threshold and flat backups.
    pub fn new(base_dir: impl Into<PathBuf>, images: Vec<ImagePath>) -> Self {
        let base_dir = base_dir.into();
        Self {
            cwd: base_dir.clone(),
            originals_dir: base_dir.join("images/originals"),
            base_dir,
            expected_cwd: None,
            images,
            threshold: Threshold::default(),
            backup_layout: BackupLayout::Flat,
        }
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = Threshold {
            value: threshold,
            source: ThresholdSource::Argument,
        };
        self
    }

    pub fn with_backup_layout(mut self, layout: BackupLayout) -> Self {
        self.backup_layout = layout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdSource {
    Default,
    Argument,
    /// The raw argument that failed to parse.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threshold {
    pub value: u32,
    pub source: ThresholdSource,
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            value: DEFAULT_THRESHOLD,
            source: ThresholdSource::Default,
        }
    }
}

impl Threshold {
    /// Lenient parse: anything that is not a non-negative integer falls back
    /// to the default instead of failing.
    ///
    /// Values past the largest possible distance all key every pixel, so
    /// they are clamped to `MAX_COLOR_DISTANCE + 1`.
    pub fn from_arg(raw: Option<&str>) -> Self {
        const KEY_ALL: u32 = MAX_COLOR_DISTANCE + 1;

        match raw {
            None => Self::default(),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(value) => Self {
                    value: value.min(u64::from(KEY_ALL)) as u32,
                    source: ThresholdSource::Argument,
                },
                Err(_) => Self {
                    value: DEFAULT_THRESHOLD,
                    source: ThresholdSource::Invalid(raw.to_string()),
                },
            },
        }
    }

    /// Line to print at startup, if the argument deserves a mention.
    pub fn describe(&self) -> Option<String> {
        match &self.source {
            ThresholdSource::Default => None,
            ThresholdSource::Argument => Some(format!("Using threshold: {}", self.value)),
            ThresholdSource::Invalid(raw) => Some(format!(
                "Invalid threshold '{}', using default: {}",
                raw, self.value
            )),
        }
    }
}
