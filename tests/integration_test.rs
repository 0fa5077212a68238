use clap::Parser;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use corner_key_rs::{
    BackupLayout, BatchConfig, BgError, Config, ImagePath, Pipeline, ProgressTracker,
};

/// `<tmp>/tools` as working directory and `<tmp>/public/images/*.png`.
struct Site {
    _temp_dir: TempDir,
    tools: PathBuf,
    public: PathBuf,
}

impl Site {
    fn new() -> Site {
        let temp_dir = TempDir::new().unwrap();
        let tools = temp_dir.path().join("tools");
        let public = temp_dir.path().join("public");
        fs::create_dir_all(&tools).unwrap();
        fs::create_dir_all(public.join("images")).unwrap();
        Site {
            _temp_dir: temp_dir,
            tools,
            public,
        }
    }

    fn image(&self, name: &str) -> PathBuf {
        self.public.join("images").join(name)
    }

    fn originals(&self) -> PathBuf {
        self.public.join("images/originals")
    }

    /// White background, one near-white and one grey pixel.
    fn write_white_image(&self, name: &str) -> PathBuf {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        img.put_pixel(5, 5, Rgb([250, 250, 250]));
        img.put_pixel(5, 6, Rgb([200, 200, 200]));
        let path = self.image(name);
        img.save(&path).unwrap();
        path
    }

    fn config(&self, args: &[&str]) -> BatchConfig {
        let mut argv = vec!["corner-key-rs"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap().resolve(&self.tools)
    }
}

fn pixel(path: &Path, x: u32, y: u32) -> Rgba<u8> {
    *image::open(path).unwrap().into_rgba8().get_pixel(x, y)
}

#[test]
fn test_end_to_end_with_cli_config() {
    let site = Site::new();
    let cat = site.write_white_image("cat.png");
    let original_bytes = fs::read(&cat).unwrap();

    let config = site.config(&["--image", "/images/cat.png"]);
    let report = Pipeline::with_corner_keying(config)
        .run(&ProgressTracker::hidden())
        .unwrap();

    assert_eq!(report.to_string(), "1 of 1 processed successfully.");
    assert_eq!(pixel(&cat, 0, 0), Rgba([255, 255, 255, 0]));
    assert_eq!(pixel(&cat, 5, 5), Rgba([250, 250, 250, 0]));
    assert_eq!(pixel(&cat, 5, 6), Rgba([200, 200, 200, 255]));
    assert_eq!(
        fs::read(site.originals().join("cat.png")).unwrap(),
        original_bytes
    );
}

#[test]
fn test_threshold_zero_keeps_near_matches() {
    let site = Site::new();
    let cat = site.write_white_image("cat.png");

    let config = site.config(&["0", "--image", "images/cat.png"]);
    assert_eq!(config.threshold.value, 0);
    Pipeline::with_corner_keying(config)
        .run(&ProgressTracker::hidden())
        .unwrap();

    assert_eq!(pixel(&cat, 9, 9)[3], 0);
    assert_eq!(pixel(&cat, 5, 5)[3], 255);
}

#[test]
fn test_rerun_keeps_first_backup_and_is_idempotent() {
    let site = Site::new();
    let cat = site.write_white_image("cat.png");
    let original_bytes = fs::read(&cat).unwrap();

    let config = site.config(&["--image", "images/cat.png"]);
    let pipeline = Pipeline::with_corner_keying(config);

    let first = pipeline.run(&ProgressTracker::hidden()).unwrap();
    assert_eq!(first.backups_written(), 1);
    let after_first = image::open(&cat).unwrap().into_rgba8();

    let second = pipeline.run(&ProgressTracker::hidden()).unwrap();
    assert_eq!(second.backups_written(), 0);
    assert_eq!(second.success_count(), 1);

    let after_second = image::open(&cat).unwrap().into_rgba8();
    assert_eq!(after_first, after_second);
    assert_eq!(
        fs::read(site.originals().join("cat.png")).unwrap(),
        original_bytes
    );
}

#[test]
fn test_existing_backup_is_left_alone() {
    let site = Site::new();
    site.write_white_image("cat.png");
    fs::create_dir_all(site.originals()).unwrap();
    fs::write(site.originals().join("cat.png"), b"older backup").unwrap();

    let config = site.config(&["--image", "images/cat.png"]);
    let report = Pipeline::with_corner_keying(config)
        .run(&ProgressTracker::hidden())
        .unwrap();

    assert_eq!(report.success_count(), 1);
    assert_eq!(report.backups_written(), 0);
    assert_eq!(
        fs::read(site.originals().join("cat.png")).unwrap(),
        b"older backup"
    );
}

#[test]
fn test_missing_and_broken_images_do_not_stop_batch() {
    let site = Site::new();
    let cat = site.write_white_image("cat.png");
    fs::write(site.image("crab.png"), b"not an image").unwrap();

    let config = site.config(&[
        "--image",
        "images/cat.png",
        "--image",
        "images/dog.png",
        "--image",
        "images/crab.png",
    ]);
    let report = Pipeline::with_corner_keying(config)
        .run(&ProgressTracker::hidden())
        .unwrap();

    assert_eq!(report.to_string(), "1 of 3 processed successfully.");
    assert_eq!(report.missing_count(), 1);
    assert!(report
        .outcomes()
        .iter()
        .any(|o| matches!(o.result, Err(BgError::Decode { .. }))));
    assert_eq!(pixel(&cat, 0, 0)[3], 0);
    // the broken file is still backed up before the decode fails
    assert_eq!(
        fs::read(site.originals().join("crab.png")).unwrap(),
        b"not an image"
    );
    assert_eq!(fs::read(site.image("crab.png")).unwrap(), b"not an image");
}

#[test]
fn test_existing_alpha_is_preserved_for_foreground() {
    let site = Site::new();
    let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 128, 0, 255]));
    img.put_pixel(2, 2, Rgba([200, 10, 10, 100]));
    let path = site.image("ladybug.png");
    img.save(&path).unwrap();

    let config = site.config(&["--image", "images/ladybug.png"]);
    Pipeline::with_corner_keying(config)
        .run(&ProgressTracker::hidden())
        .unwrap();

    assert_eq!(pixel(&path, 1, 1), Rgba([0, 128, 0, 0]));
    assert_eq!(pixel(&path, 2, 2), Rgba([200, 10, 10, 100]));
}

#[test]
fn test_wrong_working_directory_aborts_before_touching_files() {
    let site = Site::new();
    let cat = site.write_white_image("cat.png");
    let before = fs::read(&cat).unwrap();

    let config = Config::try_parse_from(["corner-key-rs", "--image", "images/cat.png"])
        .unwrap()
        .resolve(&site.public.join("images"));
    let err = Pipeline::with_corner_keying(config)
        .run(&ProgressTracker::hidden())
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(fs::read(&cat).unwrap(), before);
    assert!(!site.originals().exists());
}

#[test]
fn test_mirrored_layout_separates_same_names() {
    let site = Site::new();
    fs::create_dir_all(site.public.join("images/good")).unwrap();
    fs::create_dir_all(site.public.join("images/bad")).unwrap();
    site.write_white_image("good/cat.png");
    site.write_white_image("bad/cat.png");

    let config = site
        .config(&["--image", "images/good/cat.png", "--image", "images/bad/cat.png"])
        .with_backup_layout(BackupLayout::Mirrored);
    let report = Pipeline::with_corner_keying(config)
        .run(&ProgressTracker::hidden())
        .unwrap();

    assert_eq!(report.backups_written(), 2);
    assert!(site.originals().join("images/good/cat.png").is_file());
    assert!(site.originals().join("images/bad/cat.png").is_file());
}

#[test]
fn test_batch_config_built_directly() {
    let site = Site::new();
    let cat = site.write_white_image("cat.png");

    let config = BatchConfig::new(&site.public, vec![ImagePath::from("images/cat.png")])
        .with_threshold(200);
    Pipeline::with_corner_keying(config)
        .run(&ProgressTracker::hidden())
        .unwrap();

    // 165 < 200, so the grey pixel goes too
    assert_eq!(pixel(&cat, 5, 6)[3], 0);
}
