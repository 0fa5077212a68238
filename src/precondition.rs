use crate::config::BatchConfig;
use crate::errors::{BgError, Result};

/// Verifies the invocation context before any file is touched.
///
/// Fails when the working directory has the wrong name, the base directory
/// is missing, or not a single configured image exists.
pub fn check_layout(config: &BatchConfig) -> Result<()> {
    if let Some(expected) = &config.expected_cwd {
        let actual = config.cwd.file_name().and_then(|name| name.to_str());
        if actual != Some(expected.as_str()) {
            return Err(BgError::DirectoryPrecondition {
                reason: format!(
                    "must be run from the '{}' directory (current: {})",
                    expected,
                    config.cwd.display()
                ),
            });
        }
    }

    if !config.base_dir.is_dir() {
        return Err(BgError::DirectoryPrecondition {
            reason: format!("{} does not exist", config.base_dir.display()),
        });
    }

    let any_present = config
        .images
        .iter()
        .any(|image| image.resolve(&config.base_dir).is_file());
    if !any_present {
        return Err(BgError::DirectoryPrecondition {
            reason: format!(
                "none of the {} configured images exist under {}",
                config.images.len(),
                config.base_dir.display()
            ),
        });
    }

    Ok(())
}
