use crate::errors::{BgError, Result};
use crate::imageops::KeyStats;
use crate::traits::BackgroundRemoval;
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Stand-in remover for orchestration tests.
///
/// Records every call and fails with a decode-style error for the
/// configured file names. Leaves the file alone unless told to overwrite it.
#[derive(Debug, Default)]
pub struct MockRemover {
    pub threshold: u32,
    fail_on: Vec<String>,
    overwrite_with: Option<Vec<u8>>,
    calls: RefCell<Vec<PathBuf>>,
}

impl MockRemover {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Makes every path ending in `file_name` fail.
    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.fail_on.push(file_name.to_string());
        self
    }

    /// Replaces the live file with `bytes` on every successful call.
    pub fn overwriting_with(mut self, bytes: &[u8]) -> Self {
        self.overwrite_with = Some(bytes.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl BackgroundRemoval for MockRemover {
    fn remove_background(&self, path: &Path) -> Result<KeyStats> {
        self.calls.borrow_mut().push(path.to_path_buf());

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if self.fail_on.iter().any(|name| name == file_name) {
            return Err(BgError::Decode {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "mock decode failure",
                )),
            });
        }

        if let Some(bytes) = &self.overwrite_with {
            std::fs::write(path, bytes)
                .map_err(|e| BgError::file_system(path, "overwrite image", e))?;
        }

        Ok(KeyStats {
            reference: [0, 0, 0],
            keyed: 0,
            total: 0,
        })
    }

    fn threshold(&self) -> u32 {
        self.threshold
    }
}

/// In-memory `Write` sink whose contents stay readable after it is handed
/// to a `ProgressTracker`.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
