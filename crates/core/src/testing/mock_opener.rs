use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::library::FolderOpener;

/// Records opened folders instead of launching a file browser.
#[derive(Debug, Default)]
pub struct MockOpener {
    opened: Mutex<Vec<PathBuf>>,
    error: Mutex<Option<String>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `open` fail with `message`.
    pub fn fail_with(&self, message: &str) {
        if let Ok(mut error) = self.error.lock() {
            *error = Some(message.to_string());
        }
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl FolderOpener for MockOpener {
    fn open(&self, path: &Path) -> std::io::Result<()> {
        if let Some(message) = self.error.lock().ok().and_then(|e| e.clone()) {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, message));
        }
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(path.to_path_buf());
        }
        Ok(())
    }
}
