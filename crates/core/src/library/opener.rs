use std::path::Path;

/// Shows a directory in the host file browser.
pub trait FolderOpener: Send + Sync {
    fn open(&self, path: &Path) -> std::io::Result<()>;
}

/// Opens folders with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl FolderOpener for SystemOpener {
    fn open(&self, path: &Path) -> std::io::Result<()> {
        open::that_detached(path)
    }
}
