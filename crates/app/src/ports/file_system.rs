//! File-system port — directory listings and file metadata.

use std::future::Future;
use std::path::Path;

use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

/// A single directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name without its directory.
    pub name: String,
    pub kind: FileKind,
    pub modified: Option<Timestamp>,
}

impl FileEntry {
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

/// Read-only access to the host file system.
pub trait FileSystem: Send + Sync {
    /// List the entries of `dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`PumpkinError::Device`] when the directory cannot be read.
    fn list_dir(
        &self,
        dir: &Path,
    ) -> impl Future<Output = Result<Vec<FileEntry>, PumpkinError>> + Send;

    /// Stat `path`, returning `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`PumpkinError::Device`] for any failure other than
    /// absence (permissions, IO).
    fn stat(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Option<FileEntry>, PumpkinError>> + Send;
}

impl<T: FileSystem> FileSystem for std::sync::Arc<T> {
    fn list_dir(
        &self,
        dir: &Path,
    ) -> impl Future<Output = Result<Vec<FileEntry>, PumpkinError>> + Send {
        (**self).list_dir(dir)
    }

    fn stat(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Option<FileEntry>, PumpkinError>> + Send {
        (**self).stat(path)
    }
}
