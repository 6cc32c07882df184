//! File system access on `tokio::fs`.

use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;

use pumpkinpi_app::ports::{FileEntry, FileKind, FileSystem};
use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::time::Timestamp;

use crate::error::HostError;

#[derive(Debug, Clone, Copy, Default)]
pub struct HostFileSystem;

fn kind_of(file_type: std::fs::FileType) -> FileKind {
    if file_type.is_file() {
        FileKind::File
    } else if file_type.is_dir() {
        FileKind::Directory
    } else {
        FileKind::Other
    }
}

fn entry(name: String, metadata: &std::fs::Metadata) -> FileEntry {
    FileEntry {
        name,
        kind: kind_of(metadata.file_type()),
        modified: metadata.modified().ok().map(Timestamp::from),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PumpkinError {
    HostError::Io {
        path: path.to_path_buf(),
        source,
    }
    .into_domain()
}

impl FileSystem for HostFileSystem {
    fn list_dir(
        &self,
        dir: &Path,
    ) -> impl Future<Output = Result<Vec<FileEntry>, PumpkinError>> + Send {
        let dir = dir.to_path_buf();
        async move {
            let mut reader = tokio::fs::read_dir(&dir)
                .await
                .map_err(|err| io_error(&dir, err))?;
            let mut entries = Vec::new();
            while let Some(item) = reader.next_entry().await.map_err(|err| io_error(&dir, err))? {
                let name = item.file_name().to_string_lossy().into_owned();
                // follows symlinks, like stat
                match tokio::fs::metadata(item.path()).await {
                    Ok(metadata) => entries.push(entry(name, &metadata)),
                    Err(err) => tracing::debug!(file = %name, %err, "skipping unreadable entry"),
                }
            }
            Ok(entries)
        }
    }

    fn stat(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Option<FileEntry>, PumpkinError>> + Send {
        let path = path.to_path_buf();
        async move {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match tokio::fs::metadata(&path).await {
                Ok(metadata) => Ok(Some(entry(name, &metadata))),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(io_error(&path, err)),
            }
        }
    }
}
